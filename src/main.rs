use clap::Parser;
use pagewiki::config::Config;
use pagewiki::{logger, server};

/// Minimal page-editing web service
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Configuration file, without extension (config.toml by default)
    #[arg(short, long, default_value = "config")]
    config: String,

    /// Listen port, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut cfg = Config::load_from(&args.config)?;
    if let Some(port) = args.port {
        cfg.server.port = port;
    }

    logger::init(&cfg.logging)?;

    // Tokio runtime, thread count from the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        log::info!("[CONFIG] Using {workers} worker threads");
    } else {
        log::info!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(server::run(cfg))
}
