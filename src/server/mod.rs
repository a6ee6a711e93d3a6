// Server module entry point
// Startup, connection handling and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::{drain_connections, start_server_loop};

use std::sync::Arc;
use tokio::sync::Notify;

use crate::config::{AppState, Config};
use crate::logger;

/// Run the wiki server until SIGINT/SIGTERM, then drain open connections.
///
/// Parses the template set and binds the listening socket first; either
/// failing aborts startup.
pub async fn run(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let state = Arc::new(AppState::new(&cfg)?);
    let listener = create_listener(addr)?;

    logger::log_server_start(&listener.local_addr()?, &cfg);

    let shutdown = Arc::new(Notify::new());
    signal::start_signal_handler(Arc::clone(&shutdown))?;

    let grace = std::time::Duration::from_secs(std::cmp::max(
        cfg.performance.read_timeout,
        cfg.performance.write_timeout,
    ));

    // LocalSet for spawn_local support; connection tasks die with it, so
    // drain them before leaving
    let local = tokio::task::LocalSet::new();
    let remaining = local
        .run_until(async move {
            start_server_loop(listener, Arc::clone(&state), shutdown).await;
            drain_connections(&state, grace).await
        })
        .await;

    if remaining > 0 {
        logger::log_warning(&format!(
            "Shutting down with {remaining} connection(s) still open"
        ));
    }
    Ok(())
}
