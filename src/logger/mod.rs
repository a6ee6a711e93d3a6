//! Logger module
//!
//! Provides logging utilities for the wiki server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! Everything goes through the `log` facade; `init` installs `env_logger`
//! as the backend.

mod format;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::fs::{File, OpenOptions};
use std::io;
use std::net::SocketAddr;
use std::path::Path;

/// Log target used for access log lines
pub const ACCESS_TARGET: &str = "access";

/// Initialize the logger with configuration
///
/// Should be called once at application startup. `RUST_LOG` overrides
/// `logging.level` when set.
pub fn init(config: &LoggingConfig) -> io::Result<()> {
    let env = env_logger::Env::default().default_filter_or(config.level.as_str());
    let mut builder = env_logger::Builder::from_env(env);

    if let Some(ref path) = config.log_file {
        let file = open_log_file(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
        builder.write_style(env_logger::WriteStyle::Never);
    }

    builder.try_init().map_err(|_| {
        io::Error::new(io::ErrorKind::AlreadyExists, "Logger already initialized")
    })
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log::info!("======================================");
    log::info!("Wiki server started successfully");
    log::info!("Listening on: http://{addr}");
    log::info!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        log::info!("Worker threads: {workers}");
    }
    log::info!("Pages directory: {}", config.storage.pages_dir);
    log::info!("Templates directory: {}", config.templates.dir);
    if let Some(ref path) = config.logging.log_file {
        log::info!("Log file: {path}");
    }
    log::info!("======================================");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log::error!("[Connection] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    log::error!("{message}");
}

pub fn log_warning(message: &str) {
    log::warn!("{message}");
}

pub fn log_page_saved(title: &str, path: &Path, bytes: usize) {
    log::info!("[Save] '{title}' -> {} ({bytes} bytes)", path.display());
}

pub fn log_shutdown(active_connections: usize) {
    log::info!("[Shutdown] Listener closed, {active_connections} connection(s) still in flight");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    log::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_log_file_creates_parents() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs/nested/wiki.log");
        let path_str = path.to_str().unwrap();

        open_log_file(path_str).unwrap();
        assert!(path.exists());

        // Reopening appends rather than failing
        open_log_file(path_str).unwrap();
    }
}
