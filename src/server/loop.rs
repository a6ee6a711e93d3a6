// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept connections until `shutdown` is notified.
///
/// Accept errors are logged and the loop carries on. On shutdown the
/// listener is dropped and every accepted connection is asked to close
/// gracefully; each finishes in its own task.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    let (closing, _) = watch::channel(false);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, closing.subscribe());
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    drop(listener);
    closing.send_replace(true);
    logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));
}

/// Wait for in-flight connections to finish, up to `grace`.
///
/// Polls the active connection counter every 50ms; returns the number of
/// connections still open when it gives up.
pub async fn drain_connections(state: &AppState, grace: std::time::Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    let poll = std::time::Duration::from_millis(50);

    loop {
        let active = state.active_connections.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(poll).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::server::create_listener;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    fn test_state() -> Arc<AppState> {
        let mut cfg = Config::defaults().unwrap();
        cfg.templates.dir = concat!(env!("CARGO_MANIFEST_DIR"), "/templates").to_string();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg).unwrap())
    }

    #[tokio::test]
    async fn test_shutdown_closes_idle_keep_alive() {
        let state = test_state();
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    Arc::clone(&state),
                    Arc::clone(&shutdown),
                ));

                // One request, then the connection sits idle in keep-alive
                let mut client = TcpStream::connect(addr).await.unwrap();
                client
                    .write_all(b"GET /404 HTTP/1.1\r\nHost: localhost\r\n\r\n")
                    .await
                    .unwrap();
                let mut buf = [0u8; 4096];
                let n = client.read(&mut buf).await.unwrap();
                assert!(buf[..n].starts_with(b"HTTP/1.1 404"));
                assert_eq!(state.active_connections.load(Ordering::SeqCst), 1);

                shutdown.notify_one();
                server.await.unwrap();

                let remaining = drain_connections(&state, Duration::from_secs(5)).await;
                assert_eq!(remaining, 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_drain_returns_immediately_when_idle() {
        let state = test_state();
        let remaining = drain_connections(&state, Duration::from_secs(5)).await;
        assert_eq!(remaining, 0);
    }
}
