// Server loop module
// Accepts connections until shutdown, then drains in-flight connections

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long in-flight connections may run after shutdown is requested
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Accept loop for the application listener
///
/// Returns once `shutdown` resolves and open connections have closed or
/// [`SHUTDOWN_GRACE`] has elapsed.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }

    // Stop accepting before draining
    drop(listener);
    logger::log_shutdown(active_connections.load(Ordering::SeqCst));

    tokio::select! {
        () = graceful.shutdown() => tracing::info!("All connections closed"),
        () = tokio::time::sleep(SHUTDOWN_GRACE) => {
            logger::log_warning(&format!(
                "Grace period of {}s elapsed, dropping {} connection(s)",
                SHUTDOWN_GRACE.as_secs(),
                active_connections.load(Ordering::SeqCst)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::test_config;
    use crate::server::create_listener;
    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::{Request, StatusCode};
    use hyper_util::client::legacy::Client;
    use hyper_util::rt::TokioExecutor;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_serves_until_shutdown() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(
            AppState::new(test_config("127.0.0.1", 8080, "http://127.0.0.1:10080")).unwrap(),
        );

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(start_server_loop(listener, state, async {
            let _ = stop_rx.await;
        }));

        let client: Client<_, Empty<Bytes>> = Client::builder(TokioExecutor::new()).build_http();

        let response = client
            .request(
                Request::get(format!("http://{addr}/"))
                    .body(Empty::new())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(
            body,
            "curl -sL http://127.0.0.1:8080/connect-gfwrt.sh | bash -"
        );

        let response = client
            .request(
                Request::get(format!("http://{addr}/setup.sh/abc-123"))
                    .body(Empty::new())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(String::from_utf8_lossy(&body).contains("abc-123"));

        // Close pooled keep-alive connections so the drain finishes promptly
        drop(client);
        stop_tx.send(()).unwrap();
        tokio::time::timeout(SHUTDOWN_GRACE + Duration::from_secs(1), server)
            .await
            .unwrap()
            .unwrap();

        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_over_connection_limit() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let mut config = test_config("127.0.0.1", 8080, "http://127.0.0.1:10080");
        config.performance.max_connections = Some(0);
        let state = Arc::new(AppState::new(config).unwrap());

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(start_server_loop(listener, state, async {
            let _ = stop_rx.await;
        }));

        let client: Client<_, Empty<Bytes>> = Client::builder(TokioExecutor::new()).build_http();
        let result = client
            .request(
                Request::get(format!("http://{addr}/"))
                    .body(Empty::new())
                    .unwrap(),
            )
            .await;
        assert!(result.is_err());

        stop_tx.send(()).unwrap();
        server.await.unwrap();
    }
}
