// Connection handling module
// Serves one accepted TCP connection through the router

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use super::server_loop::ServerLoopConfig;
use crate::http::Request;
use crate::logger::{self, AccessLogEntry};
use crate::routing::Router;

/// Log and hand an accepted connection to a local task.
///
/// Must be called from within a `tokio::task::LocalSet`.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    router: &Arc<Router>,
    config: &Arc<ServerLoopConfig>,
) {
    logger::log_connection_accepted(&peer_addr);
    handle_connection(stream, peer_addr, Arc::clone(router), Arc::clone(config));
}

/// Handle a single connection in a spawned task.
///
/// Every request on the connection is dispatched synchronously; the
/// connection is dropped once the configured timeout elapses.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    router: Arc<Router>,
    config: Arc<ServerLoopConfig>,
) {
    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);
        let timeout = config.connection_timeout;

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let router = Arc::clone(&router);
                let config = Arc::clone(&config);
                async move { Ok::<_, Infallible>(respond(&req, &router, peer_addr, &config)) }
            }),
        );

        let result = match timeout {
            Some(duration) => match tokio::time::timeout(duration, conn).await {
                Ok(result) => result,
                Err(_) => {
                    logger::log_warning(&format!(
                        "Connection from {peer_addr} timed out after {} seconds",
                        duration.as_secs()
                    ));
                    return;
                }
            },
            None => conn.await,
        };
        if let Err(err) = result {
            logger::log_connection_error(&err);
        }
    });
}

/// Dispatch one request and convert the result for hyper
pub fn respond<B>(
    req: &hyper::Request<B>,
    router: &Router,
    peer_addr: SocketAddr,
    config: &ServerLoopConfig,
) -> hyper::Response<Full<Bytes>> {
    let started = Instant::now();
    let request = Request::from_hyper(req);
    let response = router.dispatch(&request);

    if config.access_log {
        let entry = AccessLogEntry::record(peer_addr, &request, &response, started.elapsed());
        logger::log_access(&entry, config.access_log_format);
    }

    response.into_hyper()
}
