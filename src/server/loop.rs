// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::Config;
use crate::logger::{self, AccessLogFormat};
use crate::routing::Router;

/// Per-connection settings derived from the configuration
#[derive(Debug, Clone)]
pub struct ServerLoopConfig {
    pub connection_timeout: Option<Duration>,
    pub access_log: bool,
    pub access_log_format: AccessLogFormat,
}

impl ServerLoopConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            connection_timeout: (config.server.connection_timeout > 0)
                .then(|| Duration::from_secs(config.server.connection_timeout)),
            access_log: config.logging.access_log,
            access_log_format: AccessLogFormat::from_name(&config.logging.access_log_format),
        }
    }
}

/// Accept loop.
///
/// Must run inside a `tokio::task::LocalSet`. Returns once `shutdown`
/// completes; connections already accepted finish in their own tasks.
pub async fn start_server_loop<S>(
    listener: TcpListener,
    router: Arc<Router>,
    config: ServerLoopConfig,
    shutdown: S,
) -> std::io::Result<()>
where
    S: Future<Output = ()>,
{
    let config = Arc::new(config);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &router, &config);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}
