use std::sync::Arc;

use rxroute::config::{self, Config};
use rxroute::logger;
use rxroute::routing::Router;
use rxroute::server::{self, ServerLoopConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg.logging)?;

    // A malformed route table must stop startup
    let router = match Router::from_config(&cfg) {
        Ok(router) => Arc::new(router),
        Err(e) => {
            let e = anyhow::Error::from(e);
            logger::log_error(&format!("Refusing to start: {e:#}"));
            return Err(e.into());
        }
    };

    // Requests are dispatched one at a time on a single thread
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg, router))
}

async fn async_main(cfg: Config, router: Arc<Router>) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::bind_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::start_server_loop(
            listener,
            router,
            ServerLoopConfig::from_config(&cfg),
            shutdown_signal(),
        ))
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
        std::future::pending::<()>().await;
    }
}
