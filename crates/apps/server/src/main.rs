mod api;
mod baas;
mod backend;
mod config;
mod session;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::backend::Backend;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = Config::parse();
    let backend = Backend::from_config(&config).await?;
    info!(backend = backend.kind(), root = ?config.site_root, "content backend ready");

    let app = api::router(AppState::new(backend), &config.site_root);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("site server listening on http://{}", config.addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
