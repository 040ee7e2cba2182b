use ciris_server::{app, config::ServerConfig, error::BootstrapError, lifecycle};
use rootcause::Report;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Report<BootstrapError>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from file and environment
    let config = ServerConfig::from_env().map_err(|e| BootstrapError::Config {
        details: e.to_string(),
    })?;
    tracing::info!(backend = ?config.backend, "Loaded configuration");

    // Start the session layer before accepting requests
    let state = lifecycle::bootstrap(&config)?;
    let router = app::router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| BootstrapError::Bind {
            addr: config.bind_addr.clone(),
            details: e.to_string(),
        })?;

    tracing::info!("listening on http://{}", config.bind_addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.shutdown().await;

    served.map_err(|e| {
        BootstrapError::Serve {
            details: e.to_string(),
        }
        .into()
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
