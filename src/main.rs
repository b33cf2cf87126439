use product_service::config::ProductConfig;
use product_service::observability::init_tracing;
use product_service::services::init_metrics;
use product_service::startup::Application;
use tokio::signal;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize metrics recorder (must be before any metrics are recorded)
    init_metrics();

    init_tracing("info");

    let config = ProductConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.common.port,
        database = %config.mongodb.database,
        "Starting product service"
    );

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to build application: {}", e);
        std::io::Error::other(format!("Startup error: {}", e))
    })?;

    tokio::select! {
        result = app.run_until_stopped() => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {}
    }

    tracing::info!("Service shutdown complete");
    Ok(())
}
