//! # Infovault Server
//!
//! Main entry point for the Infovault API.

use infovault_config::ConfigLoader;
use infovault_core::telemetry::init_logging;
use infovault_core::InfoResult;
use infovault_server::app::Application;
use infovault_server::startup::{print_banner, print_startup_info};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Application error: {}", e);
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> InfoResult<()> {
    let config = ConfigLoader::from_default_location()?.into_config();

    let _log_guard = init_logging(&config.logging)?;

    print_banner();
    info!("Starting Infovault Server...");
    info!("Environment: {}", config.app.environment);

    infovault_repository::metrics::register_metrics();
    infovault_service::metrics::register_metrics();

    print_startup_info(&config);

    let app = Application::build(config).await?;
    app.run(shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
