use std::error::Error;
use std::future::pending;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use canvasfit_application::error::AppError;
use server::bootstrap::{router::create_router, state::AppState};
use server::config_loader;
use server::observability::{startup_info::print_api_info, tracing::setup_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let config = config_loader::load_config()?;
    setup_logging(&config)?;

    info!(
        segmentation = %config.segmentation.api_url,
        timeout_secs = config.segmentation.timeout_secs,
        input_dir = %config.storage.input_dir.display(),
        output_dir = %config.storage.output_dir.display(),
        "Starting Canvasfit Backend Server"
    );

    let state = AppState::new(config.clone()).await?;
    let app = create_router(&state);

    let address = config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::ConfigError {
            message: format!("Cannot bind {address}: {e}"),
        })?;
    info!("Server listening on http://{}", listener.local_addr()?);

    print_api_info(&config);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| error!("Server error: {}", e))?;

    info!(
        "Server stopped; artifacts remain under {}",
        config.storage.output_dir.display()
    );
    Ok(())
}

/// Resolves on Ctrl+C or, on Unix, SIGTERM. In-flight compositing jobs are
/// allowed to finish before `axum::serve` returns.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Ctrl+C handler unavailable: {}", e);
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    let source = tokio::select! {
        () = interrupt => "Ctrl+C",
        () = terminate => "SIGTERM",
    };
    info!("{} received, draining in-flight requests", source);
}
