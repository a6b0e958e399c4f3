use std::path::Path;
use std::sync::Arc;
use tempfile::Builder;
use tokio::fs;
use tracing::info;

use canvasfit_adapters::{
    outgoing::{
        image_rs::canvas_compositor::ImageCanvasCompositor,
        segmentation_reqwest::client::{HttpSegmentationClient, SegmentationClientConfig},
    },
    shared::app_state::AppState as AdaptersAppState,
};
use canvasfit_application::{
    config::ProcessingSettings,
    error::{AppError, AppResult},
    infrastructure_config::Config,
    ports::{
        incoming::processing::ImageProcessingUseCase,
        outgoing::{compositor::DynCanvasCompositorPort, segmentation::DynSegmentationPort},
    },
    processing::service::ImageProcessingService,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub processing_service: Arc<dyn ImageProcessingUseCase>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let config = Arc::new(config);

        Self::prepare_storage(&config).await?;

        let segmentation = Self::create_segmentation_client(&config)?;
        let compositor: DynCanvasCompositorPort =
            Arc::new(ImageCanvasCompositor::from_config(&config));
        let settings = Arc::new(ProcessingSettings::from_config(&config));

        let processing_service: Arc<dyn ImageProcessingUseCase> = Arc::new(
            ImageProcessingService::new(settings, segmentation, compositor),
        );

        Ok(Self {
            config,
            processing_service,
        })
    }

    async fn prepare_storage(config: &Config) -> AppResult<()> {
        let mut dirs: Vec<&Path> = vec![
            config.storage.input_dir.as_path(),
            config.storage.output_dir.as_path(),
        ];
        if let Some(temp_dir) = &config.storage.temp_dir {
            dirs.push(temp_dir);
        }

        for dir in dirs {
            fs::create_dir_all(dir)
                .await
                .map_err(|e| AppError::ConfigError {
                    message: format!("Failed to create directory {}: {e}", dir.display()),
                })?;
        }

        Self::ensure_writable(&config.storage.output_dir)?;

        info!(
            "Storage ready: input={}, output={}",
            config.storage.input_dir.display(),
            config.storage.output_dir.display()
        );
        Ok(())
    }

    /// Every request writes its artifacts here, so refuse to start when it
    /// cannot take a file.
    fn ensure_writable(dir: &Path) -> AppResult<()> {
        Builder::new()
            .prefix(".canvasfit-write-check")
            .tempfile_in(dir)
            .map(drop)
            .map_err(|e| AppError::ConfigError {
                message: format!("Output directory {} is not writable: {e}", dir.display()),
            })
    }

    fn create_segmentation_client(config: &Config) -> AppResult<DynSegmentationPort> {
        let client_config = SegmentationClientConfig::from_config(config)?;
        Ok(Arc::new(HttpSegmentationClient::new(client_config)?))
    }

    pub fn to_adapters_state(&self) -> AdaptersAppState {
        AdaptersAppState::new(
            Arc::clone(&self.config),
            Arc::clone(&self.processing_service),
        )
    }
}
