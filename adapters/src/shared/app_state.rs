use std::sync::Arc;

use canvasfit_application::{
    infrastructure_config::Config, ports::incoming::processing::ImageProcessingUseCase,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub processing_service: Arc<dyn ImageProcessingUseCase>,
}

impl AppState {
    pub fn new(config: Arc<Config>, processing_service: Arc<dyn ImageProcessingUseCase>) -> Self {
        Self {
            config,
            processing_service,
        }
    }
}
