use crate::{
    error::AppResult,
    processing::commands::{ProcessBase64Command, ProcessPathCommand, ProcessingResult},
};

#[async_trait::async_trait]
pub trait ImageProcessingUseCase: Send + Sync {
    async fn process_base64(&self, command: ProcessBase64Command) -> AppResult<ProcessingResult>;

    async fn process_path(&self, command: ProcessPathCommand) -> AppResult<ProcessingResult>;
}
