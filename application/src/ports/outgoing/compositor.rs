use std::path::PathBuf;
use std::sync::Arc;

use crate::error::AppResult;
use domain::{aspect_ratio::AspectRatio, color::RgbColor, sharpen::SharpenMethod};

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRequest {
    pub segmented_path: PathBuf,
    pub background: RgbColor,
    pub aspect_ratio: Option<AspectRatio>,
    pub sharpen: Option<SharpenMethod>,
    pub output_path: PathBuf,
}

#[async_trait::async_trait]
pub trait CanvasCompositorPort: Send + Sync {
    /// Places the segmented foreground on a solid canvas and writes the
    /// flattened result to `request.output_path`, which is returned.
    async fn composite(&self, request: CompositeRequest) -> AppResult<PathBuf>;
}

pub type DynCanvasCompositorPort = Arc<dyn CanvasCompositorPort>;
