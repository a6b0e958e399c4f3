use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::AppResult;

#[async_trait::async_trait]
pub trait SegmentationPort: Send + Sync {
    /// Strips the background from the image at `input` and persists the
    /// alpha-carrying result under the output root.
    ///
    /// `output_name` defaults to `<stem>_segmented.png`. Returns the location
    /// of the persisted foreground.
    async fn segment(&self, input: &Path, output_name: Option<&str>) -> AppResult<PathBuf>;
}

pub type DynSegmentationPort = Arc<dyn SegmentationPort>;
