use crate::infrastructure_config::Config;
use domain::{aspect_ratio::AspectRatio, color::RgbColor, sharpen::SharpenMethod};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ProcessingSettings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub temp_dir: Option<PathBuf>,
    pub default_background: RgbColor,
    pub palette: Arc<[RgbColor]>,
    pub random_background: bool,
    pub default_aspect_ratio: AspectRatio,
    pub sharpen_method: Option<SharpenMethod>,
}

impl ProcessingSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            input_dir: config.storage.input_dir.clone(),
            output_dir: config.storage.output_dir.clone(),
            temp_dir: config.storage.temp_dir.clone(),
            default_background: config.background.default_color,
            palette: config.background.palette.clone().into(),
            random_background: config.background.random_enabled,
            default_aspect_ratio: config.compositing.default_aspect_ratio,
            sharpen_method: config.compositing.sharpen_method,
        }
    }
}
