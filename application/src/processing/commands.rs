use std::path::PathBuf;

use domain::{aspect_ratio::AspectRatio, color::RgbColor, sharpen::SharpenMethod};

/// How the caller wants the canvas sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasFit {
    /// Use the configured default aspect ratio.
    #[default]
    ConfiguredDefault,
    /// Keep the foreground's native size.
    Native,
    Ratio(AspectRatio),
}

impl CanvasFit {
    #[must_use]
    pub fn resolve(self, default: AspectRatio) -> Option<AspectRatio> {
        match self {
            Self::ConfiguredDefault => Some(default),
            Self::Native => None,
            Self::Ratio(ratio) => Some(ratio),
        }
    }
}

/// Options shared by inline and path-based requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackgroundOptions {
    pub color: Option<RgbColor>,
    pub random: bool,
    pub canvas: CanvasFit,
    pub sharpen: Option<SharpenMethod>,
}

#[derive(Debug, Clone)]
pub struct ProcessBase64Command {
    /// Raw base64, optionally prefixed with a `data:` URI header.
    pub image_base64: String,
    pub options: BackgroundOptions,
}

#[derive(Debug, Clone)]
pub struct ProcessPathCommand {
    pub input_image: PathBuf,
    pub output_image: Option<String>,
    pub options: BackgroundOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingResult {
    pub segmented_path: PathBuf,
    pub final_path: PathBuf,
    /// `data:image/png;base64,` payload, only for inline requests.
    pub result_base64: Option<String>,
}
