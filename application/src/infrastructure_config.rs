use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{AppError, AppResult};
use domain::{
    aspect_ratio::AspectRatio, canvas::DEFAULT_MAX_CANVAS_PIXELS, color::RgbColor,
    sharpen::SharpenMethod,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub segmentation: SegmentationConfig,
    pub storage: StorageConfig,
    pub background: BackgroundConfig,
    pub compositing: CompositingConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: Option<String>,
    /// Upper bound for request bodies; inline images arrive base64 encoded.
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentationConfig {
    pub api_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Where inline uploads are staged; the system temp dir when unset.
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundConfig {
    pub default_color: RgbColor,
    pub palette: Vec<RgbColor>,
    pub random_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositingConfig {
    pub default_aspect_ratio: AspectRatio,
    #[serde(default)]
    pub sharpen_method: Option<SharpenMethod>,
    /// Largest canvas (width * height) a single request may allocate.
    #[serde(default = "default_max_canvas_pixels")]
    pub max_canvas_pixels: u64,
}

fn default_max_canvas_pixels() -> u64 {
    DEFAULT_MAX_CANVAS_PIXELS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "pretty")]
    Pretty,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            default_color: RgbColor::WHITE,
            palette: vec![
                RgbColor::new(255, 255, 255),
                RgbColor::new(245, 245, 220),
                RgbColor::new(230, 230, 250),
                RgbColor::new(255, 228, 225),
                RgbColor::new(240, 255, 240),
                RgbColor::new(224, 255, 255),
                RgbColor::new(255, 250, 205),
                RgbColor::new(211, 211, 211),
            ],
            random_enabled: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 51060,
                cors_origin: None,
                max_body_bytes: 32 * 1024 * 1024,
            },
            segmentation: SegmentationConfig {
                api_url: "http://127.0.0.1:51055/api/segmentation/base64".to_string(),
                timeout_secs: 60,
            },
            storage: StorageConfig {
                input_dir: PathBuf::from("input-images"),
                output_dir: PathBuf::from("output-images"),
                temp_dir: None,
            },
            background: BackgroundConfig::default(),
            compositing: CompositingConfig {
                default_aspect_ratio: AspectRatio::PORTRAIT_9_16,
                sharpen_method: None,
                max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
                include_location: false,
            },
        }
    }
}

impl Config {
    pub fn validate(&self) -> AppResult<()> {
        let api_url = Url::parse(&self.segmentation.api_url).map_err(|e| {
            AppError::ConfigError {
                message: format!(
                    "segmentation api_url '{}' is not a valid URL: {e}",
                    self.segmentation.api_url
                ),
            }
        })?;

        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(AppError::ConfigError {
                message: "segmentation api_url must use http or https".to_string(),
            });
        }

        if self.segmentation.timeout_secs == 0 {
            return Err(AppError::ConfigError {
                message: "segmentation timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.server.max_body_bytes == 0 {
            return Err(AppError::ConfigError {
                message: "server max_body_bytes must be greater than 0".to_string(),
            });
        }

        if self.compositing.max_canvas_pixels == 0 {
            return Err(AppError::ConfigError {
                message: "compositing max_canvas_pixels must be greater than 0".to_string(),
            });
        }

        if self.storage.input_dir.as_os_str().is_empty() {
            return Err(AppError::ConfigError {
                message: "storage input_dir cannot be empty".to_string(),
            });
        }

        if self.storage.output_dir.as_os_str().is_empty() {
            return Err(AppError::ConfigError {
                message: "storage output_dir cannot be empty".to_string(),
            });
        }

        if self.background.palette.is_empty() {
            return Err(AppError::ConfigError {
                message: "background palette cannot be empty".to_string(),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(AppError::ConfigError {
                message: "logging level cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    #[must_use]
    pub fn segmentation_timeout(&self) -> Duration {
        Duration::from_secs(self.segmentation.timeout_secs)
    }
}
