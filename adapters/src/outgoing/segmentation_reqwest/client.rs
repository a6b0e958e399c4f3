use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info, instrument};
use url::Url;

use canvasfit_application::{
    error::{AppError, AppResult},
    infrastructure_config::Config,
    ports::outgoing::segmentation::SegmentationPort,
    processing::{naming, payload},
};

/// Upper bound on how much of a failed response body is echoed back to callers.
const MAX_REMOTE_DETAIL_CHARS: usize = 512;

#[derive(Debug, Clone)]
pub struct SegmentationClientConfig {
    pub api_url: Url,
    pub timeout: Duration,
    pub output_dir: PathBuf,
}

impl SegmentationClientConfig {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let api_url = Url::parse(&config.segmentation.api_url).map_err(|e| AppError::ConfigError {
            message: format!("Invalid segmentation api_url: {e}"),
        })?;

        Ok(Self {
            api_url,
            timeout: config.segmentation_timeout(),
            output_dir: config.storage.output_dir.clone(),
        })
    }
}

#[derive(Serialize)]
struct SegmentationRequest<'a> {
    image_base64: &'a str,
    output_path: &'a str,
}

#[derive(Deserialize)]
struct SegmentationResponse {
    #[serde(default)]
    result_base64: Option<String>,
}

pub struct HttpSegmentationClient {
    client: Client,
    config: SegmentationClientConfig,
}

impl HttpSegmentationClient {
    pub fn new(config: SegmentationClientConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::ConfigError {
                message: format!("Failed to build segmentation HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    async fn encode_input(input: &Path) -> AppResult<String> {
        let is_file = fs::metadata(input)
            .await
            .as_ref()
            .is_ok_and(Metadata::is_file);
        if !is_file {
            return Err(AppError::InputNotFound {
                path: input.to_path_buf(),
            });
        }

        let bytes = fs::read(input).await.map_err(|e| AppError::EncodeError {
            message: format!("{}: {e}", input.display()),
        })?;
        debug!("Encoding {} bytes from {}", bytes.len(), input.display());

        Ok(payload::encode(&bytes))
    }

    async fn request_segmentation(&self, image_base64: &str) -> AppResult<String> {
        let body = SegmentationRequest {
            image_base64,
            output_path: "",
        };

        let response = self
            .client
            .post(self.config.api_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.network_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = remote_detail(&detail).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            });
            return Err(AppError::RemoteError {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response
            .bytes()
            .await
            .map_err(|e| self.network_error(&e))?;

        let parsed: SegmentationResponse =
            serde_json::from_slice(&raw).map_err(|e| AppError::ProtocolError {
                message: format!("response is not valid JSON: {e}"),
            })?;

        parsed
            .result_base64
            .filter(|encoded| !encoded.trim().is_empty())
            .ok_or_else(|| AppError::ProtocolError {
                message: "response is missing result_base64".to_string(),
            })
    }

    fn network_error(&self, e: &reqwest::Error) -> AppError {
        let message = if e.is_timeout() {
            format!(
                "request to {} timed out after {}s",
                self.config.api_url,
                self.config.timeout.as_secs_f64()
            )
        } else {
            format!("request to {} failed: {e}", self.config.api_url)
        };
        AppError::NetworkError { message }
    }

    async fn persist(&self, bytes: &[u8], output_name: &str) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.config.output_dir)
            .await
            .map_err(|e| AppError::WriteError {
                message: format!("{}: {e}", self.config.output_dir.display()),
            })?;

        let path = self.config.output_dir.join(output_name);
        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::WriteError {
                message: format!("{}: {e}", path.display()),
            })?;

        Ok(path)
    }

    async fn run(&self, input: &Path, output_name: &str) -> AppResult<PathBuf> {
        let image_base64 = Self::encode_input(input).await?;
        let result_base64 = self.request_segmentation(&image_base64).await?;

        let bytes = payload::decode(&result_base64).map_err(|e| AppError::DecodeError {
            message: e.to_string(),
        })?;

        self.persist(&bytes, output_name).await
    }
}

/// Trimmed error body, cut to `MAX_REMOTE_DETAIL_CHARS`; `None` when blank.
fn remote_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    match body.char_indices().nth(MAX_REMOTE_DETAIL_CHARS) {
        Some((cut, _)) => Some(format!("{}... (truncated)", body.get(..cut).unwrap_or(body))),
        None => Some(body.to_string()),
    }
}

#[async_trait::async_trait]
impl SegmentationPort for HttpSegmentationClient {
    #[instrument(skip(self), fields(api_url = %self.config.api_url))]
    async fn segment(&self, input: &Path, output_name: Option<&str>) -> AppResult<PathBuf> {
        let output_name = match output_name {
            Some(name) => naming::validate_output_name(name)?.to_string(),
            None => naming::segmented_name(naming::file_stem(input)?),
        };

        match self.run(input, &output_name).await {
            Ok(path) => {
                info!("Segmented {} into {}", input.display(), path.display());
                Ok(path)
            }
            Err(e) => {
                error!("Segmentation of {} failed: {}", input.display(), e);
                Err(e)
            }
        }
    }
}
