use serde::Serialize;
#[cfg(feature = "docs")]
use utoipa::ToSchema;

use canvasfit_application::processing::commands::ProcessingResult;

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Standard API response wrapper with success indicator, optional error message, and optional data payload",
    example = json!({
        "ok": true,
        "data": {
            "status": "healthy"
        }
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    #[must_use]
    pub fn success_with_data(data: Option<T>) -> Self {
        Self {
            ok: true,
            error: None,
            data,
        }
    }
}

#[cfg(feature = "docs")]
#[derive(serde::Serialize, utoipa::ToSchema)]
#[schema(title = "ApiResponseValue")]
pub struct ApiResponseValue {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Artifacts of an inline request plus the final image re-encoded as a PNG data URI",
    example = json!({
        "segmented_path": "output-images/upload_k3J9x_segmented.png",
        "final_path": "output-images/upload_k3J9x_processed.png",
        "result_base64": "data:image/png;base64,iVBORw0KGgo..."
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ProcessBase64Response {
    pub segmented_path: String,
    pub final_path: String,
    pub result_base64: String,
}

#[cfg_attr(feature = "docs", derive(ToSchema))]
#[cfg_attr(feature = "docs", schema(
    description = "Artifacts of a path request",
    example = json!({
        "segmented_path": "output-images/car_segmented.png",
        "final_path": "output-images/car_processed_9_16.jpg"
    })
))]
#[derive(Debug, Clone, Serialize)]
pub struct ProcessPathResponse {
    pub segmented_path: String,
    pub final_path: String,
}

impl From<ProcessingResult> for ProcessBase64Response {
    fn from(result: ProcessingResult) -> Self {
        Self {
            segmented_path: result.segmented_path.display().to_string(),
            final_path: result.final_path.display().to_string(),
            result_base64: result.result_base64.unwrap_or_default(),
        }
    }
}

impl From<ProcessingResult> for ProcessPathResponse {
    fn from(result: ProcessingResult) -> Self {
        Self {
            segmented_path: result.segmented_path.display().to_string(),
            final_path: result.final_path.display().to_string(),
        }
    }
}
