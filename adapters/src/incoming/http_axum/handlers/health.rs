use axum::{Json, extract::State};
use serde_json::{Value, json};

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::responses::ApiResponseValue;
use crate::incoming::http_axum::dto::responses::ApiResponse;
use crate::shared::app_state::AppState;

#[cfg_attr(feature = "docs", utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up; returns the effective processing configuration", body = ApiResponseValue,
         example = json!({
             "ok": true,
             "data": {
                 "status": "healthy",
                 "segmentation": {
                     "api_url": "http://127.0.0.1:51055/api/segmentation/base64",
                     "timeout_secs": 60
                 },
                 "storage": {
                     "input_dir": "input-images",
                     "output_dir": "output-images"
                 },
                 "background": {
                     "default_color": [255, 255, 255],
                     "random_enabled": false,
                     "palette_size": 8
                 },
                 "compositing": {
                     "default_aspect_ratio": [9, 16],
                     "sharpen_method": null,
                     "max_canvas_pixels": 100_000_000
                 }
             }
         })
        )
    ),
    tag = "system",
    summary = "Service health check",
    description = "Report liveness along with the segmentation endpoint, storage roots and compositing defaults in effect.",
    operation_id = "health_check"
))]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    let config = &state.config;

    Json(ApiResponse::success_with_data(Some(json!({
        "status": "healthy",
        "segmentation": {
            "api_url": config.segmentation.api_url,
            "timeout_secs": config.segmentation.timeout_secs
        },
        "storage": {
            "input_dir": config.storage.input_dir,
            "output_dir": config.storage.output_dir
        },
        "background": {
            "default_color": config.background.default_color,
            "random_enabled": config.background.random_enabled,
            "palette_size": config.background.palette.len()
        },
        "compositing": {
            "default_aspect_ratio": config.compositing.default_aspect_ratio,
            "sharpen_method": config.compositing.sharpen_method,
            "max_canvas_pixels": config.compositing.max_canvas_pixels
        }
    }))))
}
