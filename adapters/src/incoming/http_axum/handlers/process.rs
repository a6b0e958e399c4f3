use axum::{Json, extract::State};
use axum_valid::Valid;
use tracing::instrument;

use canvasfit_application::ports::incoming::processing::ImageProcessingUseCase;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::dto::common_responses::{
    BadGatewayResponse, BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
    ValidationErrorResponse,
};
use crate::incoming::http_axum::{
    dto::{
        requests::{ProcessBase64Request, ProcessPathRequest},
        responses::{ProcessBase64Response, ProcessPathResponse},
    },
    error_mapper::HttpError,
};
use crate::shared::app_state::AppState;

async fn run_base64(
    state: &AppState,
    request: ProcessBase64Request,
    force_random: bool,
) -> Result<Json<ProcessBase64Response>, HttpError> {
    let command = request.into_command(force_random)?;
    let use_case: &dyn ImageProcessingUseCase = &*state.processing_service;
    let result = use_case.process_base64(command).await?;
    Ok(Json(result.into()))
}

async fn run_path(
    state: &AppState,
    request: ProcessPathRequest,
    force_random: bool,
) -> Result<Json<ProcessPathResponse>, HttpError> {
    let command = request.into_command(force_random)?;
    let use_case: &dyn ImageProcessingUseCase = &*state.processing_service;
    let result = use_case.process_path(command).await?;
    Ok(Json(result.into()))
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/api/process/base64",
    request_body = ProcessBase64Request,
    responses(
        (status = 200, description = "Image segmented and composited", body = ProcessBase64Response),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "processing",
    summary = "Process an inline image",
    description = "Decode a base64 image (a data URI header is accepted), remove its background through the segmentation service and center it on a solid canvas of the requested aspect ratio. bg_color cannot be combined with random_bg.",
    operation_id = "process_base64"
))]
#[instrument(skip_all)]
pub async fn process_base64(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ProcessBase64Request>>,
) -> Result<Json<ProcessBase64Response>, HttpError> {
    run_base64(&state, request, false).await
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/api/process/base64/randombg",
    request_body = ProcessBase64Request,
    responses(
        (status = 200, description = "Image composited onto a random palette color", body = ProcessBase64Response),
        (status = 400, response = BadRequestResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "processing",
    summary = "Process an inline image on a random background",
    description = "Same as /api/process/base64 with the background drawn from the configured palette. Supplying bg_color is a conflict.",
    operation_id = "process_base64_random_bg"
))]
#[instrument(skip_all)]
pub async fn process_base64_random_bg(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ProcessBase64Request>>,
) -> Result<Json<ProcessBase64Response>, HttpError> {
    run_base64(&state, request, true).await
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/api/process/path",
    request_body = ProcessPathRequest,
    responses(
        (status = 200, description = "Image segmented and composited", body = ProcessPathResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "processing",
    summary = "Process an image from the input directory",
    description = "Segment an image addressed by path and write the composited result to the output directory. Without output_image the file is named <stem>_processed_<w>_<h>.jpg.",
    operation_id = "process_path"
))]
#[instrument(skip_all)]
pub async fn process_path(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ProcessPathRequest>>,
) -> Result<Json<ProcessPathResponse>, HttpError> {
    run_path(&state, request, false).await
}

#[cfg_attr(feature = "docs", utoipa::path(
    post,
    path = "/api/process/path/randombg",
    request_body = ProcessPathRequest,
    responses(
        (status = 200, description = "Image composited onto a random palette color", body = ProcessPathResponse),
        (status = 400, response = BadRequestResponse),
        (status = 404, response = NotFoundResponse),
        (status = 422, response = ValidationErrorResponse),
        (status = 502, response = BadGatewayResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    tag = "processing",
    summary = "Process an image from the input directory on a random background",
    description = "Same as /api/process/path with the background drawn from the configured palette.",
    operation_id = "process_path_random_bg"
))]
#[instrument(skip_all)]
pub async fn process_path_random_bg(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<ProcessPathRequest>>,
) -> Result<Json<ProcessPathResponse>, HttpError> {
    run_path(&state, request, true).await
}
