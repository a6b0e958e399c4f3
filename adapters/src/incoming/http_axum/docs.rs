use crate::incoming::http_axum::{dto, handlers};
use domain::{aspect_ratio::AspectRatio, color::RgbColor, sharpen::SharpenMethod};
use dto::common_responses::{
    BadGatewayResponse, BadRequestResponse, InternalServerErrorResponse, NotFoundResponse,
    ValidationErrorResponse,
};
use dto::requests::{ProcessBase64Request, ProcessPathRequest};
use dto::responses::{ApiResponseValue, ProcessBase64Response, ProcessPathResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::process::process_base64,
        handlers::process::process_base64_random_bg,
        handlers::process::process_path,
        handlers::process::process_path_random_bg,
        handlers::health::health_check,
    ),
    components(
        schemas(
            ProcessBase64Request,
            ProcessPathRequest,
            ProcessBase64Response,
            ProcessPathResponse,
            ApiResponseValue,
            RgbColor,
            AspectRatio,
            SharpenMethod
        ),
        responses(
            BadRequestResponse,
            NotFoundResponse,
            ValidationErrorResponse,
            BadGatewayResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "processing", description = "Background replacement - segment an image through the remote service and center the foreground on a solid canvas of a given aspect ratio"),
        (name = "system", description = "System health and status monitoring")
    ),
    info(
        title = "Canvasfit Backend API",
        description = "Removes image backgrounds via an external segmentation service and composites the foreground onto a solid-color canvas sized to a target aspect ratio.",
        contact(
            name = "Canvasfit",
        ),
    ),
    servers(
        (url = "http://localhost:51060", description = "Development server"),
    )
)]
pub struct ApiDoc;
