use axum::{
    Router,
    routing::{get, post},
};
#[cfg(feature = "docs")]
use utoipa::OpenApi;
#[cfg(feature = "docs")]
use utoipa_swagger_ui::SwaggerUi;

use crate::incoming::http_axum::{
    handlers::{
        health::health_check,
        process::{process_base64, process_base64_random_bg, process_path, process_path_random_bg},
    },
    router_ext::RouterExt,
};
use crate::shared::app_state::AppState;

#[cfg(feature = "docs")]
use crate::incoming::http_axum::docs::ApiDoc;

pub fn build_application_router(state: &AppState) -> Router<AppState> {
    let process_routes = build_process_routes(state.config.server.max_body_bytes);

    let router = Router::new()
        .route("/health", get(health_check))
        .merge(process_routes)
        .with_request_id();

    #[cfg(feature = "docs")]
    {
        router.merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
    }

    #[cfg(not(feature = "docs"))]
    {
        router
    }
}

fn build_process_routes(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/process/base64", post(process_base64))
        .route("/api/process/base64/randombg", post(process_base64_random_bg))
        .route("/api/process/path", post(process_path))
        .route("/api/process/path/randombg", post(process_path_random_bg))
        .with_body_limit(max_body_bytes)
}
