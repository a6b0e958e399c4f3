use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error, warn};

use canvasfit_application::error::AppError;

pub struct HttpError(pub AppError);

impl HttpError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::InputNotFound { .. } => StatusCode::NOT_FOUND,

            AppError::Domain(_)
            | AppError::ConflictingRequest { .. }
            | AppError::InvalidPayload { .. } => StatusCode::BAD_REQUEST,

            AppError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,

            AppError::NetworkError { .. }
            | AppError::RemoteError { .. }
            | AppError::ProtocolError { .. } => StatusCode::BAD_GATEWAY,

            AppError::EncodeError { .. }
            | AppError::DecodeError { .. }
            | AppError::WriteError { .. }
            | AppError::CompositionError { .. }
            | AppError::ConfigError { .. }
            | AppError::TaskError { .. }
            | AppError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let app_error = &self.0;

        if app_error.is_client_error() {
            debug!("Client error response generated: {}", app_error);
        } else if status_code == StatusCode::BAD_GATEWAY {
            warn!("Upstream error response generated: {}", app_error);
        } else {
            error!("Server error response generated: {}", app_error);
        }

        let error_response = json!({
            "ok": false,
            "error": app_error.to_string(),
            "status": status_code.as_u16()
        });

        (status_code, Json(error_response)).into_response()
    }
}

impl From<AppError> for HttpError {
    fn from(app_error: AppError) -> Self {
        HttpError(app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use domain::error::DomainError;
    use serde_json::Value;
    use std::path::PathBuf;

    fn message(message: &str) -> String {
        message.to_string()
    }

    #[test]
    fn maps_the_error_taxonomy_to_statuses() {
        let cases = [
            (
                AppError::InputNotFound {
                    path: PathBuf::from("in/car.jpg"),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::ConflictingRequest {
                    message: message("both"),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::InvalidPayload {
                    message: message("bad"),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Domain(DomainError::InvalidAspectRatio(message("0:16"))),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::ValidationError {
                    message: message("name"),
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::NetworkError {
                    message: message("timeout"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::RemoteError {
                    status: 503,
                    message: message("down"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::ProtocolError {
                    message: message("json"),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::CompositionError {
                    message: message("decode"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                AppError::WriteError {
                    message: message("disk"),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(HttpError(error).status_code(), expected);
        }
    }

    #[tokio::test]
    async fn error_body_carries_the_message() {
        let response = HttpError(AppError::RemoteError {
            status: 503,
            message: message("Service Unavailable"),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["status"], 502);
        assert!(body["error"].as_str().unwrap().contains("503"));
    }
}
