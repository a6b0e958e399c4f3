use axum::http::{HeaderMap, HeaderValue, header::CONTENT_LENGTH};
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

const PROCESS_ROUTE_PREFIX: &str = "/api/process/";

/// Which kind of image a processing route carries, from its path.
fn processing_kind(path: &str) -> Option<&'static str> {
    let route = path.strip_prefix(PROCESS_ROUTE_PREFIX)?;
    if route.starts_with("base64") {
        Some("inline")
    } else if route.starts_with("path") {
        Some("path")
    } else {
        None
    }
}

fn caller_request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|header| header.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

fn payload_len(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|header| header.to_str().ok())
        .and_then(|value| value.parse().ok())
}

fn tag(headers: &mut HeaderMap, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, value);
    }
}

/// Tags every request and response with `X-Request-Id`. Processing routes
/// additionally run inside an `image_request` span carrying the route, the
/// payload size and the elapsed time.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id =
        caller_request_id(request.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());
    tag(request.headers_mut(), &request_id);

    let route = request.uri().path().to_string();
    let Some(kind) = processing_kind(&route) else {
        let mut response = next.run(request).await;
        tag(response.headers_mut(), &request_id);
        return response;
    };

    let span = info_span!(
        "image_request",
        request_id = %request_id,
        route = %route,
        kind,
        payload_len = payload_len(request.headers()),
    );

    async move {
        let started = Instant::now();
        info!("Image request received");

        let mut response = next.run(request).await;
        tag(response.headers_mut(), &request_id);

        info!(
            status = %response.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Image request completed"
        );
        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request as HttpRequest, middleware, routing::get};
    use tower::ServiceExt;

    #[test]
    fn classifies_processing_routes() {
        assert_eq!(processing_kind("/api/process/base64"), Some("inline"));
        assert_eq!(processing_kind("/api/process/base64/randombg"), Some("inline"));
        assert_eq!(processing_kind("/api/process/path/randombg"), Some("path"));
        assert_eq!(processing_kind("/api/process/other"), None);
        assert_eq!(processing_kind("/health"), None);
    }

    #[test]
    fn blank_caller_ids_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));
        assert_eq!(caller_request_id(&headers), None);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static(" abc "));
        assert_eq!(caller_request_id(&headers).as_deref(), Some("abc"));

        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("2048"));
        assert_eq!(payload_len(&headers), Some(2048));
    }

    #[tokio::test]
    async fn generates_an_id_when_the_caller_sends_none() {
        let app = Router::new()
            .route("/api/process/path", get(|| async { "ok" }))
            .layer(middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(
                HttpRequest::get("/api/process/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }
}
