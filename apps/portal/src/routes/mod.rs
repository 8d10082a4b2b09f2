//! Dev analysis backend: the upload, result and artifact endpoints the
//! client talks to, backed by a local data directory.

pub mod health;
pub mod report;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/upload",
            post(upload::handle_upload).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/checklist_output", get(report::handle_checklist_output))
        .route(
            "/relevant-tenders-report",
            get(report::handle_relevant_tenders_report),
        )
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{body::Body, http::Request, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::build_router;
    use crate::state::AppState;

    pub const BOUNDARY: &str = "rfp-portal-test-boundary";

    pub fn router(dir: &tempfile::TempDir, max_upload_bytes: usize) -> (Router, AppState) {
        let state = AppState {
            data_dir: dir.path().to_path_buf(),
            max_upload_bytes,
        };
        (build_router(state.clone()), state)
    }

    pub fn multipart_body(field: &str, content_type: &str, contents: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"tender.pdf\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(contents);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    pub fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    /// Sends one request and returns status, content type and body bytes.
    pub async fn send(router: Router, request: Request<Body>) -> (u16, Option<String>, Vec<u8>) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get("content-type")
            .map(|v| v.to_str().unwrap().to_string());
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, content_type, body.to_vec())
    }
}
