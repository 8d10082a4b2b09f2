use std::io::ErrorKind;

use anyhow::Context;
use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::state::{AppState, STORED_PDF_NAME};
use crate::upload::PDF_CONTENT_TYPE;

/// GET /checklist_output
///
/// Serves the analysis result. 404 means the analysis has not produced it
/// yet, which clients treat as "not ready".
pub async fn handle_checklist_output(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let raw = match tokio::fs::read(state.checklist_output_path()).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound(
                "Analysis result is not available yet".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    };

    let report: Value = serde_json::from_slice(&raw)
        .context("Failed to read checklist data: stored result is not valid JSON")?;
    Ok(Json(report))
}

/// GET /relevant-tenders-report
///
/// Returns the stored PDF for inline viewing.
pub async fn handle_relevant_tenders_report(
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let pdf = match tokio::fs::read(state.stored_pdf_path()).await {
        Ok(pdf) => pdf,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(AppError::NotFound("PDF not found".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let disposition = format!("inline; filename=\"{STORED_PDF_NAME}\"");
    Ok((
        [
            (CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::routes::test_support::{get, router, send};

    #[tokio::test]
    async fn test_missing_checklist_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = router(&dir, 1024);

        let (status, content_type, body) = send(app, get("/checklist_output")).await;

        assert_eq!(status, 404);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let err: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(err["error"].is_string());
    }

    #[tokio::test]
    async fn test_checklist_served_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = router(&dir, 1024);
        std::fs::write(
            state.checklist_output_path(),
            r#"{"plan_of_action": [{"step": 1, "description": "Draft", "timeline": "1d"}]}"#,
        )
        .unwrap();

        let (status, content_type, body) = send(app, get("/checklist_output")).await;

        assert_eq!(status, 200);
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let report: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(report["plan_of_action"][0]["step"], 1);
    }

    #[tokio::test]
    async fn test_corrupt_checklist_is_500() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = router(&dir, 1024);
        std::fs::write(state.checklist_output_path(), "{oops").unwrap();

        let (status, _, _) = send(app, get("/checklist_output")).await;
        assert_eq!(status, 500);
    }

    #[tokio::test]
    async fn test_pdf_served_inline() {
        let dir = tempfile::tempdir().unwrap();
        let (app, state) = router(&dir, 1024);
        std::fs::write(state.stored_pdf_path(), b"%PDF-1.4").unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/relevant-tenders-report")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "application/pdf");
        assert_eq!(
            response.headers()["content-disposition"],
            "inline; filename=\"relevant_tenders_report.pdf\""
        );
    }

    #[tokio::test]
    async fn test_missing_pdf_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let (app, _) = router(&dir, 1024);

        let (status, _, _) = send(app, get("/relevant-tenders-report")).await;
        assert_eq!(status, 404);
    }
}
