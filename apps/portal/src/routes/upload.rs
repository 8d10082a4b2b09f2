use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::Utc;
use tracing::info;

use crate::backend::http::UPLOAD_FIELD;
use crate::errors::AppError;
use crate::state::AppState;
use crate::upload::{is_pdf_content_type, UploadAck};

/// POST /upload
///
/// Accepts one PDF in the `file` multipart field and stores it as the
/// current RFP document, replacing any previous upload.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadAck>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_pdf_content_type(&content_type) {
            return Err(AppError::UnsupportedMediaType(format!(
                "Only PDF files are accepted, got '{content_type}'"
            )));
        }
        let filename = field.file_name().map(String::from);

        let data = field.bytes().await?;
        if data.len() > state.max_upload_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} byte upload limit",
                state.max_upload_bytes
            )));
        }

        tokio::fs::create_dir_all(&state.data_dir).await?;
        let target = state.stored_pdf_path();
        let partial = target.with_extension("pdf.part");
        tokio::fs::write(&partial, &data).await?;
        tokio::fs::rename(&partial, &target).await?;

        info!(
            filename = filename.as_deref().unwrap_or("<unnamed>"),
            bytes = data.len(),
            "stored uploaded RFP document"
        );

        return Ok(Json(UploadAck {
            message: "Uploaded successfully".to_string(),
            filename,
            bytes: Some(data.len() as u64),
            uploaded_at: Some(Utc::now()),
        }));
    }

    Err(AppError::Validation(format!(
        "Missing '{UPLOAD_FIELD}' field in multipart body"
    )))
}
