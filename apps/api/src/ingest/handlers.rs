use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::ingest::extract::UploadedDocument;
use crate::ingest::{parse_resume_text, ResumeParseResult};
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Rejects blank request text. The parsers accept it; this guard is HTTP-only.
pub(crate) fn require_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("text must not be empty".to_string()));
    }
    Ok(())
}

/// Runs the resume parser off the async executor.
pub(crate) async fn parse_blocking(text: String) -> Result<ResumeParseResult, AppError> {
    tokio::task::spawn_blocking(move || parse_resume_text(&text))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume parse: {e}")))
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    Json(req): Json<TextRequest>,
) -> Result<Json<ResumeParseResult>, AppError> {
    require_text(&req.text)?;
    let result = parse_blocking(req.text).await?;
    Ok(Json(result))
}

/// POST /api/v1/resumes/upload
/// Multipart body with a `file` field holding a PDF or plain-text resume.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ResumeParseResult>, AppError> {
    let mut document: Option<UploadedDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        document = Some(UploadedDocument {
            file_name,
            content_type,
            bytes,
        });
        break;
    }

    let document = document
        .ok_or_else(|| AppError::Validation(format!("Missing multipart field '{UPLOAD_FIELD}'")))?;
    info!(
        file_name = document.file_name.as_deref().unwrap_or("-"),
        bytes = document.bytes.len(),
        "Resume upload received"
    );

    let text = state.extractor.extract(document).await?;
    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "No text could be extracted from the document".to_string(),
        ));
    }

    let result = parse_blocking(text).await?;
    debug!(unmatched = result.unmatched_chunks.len(), "Parsed uploaded resume");
    Ok(Json(result))
}
