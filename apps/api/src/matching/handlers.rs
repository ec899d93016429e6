use axum::{extract::Path, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::ingest::handlers::{require_text, TextRequest};
use crate::matching::jd_parser::{parse_job_description, ParsedJobDescription};
use crate::matching::synonyms::{get_canonical_form, resolve_synonyms};

#[derive(Debug, Serialize)]
pub struct SynonymResponse {
    pub term: String,
    pub canonical: String,
    pub group: Vec<String>,
}

/// POST /api/v1/jobs/parse
pub async fn handle_parse_job(
    Json(req): Json<TextRequest>,
) -> Result<Json<ParsedJobDescription>, AppError> {
    require_text(&req.text)?;
    Ok(Json(parse_job_description(&req.text)))
}

/// GET /api/v1/synonyms/:term
pub async fn handle_synonyms(Path(term): Path<String>) -> Json<SynonymResponse> {
    Json(SynonymResponse {
        canonical: get_canonical_form(&term),
        group: resolve_synonyms(&term),
        term,
    })
}
