use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::scoring::ats::{compute_ats_score, AtsScoreResult};

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub resume: ResumeData,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// POST /api/v1/resumes/score
pub async fn handle_score_resume(
    Json(req): Json<ScoreRequest>,
) -> Result<Json<AtsScoreResult>, AppError> {
    let result = tokio::task::spawn_blocking(move || {
        compute_ats_score(&req.resume, req.job_description.as_deref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in ATS scoring: {e}")))?;
    Ok(Json(result))
}
