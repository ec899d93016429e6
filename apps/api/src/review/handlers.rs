use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::handlers::{parse_blocking, require_text, TextRequest};
use crate::models::resume::ResumeData;
use crate::review::actions::ReviewAction;
use crate::review::confidence::Confidence;
use crate::review::import::{ImportReview, ReviewSnapshot};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub session_id: Uuid,
    pub snapshot: ReviewSnapshot,
    pub confidence: BTreeMap<&'static str, Confidence>,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl ReviewView {
    fn new(session_id: Uuid, review: &ImportReview) -> Self {
        Self {
            session_id,
            snapshot: review.snapshot().clone(),
            confidence: review.confidence_report(),
            can_undo: review.can_undo(),
            can_redo: review.can_redo(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CommitRequest {
    /// Existing resume to merge the import into. Defaults to an empty resume.
    #[serde(default)]
    pub base: Option<ResumeData>,
}

#[derive(Debug, Serialize)]
pub struct CommitResponse {
    pub resume: ResumeData,
    pub issues: Vec<String>,
}

/// POST /api/v1/imports
pub async fn handle_create_import(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<(StatusCode, Json<ReviewView>), AppError> {
    require_text(&req.text)?;
    let parsed = parse_blocking(req.text).await?;
    let review = ImportReview::from_parse_result(parsed);
    let mut view = ReviewView::new(Uuid::nil(), &review);
    let id = state.sessions.create(review).await;
    view.session_id = id;
    info!(session_id = %id, unmatched = view.snapshot.unmatched_chunks.len(), "Import review started");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/imports/:id
pub async fn handle_get_import(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| ReviewView::new(id, &s.review))
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/imports/:id/actions
/// Unresolvable actions leave the review unchanged; the current view is returned either way.
pub async fn handle_apply_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(action): Json<ReviewAction>,
) -> Result<Json<ReviewView>, AppError> {
    let name = action.name();
    let (applied, view) = state
        .sessions
        .with_session(id, |s| {
            let applied = action.apply(&mut s.review);
            (applied, ReviewView::new(id, &s.review))
        })
        .await?;
    debug!(session_id = %id, action = name, applied, "Review action");
    Ok(Json(view))
}

/// POST /api/v1/imports/:id/undo
pub async fn handle_undo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.review.undo();
            ReviewView::new(id, &s.review)
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/imports/:id/redo
pub async fn handle_redo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewView>, AppError> {
    let view = state
        .sessions
        .with_session(id, |s| {
            s.review.redo();
            ReviewView::new(id, &s.review)
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/imports/:id/commit
/// Folds the reviewed sections into `base` and closes the session.
pub async fn handle_commit_import(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<CommitResponse>, AppError> {
    let session = state.sessions.remove(id).await?;
    let mut resume = req.base.unwrap_or_default();
    resume.merge_partial(session.review.build_partial_resume_data());
    let issues = resume.validation_issues();
    info!(session_id = %id, issues = issues.len(), "Import review committed");
    Ok(Json(CommitResponse { resume, issues }))
}

/// DELETE /api/v1/imports/:id
pub async fn handle_discard_import(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    debug!(session_id = %id, "Import review discarded");
    Ok(StatusCode::NO_CONTENT)
}
