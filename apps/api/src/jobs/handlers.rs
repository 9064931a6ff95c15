//! Axum route handlers for the Jobs API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::condenser::condense_postings;
use crate::jobs::models::{CondensedJob, JobContext, JobPosting};
use crate::jobs::pipeline::{run_ranking_session, RankingSession};
use crate::jobs::ranker::RankingMode;
use crate::state::AppState;

const DEFAULT_TOP_K: usize = 5;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CondenseRequest {
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Serialize)]
pub struct CondenseResponse {
    pub jobs: Vec<CondensedJob>,
}

#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub jobs: Vec<JobPosting>,
    pub resume_bullets: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Deserialize)]
pub struct ContextQuery {
    pub url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/condense
///
/// Condenses each posting into the three-section format. Never fails per job:
/// a posting the model cannot condense gets the placeholder text.
pub async fn handle_condense(
    State(state): State<AppState>,
    Json(request): Json<CondenseRequest>,
) -> Result<Json<CondenseResponse>, AppError> {
    if request.jobs.is_empty() {
        return Err(AppError::Validation("jobs cannot be empty".to_string()));
    }

    let jobs = condense_postings(request.jobs, state.llm.as_ref()).await;
    Ok(Json(CondenseResponse { jobs }))
}

/// POST /api/v1/jobs/rank
///
/// Full selection pipeline: condense → persist contexts → rank → select.
/// A degraded (fallback-order) ranking is still a 200; only an unavailable
/// ranking is an error.
pub async fn handle_rank(
    State(state): State<AppState>,
    Json(request): Json<RankRequest>,
) -> Result<Json<RankingSession>, AppError> {
    if request.jobs.is_empty() {
        return Err(AppError::Validation("jobs cannot be empty".to_string()));
    }
    if request.resume_bullets.trim().is_empty() {
        return Err(AppError::Validation("resume_bullets cannot be empty".to_string()));
    }

    let session = run_ranking_session(
        request.jobs,
        &request.resume_bullets,
        request.top_k,
        state.llm.as_ref(),
        state.job_contexts.as_ref(),
    )
    .await;

    if session.outcome.mode == RankingMode::Unavailable {
        return Err(AppError::Unavailable("Job ranking".to_string()));
    }

    Ok(Json(session))
}

/// GET /api/v1/jobs/context?url=...
///
/// Returns the persisted context snapshot for a job URL.
pub async fn handle_get_context(
    State(state): State<AppState>,
    Query(query): Query<ContextQuery>,
) -> Result<Json<JobContext>, AppError> {
    let url = query.url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }

    state
        .job_contexts
        .get_context(url)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No job context stored for {url}")))
}
