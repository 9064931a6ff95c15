//! Axum route handlers for the Resume API.

use std::path::PathBuf;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::bullets::render_bullets;
use crate::resume::extractor::extract_resume_record;
use crate::resume::models::ResumeRecord;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub record: ResumeRecord,
    pub bullets: String,
}

#[derive(Debug, Deserialize)]
pub struct LoadResumeRequest {
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct LoadResumeResponse {
    pub text: String,
    pub char_count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClearCacheRequest {
    /// Only this file is evicted when set.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub cleared: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/parse
///
/// Extracts a structured record from raw resume text and renders its bullets.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ParseResumeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let record = extract_resume_record(&request.resume_text, state.llm.as_ref()).await?;
    let bullets = render_bullets(&record);

    Ok(Json(ParseResumeResponse { record, bullets }))
}

/// POST /api/v1/resume/load
///
/// Reads a PDF or text resume from disk. PDF extraction runs on the blocking pool.
pub async fn handle_load_resume(
    State(state): State<AppState>,
    Json(request): Json<LoadResumeRequest>,
) -> Result<Json<LoadResumeResponse>, AppError> {
    if request.path.as_os_str().is_empty() {
        return Err(AppError::Validation("path cannot be empty".to_string()));
    }

    let loader = state.resume_loader.clone();
    let text = tokio::task::spawn_blocking(move || loader.load(&request.path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("resume load task failed: {e}")))??;

    Ok(Json(LoadResumeResponse {
        char_count: text.chars().count(),
        text,
    }))
}

/// POST /api/v1/resume/cache/clear
///
/// Drops cached resume text, for one file or all of them. Call after a
/// resume is re-uploaded.
pub async fn handle_clear_cache(
    State(state): State<AppState>,
    request: Option<Json<ClearCacheRequest>>,
) -> Result<Json<ClearCacheResponse>, AppError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let before = state.resume_loader.cached_count();

    match request.path {
        Some(path) => state.resume_loader.invalidate(&path)?,
        None => state.resume_loader.clear_cache()?,
    }

    let cleared = before.saturating_sub(state.resume_loader.cached_count());
    Ok(Json(ClearCacheResponse { cleared }))
}
