//! Axum route handlers for the Outreach API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::jobs::models::CondensedJob;
use crate::outreach::budget::{AccountTier, CharBudget};
use crate::outreach::email::generate_email_content;
use crate::outreach::matching::{match_recruiters, JobRecruiterMatch};
use crate::outreach::message::{generate_for_content, MessageTarget};
use crate::outreach::models::{ContentKind, EmailContent, GeneratedMessage, Recruiter, ResumeContent};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LinkedInRequest {
    pub resume_content: String,
    /// Provenance of `resume_content`. Guessed from the text when omitted.
    #[serde(default)]
    pub resume_kind: Option<ContentKind>,
    pub recipient_name: String,
    pub job_title: String,
    pub company_name: String,
    #[serde(default)]
    pub is_premium: bool,
}

#[derive(Debug, Serialize)]
pub struct LinkedInResponse {
    pub tier: AccountTier,
    pub char_limit: usize,
    pub message: GeneratedMessage,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub job_titles: Vec<String>,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    pub recruiter: Recruiter,
    pub resume_bullets: String,
}

fn default_job_type() -> String {
    "Full-time".to_string()
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub jobs: Vec<CondensedJob>,
    pub recruiters: Vec<Recruiter>,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub matches: Vec<JobRecruiterMatch>,
    pub unmatched_jobs: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/outreach/linkedin
///
/// Generates a connection message within the tier's character limit.
pub async fn handle_linkedin_message(
    State(state): State<AppState>,
    Json(request): Json<LinkedInRequest>,
) -> Result<Json<LinkedInResponse>, AppError> {
    for (field, value) in [
        ("resume_content", &request.resume_content),
        ("recipient_name", &request.recipient_name),
        ("job_title", &request.job_title),
        ("company_name", &request.company_name),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} cannot be empty")));
        }
    }

    let content = match request.resume_kind {
        Some(ContentKind::ParsedBullets) => ResumeContent::bullets(request.resume_content),
        Some(ContentKind::RawText) => ResumeContent::raw(request.resume_content),
        None => ResumeContent::classified(request.resume_content),
    };
    let tier = AccountTier::from_premium_flag(request.is_premium);
    let budget = CharBudget::for_tier(tier);
    let target = MessageTarget {
        recipient_name: &request.recipient_name,
        job_title: &request.job_title,
        company_name: &request.company_name,
    };

    let message = generate_for_content(state.llm.as_ref(), &content, target, budget.char_limit).await?;

    Ok(Json(LinkedInResponse {
        tier,
        char_limit: budget.char_limit,
        message,
    }))
}

/// POST /api/v1/outreach/email
///
/// Always returns a usable subject and body; falls back to a template when
/// the model cannot help.
pub async fn handle_email_content(
    State(state): State<AppState>,
    Json(request): Json<EmailRequest>,
) -> Result<Json<EmailContent>, AppError> {
    if request.recruiter.company.trim().is_empty() {
        return Err(AppError::Validation("recruiter.company cannot be empty".to_string()));
    }

    let content = generate_email_content(
        state.llm.as_ref(),
        &request.job_titles,
        &request.job_type,
        &request.recruiter,
        &request.resume_bullets,
    )
    .await;

    Ok(Json(content))
}

/// POST /api/v1/outreach/match
///
/// Pairs ranked jobs with recruiters at the same company, keeping job order.
pub async fn handle_match_recruiters(
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    if request.jobs.is_empty() {
        return Err(AppError::Validation("jobs cannot be empty".to_string()));
    }

    let matches = match_recruiters(&request.jobs, &request.recruiters);
    let unmatched_jobs = matches.iter().filter(|m| m.recruiters.is_empty()).count();

    Ok(Json(MatchResponse {
        matches,
        unmatched_jobs,
    }))
}
