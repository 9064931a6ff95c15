pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::outreach::handlers as outreach;
use crate::resume::handlers as resume;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume API
        .route("/api/v1/resume/parse", post(resume::handle_parse_resume))
        .route("/api/v1/resume/load", post(resume::handle_load_resume))
        .route("/api/v1/resume/cache/clear", post(resume::handle_clear_cache))
        // Jobs API
        .route("/api/v1/jobs/condense", post(jobs::handle_condense))
        .route("/api/v1/jobs/rank", post(jobs::handle_rank))
        .route("/api/v1/jobs/context", get(jobs::handle_get_context))
        // Outreach API
        .route(
            "/api/v1/outreach/linkedin",
            post(outreach::handle_linkedin_message),
        )
        .route("/api/v1/outreach/email", post(outreach::handle_email_content))
        .route(
            "/api/v1/outreach/match",
            post(outreach::handle_match_recruiters),
        )
        .with_state(state)
}
