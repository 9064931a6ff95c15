use std::sync::Arc;

use crate::config::Config;
use crate::jobs::context_store::JobContextStore;
use crate::llm_client::ChatModel;
use crate::resume::loader::ResumeLoader;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Chat model behind every LLM call. `LlmClient` in production.
    pub llm: Arc<dyn ChatModel>,
    /// Postgres-backed when `DATABASE_URL` is set, in-memory otherwise.
    pub job_contexts: Arc<dyn JobContextStore>,
    pub resume_loader: Arc<ResumeLoader>,
    #[allow(dead_code)]
    pub config: Config,
}
