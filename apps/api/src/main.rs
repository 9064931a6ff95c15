mod config;
mod db;
mod errors;
mod jobs;
mod llm_client;
mod outreach;
mod resume;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::jobs::context_store::{JobContextStore, MemoryJobContextStore, PgJobContextStore};
use crate::llm_client::LlmClient;
use crate::resume::loader::ResumeLoader;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Outreach API v{}", env!("CARGO_PKG_VERSION"));

    // A missing or blank key is fatal here, not on the first request.
    let llm = LlmClient::new(config.anthropic_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let job_contexts: Arc<dyn JobContextStore> = match &config.database_url {
        Some(url) => Arc::new(PgJobContextStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; job contexts are kept in memory only");
            Arc::new(MemoryJobContextStore::new())
        }
    };

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        job_contexts,
        resume_loader: Arc::new(ResumeLoader::new()),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
