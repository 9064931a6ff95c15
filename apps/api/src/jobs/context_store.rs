//! Job context persistence — condensed job snapshots keyed by job URL.
//!
//! Writers may race; the contract is last-write-wins, so `put_context` is an
//! upsert in every backend and `ensure_context` only skips work, never guards it.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use tracing::debug;

use crate::jobs::models::{CondensedJob, JobContext};

#[async_trait]
pub trait JobContextStore: Send + Sync {
    async fn get_context(&self, job_url: &str) -> Result<Option<JobContext>>;

    async fn put_context(&self, job_url: &str, job: &CondensedJob) -> Result<()>;
}

/// Stores the job's context unless one already exists for its URL.
/// Returns `true` when a new snapshot was written.
pub async fn ensure_context(store: &dyn JobContextStore, job: &CondensedJob) -> Result<bool> {
    let url = job.url().trim();
    if url.is_empty() {
        return Ok(false);
    }
    if store.get_context(url).await?.is_some() {
        debug!("Job context already stored for {url}");
        return Ok(false);
    }
    store.put_context(url, job).await?;
    Ok(true)
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory backend
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Used when no `DATABASE_URL` is configured, and in tests.
#[derive(Default)]
pub struct MemoryJobContextStore {
    contexts: RwLock<HashMap<String, JobContext>>,
}

impl MemoryJobContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.contexts.read().await.len()
    }
}

#[async_trait]
impl JobContextStore for MemoryJobContextStore {
    async fn get_context(&self, job_url: &str) -> Result<Option<JobContext>> {
        Ok(self.contexts.read().await.get(job_url).cloned())
    }

    async fn put_context(&self, job_url: &str, job: &CondensedJob) -> Result<()> {
        let mut context = JobContext::from_condensed(job);
        context.url = job_url.to_string();
        self.contexts
            .write()
            .await
            .insert(job_url.to_string(), context);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, FromRow)]
pub struct JobContextRow {
    pub url: String,
    pub title: String,
    pub company: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub technologies: Vec<String>,
    pub employment_type: String,
    pub updated_at: DateTime<Utc>,
}

impl From<JobContextRow> for JobContext {
    fn from(row: JobContextRow) -> Self {
        JobContext {
            title: row.title,
            company: row.company,
            url: row.url,
            responsibilities: row.responsibilities,
            requirements: row.requirements,
            technologies: row.technologies,
            employment_type: row.employment_type,
        }
    }
}

/// Backed by the `job_contexts` table (see `migrations/`).
pub struct PgJobContextStore {
    pool: PgPool,
}

impl PgJobContextStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobContextStore for PgJobContextStore {
    async fn get_context(&self, job_url: &str) -> Result<Option<JobContext>> {
        let row = sqlx::query_as::<_, JobContextRow>(
            r#"
            SELECT url, title, company, responsibilities, requirements, technologies,
                   employment_type, updated_at
            FROM job_contexts
            WHERE url = $1
            "#,
        )
        .bind(job_url)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = &row {
            debug!("Job context for {} last updated {}", row.url, row.updated_at);
        }
        Ok(row.map(JobContext::from))
    }

    async fn put_context(&self, job_url: &str, job: &CondensedJob) -> Result<()> {
        let context = JobContext::from_condensed(job);

        // Upsert: concurrent writers resolve as last-write-wins.
        sqlx::query(
            r#"
            INSERT INTO job_contexts
                (url, title, company, responsibilities, requirements, technologies,
                 employment_type, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            ON CONFLICT (url) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                responsibilities = EXCLUDED.responsibilities,
                requirements = EXCLUDED.requirements,
                technologies = EXCLUDED.technologies,
                employment_type = EXCLUDED.employment_type,
                updated_at = NOW()
            "#,
        )
        .bind(job_url)
        .bind(&context.title)
        .bind(&context.company)
        .bind(&context.responsibilities)
        .bind(&context.requirements)
        .bind(&context.technologies)
        .bind(&context.employment_type)
        .execute(&self.pool)
        .await?;

        debug!("Persisted job context for {job_url}");
        Ok(())
    }
}
