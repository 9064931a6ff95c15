//! Ranking session — orchestrates the full job selection pipeline.
//!
//! Flow: condense every posting → persist context snapshots → rank →
//!       select jobs in ranked order.
//!
//! Condensation finishes for ALL jobs before ranking starts: the ranker reads
//! condensed text, never raw descriptions.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::jobs::condenser::condense_postings;
use crate::jobs::context_store::{ensure_context, JobContextStore};
use crate::jobs::models::{CondensedJob, JobPosting};
use crate::jobs::ranker::{rank_jobs, RankingOutcome};
use crate::llm_client::ChatModel;

#[derive(Debug, Clone, Serialize)]
pub struct RankingSession {
    pub session_id: Uuid,
    pub outcome: RankingOutcome,
    /// Jobs in ranked order, resolved from `outcome.ordered_urls`.
    pub selected_jobs: Vec<CondensedJob>,
    pub condensed_count: usize,
}

pub async fn run_ranking_session(
    postings: Vec<JobPosting>,
    resume_bullets: &str,
    top_k: usize,
    llm: &dyn ChatModel,
    store: &dyn JobContextStore,
) -> RankingSession {
    let session_id = Uuid::new_v4();
    info!(
        "Ranking session {session_id}: {} postings, top_k={top_k}",
        postings.len()
    );

    let condensed = condense_postings(postings, llm).await;

    for job in &condensed {
        // A failed snapshot only costs a later re-condense; never abort ranking for it.
        if let Err(e) = ensure_context(store, job).await {
            warn!(
                "Session {session_id}: failed to persist context for {}: {e:#}",
                job.url()
            );
        }
    }

    let outcome = rank_jobs(&condensed, resume_bullets, top_k, llm).await;
    let selected_jobs = select_in_order(&condensed, &outcome.ordered_urls);

    info!(
        "Ranking session {session_id} finished: mode={:?}, selected={}",
        outcome.mode,
        selected_jobs.len()
    );

    RankingSession {
        session_id,
        outcome,
        selected_jobs,
        condensed_count: condensed.len(),
    }
}

fn select_in_order(jobs: &[CondensedJob], urls: &[String]) -> Vec<CondensedJob> {
    urls.iter()
        .filter_map(|url| jobs.iter().find(|j| j.url().trim() == url.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::context_store::MemoryJobContextStore;
    use crate::jobs::ranker::RankingMode;
    use crate::llm_client::testing::ScriptedModel;

    fn posting(n: usize) -> JobPosting {
        JobPosting {
            title: format!("Role {n}"),
            company: format!("Co{n}"),
            url: format!("https://jobs.example/{n}"),
            description: format!("Description for role {n}"),
            employment_type: "Full-time".to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn test_session_condenses_persists_and_ranks() {
        let model = ScriptedModel::new()
            .reply("RESPONSIBILITIES:\n- one")
            .reply("RESPONSIBILITIES:\n- two")
            .reply("RESPONSIBILITIES:\n- three")
            .reply("1. [Job #3] Role 3 at Co3\n2. [Job #1] Role 1 at Co1");
        let store = MemoryJobContextStore::new();

        let session = run_ranking_session(
            (1..=3).map(posting).collect(),
            "• Name: Jane",
            2,
            &model,
            &store,
        )
        .await;

        assert_eq!(session.condensed_count, 3);
        assert_eq!(session.outcome.mode, RankingMode::Ranked);
        let titles: Vec<&str> = session
            .selected_jobs
            .iter()
            .map(|j| j.posting.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Role 3", "Role 1"]);
        assert_eq!(store.len().await, 3);

        // The ranking prompt must see condensed text, not raw descriptions.
        let rank_prompt = model.prompts().last().cloned().unwrap();
        assert!(rank_prompt.contains("- three"));
        assert!(!rank_prompt.contains("Description for role 3"));
    }

    #[tokio::test]
    async fn test_session_with_no_postings_is_unavailable() {
        let model = ScriptedModel::new();
        let store = MemoryJobContextStore::new();
        let session = run_ranking_session(vec![], "bullets", 2, &model, &store).await;
        assert_eq!(session.outcome.mode, RankingMode::Unavailable);
        assert!(session.selected_jobs.is_empty());
        assert_eq!(model.call_count(), 0);
    }
}
