//! Job Relevance Ranker — asks the model to rank condensed jobs, then maps the
//! free-text ranking back to job URLs.
//!
//! The ranking reply is NOT a typed object. Models drift between formats, so
//! each line is offered to an ordered chain of `RankPattern`s; the first match
//! wins. When no line matches at all, the result degrades to the first K jobs
//! in input order instead of failing the pipeline.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::jobs::models::CondensedJob;
use crate::jobs::prompts::{JOB_SEPARATOR, RANK_PROMPT_TEMPLATE};
use crate::llm_client::ChatModel;

lazy_static! {
    static ref BRACKETED: Regex = Regex::new(r"(?i)(\d+)\.\s*\[Job\s*#(\d+)\]").unwrap();
    static ref PLAIN: Regex = Regex::new(r"(?i)(\d+)\.\s*Job\s*#(\d+)").unwrap();
    static ref LEADING_ORDINAL: Regex = Regex::new(r"^\s*(\d+)[.):]").unwrap();
    static ref BARE_JOB_REF: Regex = Regex::new(r"(?i)Job\s*#(\d+)").unwrap();
}

/// One recognizable shape of a ranking line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankPattern {
    /// `1. [Job #3] Title at Company`
    Bracketed,
    /// `1. Job #3: Title at Company`
    Plain,
    /// `1) Backend role (Job #3)`, only when the line opens with an ordinal.
    BareAfterOrdinal,
}

impl RankPattern {
    /// Tried in this order; the first pattern that matches a line wins.
    pub const CHAIN: [RankPattern; 3] = [
        RankPattern::Bracketed,
        RankPattern::Plain,
        RankPattern::BareAfterOrdinal,
    ];

    /// Returns `(rank, job_number)` if the line has this shape.
    pub fn match_line(self, line: &str) -> Option<(usize, usize)> {
        match self {
            RankPattern::Bracketed => capture_pair(&BRACKETED, line),
            RankPattern::Plain => capture_pair(&PLAIN, line),
            RankPattern::BareAfterOrdinal => {
                let rank = LEADING_ORDINAL.captures(line)?.get(1)?.as_str().parse().ok()?;
                let job = BARE_JOB_REF.captures(line)?.get(1)?.as_str().parse().ok()?;
                Some((rank, job))
            }
        }
    }
}

fn capture_pair(re: &Regex, line: &str) -> Option<(usize, usize)> {
    let caps = re.captures(line)?;
    let rank = caps.get(1)?.as_str().parse().ok()?;
    let job = caps.get(2)?.as_str().parse().ok()?;
    Some((rank, job))
}

/// How the returned order was obtained. Callers log these at different severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMode {
    /// URLs came from the model's ranking.
    Ranked,
    /// Nothing in the ranking was recognizable; first K jobs in input order.
    FallbackOrder,
    /// No jobs, no URLs, or the model call failed.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingOutcome {
    pub ranking_text: Option<String>,
    pub ordered_urls: Vec<String>,
    pub mode: RankingMode,
}

impl RankingOutcome {
    fn unavailable() -> Self {
        Self {
            ranking_text: None,
            ordered_urls: Vec::new(),
            mode: RankingMode::Unavailable,
        }
    }
}

/// Ranks condensed jobs against the candidate's resume bullets.
///
/// Returns `RankingMode::Unavailable` with no text only when there is nothing
/// to rank, no posting carries a URL, or the model call itself failed. Every
/// other case returns best-effort URLs.
pub async fn rank_jobs(
    jobs: &[CondensedJob],
    resume_bullets: &str,
    top_k: usize,
    llm: &dyn ChatModel,
) -> RankingOutcome {
    if jobs.is_empty() {
        error!("Ranking requested with no jobs");
        return RankingOutcome::unavailable();
    }
    if jobs.iter().all(|j| j.url().trim().is_empty()) {
        error!("None of the {} jobs carries a URL; cannot rank", jobs.len());
        return RankingOutcome::unavailable();
    }

    let top_k = top_k.max(1);
    let prompt = RANK_PROMPT_TEMPLATE
        .replace("{resume_bullets}", resume_bullets)
        .replace("{jobs_block}", &format_jobs_for_ranking(jobs))
        .replace("{job_count}", &jobs.len().to_string())
        .replace("{top_k}", &top_k.min(jobs.len()).to_string());

    let ranking_text = match llm.invoke_text(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            error!("Ranking model call failed: {e}");
            return RankingOutcome::unavailable();
        }
    };

    let (ordered_urls, mode) = resolve_ranked_urls(&ranking_text, jobs, top_k);
    match mode {
        RankingMode::Ranked => info!(
            "Ranked {} of {} jobs from model output",
            ordered_urls.len(),
            jobs.len()
        ),
        _ => warn!(
            "Ranking output unrecognizable; degraded to first {} jobs in input order",
            ordered_urls.len()
        ),
    }

    RankingOutcome {
        ranking_text: Some(ranking_text),
        ordered_urls,
        mode,
    }
}

/// Renders every condensed job into one numbered prompt block.
pub fn format_jobs_for_ranking(jobs: &[CondensedJob]) -> String {
    jobs.iter()
        .enumerate()
        .map(|(i, job)| {
            format!(
                "JOB #{}:\nTITLE: {}\nCOMPANY: {}\n{}\nTYPE: {}\n{}",
                i + 1,
                job.posting.title,
                job.posting.company,
                job.condensed_description.trim(),
                job.posting.employment_type,
                JOB_SEPARATOR
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Maps a free-text ranking back to job URLs, best first.
///
/// Never fails: if no line is recognizable, returns the first `top_k` URLs
/// in input order.
pub fn extract_top_job_urls(ranking_text: &str, jobs: &[CondensedJob], top_k: usize) -> Vec<String> {
    resolve_ranked_urls(ranking_text, jobs, top_k).0
}

fn resolve_ranked_urls(
    ranking_text: &str,
    jobs: &[CondensedJob],
    top_k: usize,
) -> (Vec<String>, RankingMode) {
    let top_k = top_k.max(1);
    let mut pairs: Vec<(usize, usize)> = ranking_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            RankPattern::CHAIN
                .iter()
                .find_map(|pattern| pattern.match_line(line))
        })
        .collect();
    pairs.sort_by_key(|(rank, _)| *rank);

    let mut seen = HashSet::new();
    let mut urls = Vec::new();
    for (_, job_number) in pairs {
        let Some(job) = job_number.checked_sub(1).and_then(|idx| jobs.get(idx)) else {
            warn!("Ranking referenced Job #{job_number}, outside 1..={}", jobs.len());
            continue;
        };
        let url = job.url().trim();
        if url.is_empty() || !seen.insert(url.to_string()) {
            continue;
        }
        urls.push(url.to_string());
        if urls.len() == top_k {
            break;
        }
    }

    if !urls.is_empty() || jobs.is_empty() {
        return (urls, RankingMode::Ranked);
    }

    let fallback = jobs
        .iter()
        .map(|j| j.url().trim())
        .filter(|url| !url.is_empty())
        .take(top_k)
        .map(str::to_string)
        .collect();
    (fallback, RankingMode::FallbackOrder)
}
