//! Job Condenser — compresses a scraped job description into three short sections.
//!
//! One LLM call per job, no retries. This path NEVER fails: any problem yields
//! the deterministic placeholder so a single bad posting cannot sink a ranking run.

use tracing::{debug, warn};

use crate::jobs::models::{CondensedJob, JobPosting};
use crate::jobs::prompts::CONDENSE_PROMPT_TEMPLATE;
use crate::llm_client::ChatModel;

/// Descriptions are cut to this many characters before prompting.
const MAX_DESCRIPTION_CHARS: usize = 4000;

/// Condenses one job description. Infallible by contract.
pub async fn condense_job(description: &str, title: &str, llm: &dyn ChatModel) -> String {
    let description = description.trim();
    if description.is_empty() {
        debug!("Empty description for '{title}'; using placeholder");
        return placeholder(title);
    }

    let prompt = CONDENSE_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{description}", truncate_chars(description, MAX_DESCRIPTION_CHARS));

    match llm.invoke_text(&prompt).await {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            warn!("Condensation of '{title}' returned empty text; using placeholder");
            placeholder(title)
        }
        Err(e) => {
            warn!("Condensation of '{title}' failed: {e}; using placeholder");
            placeholder(title)
        }
    }
}

/// Condenses every posting in order. Ranking must not start until this returns.
pub async fn condense_postings(postings: Vec<JobPosting>, llm: &dyn ChatModel) -> Vec<CondensedJob> {
    let mut condensed = Vec::with_capacity(postings.len());
    for posting in postings {
        let text = condense_job(&posting.description, &posting.title, llm).await;
        condensed.push(posting.into_condensed(text));
    }
    condensed
}

/// The text returned whenever condensation cannot produce real output.
pub fn placeholder(title: &str) -> String {
    format!("RESP: {title} duties\nREQ: Not available\nTECH: Not specified")
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::LlmError;

    const CONDENSED: &str =
        "RESPONSIBILITIES:\n- Build APIs\nREQUIREMENTS:\n- Rust\nKEY TECHNOLOGIES:\n- Tokio";

    #[tokio::test]
    async fn test_condense_returns_model_text() {
        let model = ScriptedModel::new().reply(CONDENSED);
        let text = condense_job("We build APIs in Rust.", "Backend Engineer", &model).await;
        assert_eq!(text, CONDENSED);
        assert!(model.prompts()[0].contains("\"Backend Engineer\""));
    }

    #[tokio::test]
    async fn test_empty_description_returns_placeholder_without_model_call() {
        let model = ScriptedModel::new();
        let text = condense_job("   ", "Data Engineer", &model).await;
        assert_eq!(
            text,
            "RESP: Data Engineer duties\nREQ: Not available\nTECH: Not specified"
        );
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_model_failure_returns_placeholder() {
        let model = ScriptedModel::new().fail(LlmError::EmptyContent);
        let text = condense_job("Some description", "SRE", &model).await;
        assert_eq!(text, placeholder("SRE"));
    }

    #[tokio::test]
    async fn test_blank_model_reply_returns_placeholder() {
        let model = ScriptedModel::new().reply("   ");
        let text = condense_job("Some description", "SRE", &model).await;
        assert_eq!(text, placeholder("SRE"));
    }

    #[tokio::test]
    async fn test_long_description_is_truncated_in_prompt() {
        let model = ScriptedModel::always(CONDENSED);
        let description = "é".repeat(MAX_DESCRIPTION_CHARS + 500);
        condense_job(&description, "SWE", &model).await;
        let prompt = &model.prompts()[0];
        assert_eq!(prompt.matches('é').count(), MAX_DESCRIPTION_CHARS);
    }

    #[tokio::test]
    async fn test_condense_postings_preserves_order_and_overwrites_description() {
        let model = ScriptedModel::new().reply("first").reply("second");
        let postings = vec![
            JobPosting {
                title: "A".to_string(),
                company: "X".to_string(),
                url: "u1".to_string(),
                description: "long a".to_string(),
                employment_type: "Internship".to_string(),
                location: None,
            },
            JobPosting {
                title: "B".to_string(),
                company: "Y".to_string(),
                url: "u2".to_string(),
                description: "long b".to_string(),
                employment_type: "Full-time".to_string(),
                location: None,
            },
        ];
        let condensed = condense_postings(postings, &model).await;
        assert_eq!(condensed[0].posting.description, "first");
        assert_eq!(condensed[1].condensed_description, "second");
        assert_eq!(condensed[1].url(), "u2");
    }
}
