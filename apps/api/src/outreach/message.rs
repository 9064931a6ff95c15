//! LinkedIn Message Generator — character-budgeted connection messages.
//!
//! State machine:
//!   classify resume content → derive target window → initial generation →
//!   corrective regeneration (≤ MAX_REGENERATION_ATTEMPTS) → expand if short →
//!   trim if over the hard limit.
//!
//! Length problems are never errors: the result is always ≤ `char_limit`.
//! Model failures are: the initial call propagates, and a loop in which every
//! regeneration call failed re-raises the last error.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{ChatModel, LlmError};
use crate::outreach::budget::{
    char_len, expand_with_closings, trim_to_limit, CharBudget, FailureDirection,
};
use crate::outreach::models::{ContentKind, GeneratedMessage, LengthOutcome, ResumeContent};
use crate::outreach::prompts::{
    LINKEDIN_CLOSING, LINKEDIN_PROMPT_TEMPLATE, LINKEDIN_TOO_LONG_TEMPLATE,
    LINKEDIN_TOO_SHORT_TEMPLATE,
};
use crate::resume::bullets::resume_to_bullets;

/// Corrective regenerations after the initial call. Bounds worst-case latency.
pub const MAX_REGENERATION_ATTEMPTS: u32 = 10;
/// Raw resume text is cut to this many chars when bullet extraction fails.
const RAW_RESUME_FALLBACK_CHARS: usize = 1500;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message generation model call failed: {0}")]
    Model(#[from] LlmError),
}

/// Who the message is for and what it is about.
#[derive(Debug, Clone, Copy)]
pub struct MessageTarget<'a> {
    pub recipient_name: &'a str,
    pub job_title: &'a str,
    pub company_name: &'a str,
}

impl MessageTarget<'_> {
    pub fn opening(&self) -> String {
        format!(
            "Dear {}, I'm interested in the {} position at {}.",
            self.recipient_name.trim(),
            self.job_title.trim(),
            self.company_name.trim()
        )
    }
}

/// Generates a message from untagged resume text, classifying it heuristically.
pub async fn generate_linkedin_message(
    llm: &dyn ChatModel,
    resume_content: &str,
    recipient_name: &str,
    job_title: &str,
    company_name: &str,
    char_limit: usize,
) -> Result<GeneratedMessage, MessageError> {
    let target = MessageTarget {
        recipient_name,
        job_title,
        company_name,
    };
    generate_for_content(
        llm,
        &ResumeContent::classified(resume_content),
        target,
        char_limit,
    )
    .await
}

/// Generates a message from resume text whose provenance is already known.
pub async fn generate_for_content(
    llm: &dyn ChatModel,
    content: &ResumeContent,
    target: MessageTarget<'_>,
    char_limit: usize,
) -> Result<GeneratedMessage, MessageError> {
    let budget = CharBudget::for_limit(char_limit);
    let bullets = prepare_resume_bullets(content, llm).await;
    let opening = target.opening();

    let prompt = LINKEDIN_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{resume_bullets}", &bullets)
        .replace("{opening}", &opening)
        .replace("{closing}", LINKEDIN_CLOSING)
        .replace("{target_min}", &budget.target_min.to_string())
        .replace("{target_max}", &budget.target_max.to_string())
        .replace("{char_limit}", &budget.char_limit.to_string());

    let mut message = clean_message(&llm.invoke_text(&prompt).await?);
    let mut regenerations = 0u32;
    let mut failed_calls = 0u32;
    let mut last_error: Option<LlmError> = None;

    while regenerations < MAX_REGENERATION_ATTEMPTS {
        let Some(direction) = budget.failure_direction(char_len(&message)) else {
            break;
        };
        regenerations += 1;
        debug!(
            "Regeneration {}/{}: {:?} at {} chars (window {}-{})",
            regenerations,
            MAX_REGENERATION_ATTEMPTS,
            direction,
            char_len(&message),
            budget.target_min,
            budget.target_max
        );

        let prompt = build_corrective_prompt(direction, &message, &budget, &bullets, &opening);
        match llm.invoke_text(&prompt).await {
            Ok(reply) => {
                let cleaned = clean_message(&reply);
                if !cleaned.is_empty() {
                    message = cleaned;
                }
            }
            Err(e) => {
                warn!("Regeneration attempt {regenerations} failed: {e}");
                failed_calls += 1;
                last_error = Some(e);
            }
        }
    }

    if failed_calls == MAX_REGENERATION_ATTEMPTS {
        if let Some(e) = last_error {
            return Err(MessageError::Model(e));
        }
    }

    let mut outcome = match budget.failure_direction(char_len(&message)) {
        None => LengthOutcome::OnTarget,
        Some(_) => LengthOutcome::AcceptedOutsideTarget,
    };

    if char_len(&message) < budget.target_min {
        let expanded = expand_with_closings(&message, &budget);
        if expanded != message {
            debug!(
                "Expanded message from {} to {} chars",
                char_len(&message),
                char_len(&expanded)
            );
            message = expanded;
            outcome = LengthOutcome::Expanded;
        }
    }

    if char_len(&message) > budget.char_limit {
        let trimmed = trim_to_limit(&message, budget.char_limit);
        debug!(
            "Trimmed message from {} to {} chars",
            char_len(&message),
            char_len(&trimmed)
        );
        message = trimmed;
        outcome = LengthOutcome::Trimmed;
    }

    let length = char_len(&message);
    info!(
        "LinkedIn message for {}: {} chars (limit {}), {:?} after {} call(s)",
        target.company_name,
        length,
        budget.char_limit,
        outcome,
        regenerations + 1
    );

    Ok(GeneratedMessage {
        text: message,
        length,
        attempts: regenerations + 1,
        outcome,
    })
}

/// Resolves resume content to bullet text for the prompt.
///
/// Raw text is re-extracted through the resume pipeline; if that fails or
/// yields nothing, the raw text is hard-truncated instead.
async fn prepare_resume_bullets(content: &ResumeContent, llm: &dyn ChatModel) -> String {
    match content.kind {
        ContentKind::ParsedBullets => content.text.trim().to_string(),
        ContentKind::RawText => match resume_to_bullets(&content.text, llm).await {
            Ok(bullets) if !bullets.trim().is_empty() => bullets,
            Ok(_) => {
                warn!("Resume extraction produced no bullets; truncating raw resume text");
                truncate_chars(content.text.trim(), RAW_RESUME_FALLBACK_CHARS)
            }
            Err(e) => {
                warn!("Resume extraction failed ({e}); truncating raw resume text");
                truncate_chars(content.text.trim(), RAW_RESUME_FALLBACK_CHARS)
            }
        },
    }
}

fn build_corrective_prompt(
    direction: FailureDirection,
    message: &str,
    budget: &CharBudget,
    bullets: &str,
    opening: &str,
) -> String {
    let length = char_len(message);
    let template = match direction {
        FailureDirection::TooShort => LINKEDIN_TOO_SHORT_TEMPLATE
            .replace("{shortfall}", &(budget.target_min - length).to_string())
            .replace("{resume_bullets}", bullets),
        FailureDirection::TooLong => LINKEDIN_TOO_LONG_TEMPLATE
            .replace("{excess}", &(length - budget.target_max).to_string())
            .replace("{char_limit}", &budget.char_limit.to_string()),
    };
    template
        .replace("{message}", message)
        .replace("{length}", &length.to_string())
        .replace("{target_min}", &budget.target_min.to_string())
        .replace("{target_max}", &budget.target_max.to_string())
        .replace("{opening}", opening)
        .replace("{closing}", LINKEDIN_CLOSING)
}

/// Strips labels, wrapping quotes and line breaks the model adds despite instructions.
fn clean_message(reply: &str) -> String {
    let mut text = reply.trim();
    for label in ["Message:", "MESSAGE:", "message:"] {
        if let Some(rest) = text.strip_prefix(label) {
            text = rest.trim();
        }
    }
    let text = text
        .trim_matches(|c| matches!(c, '"' | '\u{201C}' | '\u{201D}'))
        .trim();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    const BULLETS: &str = "• Name: Jane Doe\n• Education: Bachelor's in CS from MIT";
    const OPENING: &str = "Dear Sam Lee, I'm interested in the SWE Intern position at Acme.";

    const SHORT: &str = "Dear Sam Lee, I'm interested in the SWE Intern position at Acme. I study CS at MIT.";

    // 287 chars.
    const ON_TARGET: &str = "Dear Sam Lee, I'm interested in the SWE Intern position at Acme. \
I'm completing my Bachelor's in Computer Science at MIT, where I have built backend services \
in Rust and Python. I enjoy designing reliable APIs and data pipelines. \
I'd love to connect and learn more about the opportunity.";

    fn long_message() -> String {
        let mut text = OPENING.to_string();
        for i in 0..8 {
            text.push_str(&format!(" This is background sentence number {i} about my work."));
        }
        text
    }

    async fn premium(model: &ScriptedModel) -> Result<GeneratedMessage, MessageError> {
        generate_linkedin_message(model, BULLETS, "Sam Lee", "SWE Intern", "Acme", 300).await
    }

    #[test]
    fn test_fixture_lengths() {
        assert_eq!(char_len(SHORT), 83);
        assert_eq!(char_len(ON_TARGET), 287);
        assert!(char_len(&long_message()) > 300);
    }

    #[tokio::test]
    async fn test_happy_path_regenerates_into_window() {
        let model = ScriptedModel::new().reply(SHORT).reply(ON_TARGET);
        let message = premium(&model).await.unwrap();

        assert!(message.text.contains(OPENING));
        assert!((280..=300).contains(&message.length));
        assert_eq!(message.outcome, LengthOutcome::OnTarget);
        assert_eq!(message.attempts, 2);

        let prompts = model.prompts();
        assert!(prompts[0].contains(BULLETS));
        assert!(prompts[0].contains(OPENING));
        assert!(prompts[1].contains("TOO SHORT: 83 characters"));
    }

    #[tokio::test]
    async fn test_on_target_first_reply_needs_no_regeneration() {
        let model = ScriptedModel::new().reply(ON_TARGET);
        let message = premium(&model).await.unwrap();
        assert_eq!(message.attempts, 1);
        assert_eq!(model.call_count(), 1);
        assert_eq!(message.text, ON_TARGET);
    }

    #[tokio::test]
    async fn test_too_long_reply_gets_too_long_prompt() {
        let model = ScriptedModel::new().reply(long_message()).reply(ON_TARGET);
        premium(&model).await.unwrap();
        let prompts = model.prompts();
        assert!(prompts[1].contains("TOO LONG"));
        assert!(!prompts[1].contains("TOO SHORT"));
    }

    #[tokio::test]
    async fn test_regeneration_caps_at_ten_then_expands() {
        let model = ScriptedModel::always(SHORT);
        let message = premium(&model).await.unwrap();

        assert_eq!(model.call_count(), 1 + MAX_REGENERATION_ATTEMPTS as usize);
        assert_eq!(message.attempts, 11);
        assert_eq!(message.outcome, LengthOutcome::Expanded);
        assert!(message.text.starts_with(SHORT));
        assert!(message.length >= 280 && message.length <= 300, "len={}", message.length);
    }

    #[tokio::test]
    async fn test_persistently_long_reply_is_trimmed_on_sentence_boundary() {
        let model = ScriptedModel::always(long_message());
        let message = premium(&model).await.unwrap();

        assert_eq!(message.outcome, LengthOutcome::Trimmed);
        assert!(message.length <= 300);
        assert!(message.text.ends_with('.'));
        assert!(message.text.starts_with(OPENING));
        assert!(long_message().starts_with(&message.text));
    }

    #[tokio::test]
    async fn test_free_tier_never_exceeds_200() {
        for reply in [SHORT.to_string(), ON_TARGET.to_string(), long_message()] {
            let model = ScriptedModel::always(reply);
            let message =
                generate_linkedin_message(&model, BULLETS, "Sam Lee", "SWE Intern", "Acme", 200)
                    .await
                    .unwrap();
            assert!(message.length <= 200, "len={}", message.length);
        }
    }

    #[tokio::test]
    async fn test_initial_model_failure_propagates() {
        let model = ScriptedModel::new().fail(LlmError::EmptyContent);
        assert!(matches!(
            premium(&model).await,
            Err(MessageError::Model(LlmError::EmptyContent))
        ));
    }

    #[tokio::test]
    async fn test_isolated_regeneration_failure_is_skipped() {
        let model = ScriptedModel::new()
            .reply(SHORT)
            .fail(LlmError::EmptyContent)
            .reply(ON_TARGET);
        let message = premium(&model).await.unwrap();
        assert_eq!(message.attempts, 3);
        assert_eq!(message.outcome, LengthOutcome::OnTarget);
    }

    #[tokio::test]
    async fn test_every_regeneration_failing_reraises() {
        // Initial reply succeeds; the scripted model then fails every call.
        let model = ScriptedModel::new().reply(SHORT);
        let result = premium(&model).await;
        assert!(matches!(result, Err(MessageError::Model(_))));
        assert_eq!(model.call_count(), 11);
    }

    #[tokio::test]
    async fn test_raw_resume_is_reextracted_into_bullets() {
        let raw = format!("Jane Doe\n{}", "Worked on many backend systems at Acme. ".repeat(30));
        let extraction = r#"{"name": "Jane Doe", "education": [{"university": "MIT", "level": "Bachelor's", "degree": "CS", "graduation_date": ""}], "experience": [], "competitions": [], "projects": [], "key_technologies": ["Rust"]}"#;
        let model = ScriptedModel::new().reply(extraction).reply(ON_TARGET);

        let message = generate_linkedin_message(&model, &raw, "Sam Lee", "SWE Intern", "Acme", 300)
            .await
            .unwrap();

        assert_eq!(message.attempts, 1);
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("• Name: Jane Doe"));
        assert!(!prompts[1].contains("Worked on many backend systems"));
    }

    #[tokio::test]
    async fn test_raw_resume_truncated_when_extraction_yields_nothing() {
        let raw = format!("{}TAIL_MARKER", "a".repeat(RAW_RESUME_FALLBACK_CHARS));
        let content = ResumeContent::raw(raw);
        let model = ScriptedModel::new().reply("not json at all").reply(ON_TARGET);
        let target = MessageTarget {
            recipient_name: "Sam Lee",
            job_title: "SWE Intern",
            company_name: "Acme",
        };

        generate_for_content(&model, &content, target, 300).await.unwrap();

        let prompt = &model.prompts()[1];
        assert!(prompt.contains(&"a".repeat(RAW_RESUME_FALLBACK_CHARS)));
        assert!(!prompt.contains("TAIL_MARKER"));
    }

    #[test]
    fn test_clean_message_strips_labels_quotes_and_newlines() {
        let cleaned = clean_message("Message: \"Dear Sam,\nI'm  interested.\"");
        assert_eq!(cleaned, "Dear Sam, I'm interested.");
    }
}
