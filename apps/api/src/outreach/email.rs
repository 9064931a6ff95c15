//! Email Content Generator — subject + body for a recruiter cold email.
//!
//! The model answers inside `<<<BEGIN>>>`/`<<<END>>>` markers. Whatever it
//! returns goes through the same deterministic post-processing:
//!   markers → SUBJECT/BODY split → bullet glyphs → bullet clamp →
//!   word budget → closing repair.
//! A failed call or an empty body falls back to a fully templated email.

use tracing::{debug, warn};

use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::ChatModel;
use crate::outreach::models::{EmailContent, Recruiter};
use crate::outreach::prompts::EMAIL_PROMPT_TEMPLATE;
use crate::resume::bullets::BULLET;

const BEGIN_MARKER: &str = "<<<BEGIN>>>";
const END_MARKER: &str = "<<<END>>>";

const MAX_BULLETS: usize = 3;
const MAX_BULLET_WORDS: usize = 12;
const MAX_BODY_WORDS: usize = 150;

const CANONICAL_CLOSING: &str = "Best regards,";

/// Sign-off phrases accepted as a closing.
const CLOSING_PHRASES: &[&str] = &[
    "best regards",
    "kind regards",
    "warm regards",
    "regards",
    "sincerely",
    "best",
    "thanks",
    "thank you",
    "cheers",
];

/// Glyphs the model uses for list items; all become `-`.
const BULLET_GLYPHS: &[char] = &['•', '–', '—', '*', '-'];

pub async fn generate_email_content(
    llm: &dyn ChatModel,
    job_titles: &[String],
    job_type: &str,
    recruiter: &Recruiter,
    resume_bullets: &str,
) -> EmailContent {
    let sender = sender_name_from_bullets(resume_bullets);
    let titles = if job_titles.is_empty() {
        "open".to_string()
    } else {
        job_titles.join(", ")
    };

    let prompt = EMAIL_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{recruiter_name}", &recruiter.name)
        .replace(
            "{recruiter_title}",
            recruiter.title.as_deref().unwrap_or("Recruiter"),
        )
        .replace("{company}", &recruiter.company)
        .replace("{job_titles}", &titles)
        .replace("{job_type}", job_type)
        .replace("{resume_bullets}", resume_bullets)
        .replace("{sender_name}", sender.as_deref().unwrap_or(""));

    match llm.invoke_text(&prompt).await {
        Ok(reply) => match postprocess_email(&reply, sender.as_deref()) {
            Some(content) => {
                debug!(
                    "Email for {}: {} body words",
                    recruiter.company,
                    word_count(&content.body)
                );
                content
            }
            None => {
                warn!(
                    "Email reply for {} had no usable body; using template",
                    recruiter.company
                );
                fallback_email(job_titles, job_type, recruiter, resume_bullets, sender.as_deref())
            }
        },
        Err(e) => {
            warn!("Email generation for {} failed: {e}; using template", recruiter.company);
            fallback_email(job_titles, job_type, recruiter, resume_bullets, sender.as_deref())
        }
    }
}

/// Reads the candidate's name from a `• Name:` line.
pub fn sender_name_from_bullets(resume_bullets: &str) -> Option<String> {
    resume_bullets.lines().find_map(|line| {
        let line = line.trim().trim_start_matches(BULLET).trim_start();
        line.strip_prefix("Name:")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
    })
}

/// Applies the formatting pipeline to a raw model reply.
///
/// Returns `None` when no body text survives, so the caller can fall back.
pub fn postprocess_email(reply: &str, sender: Option<&str>) -> Option<EmailContent> {
    let inner = between_markers(reply);
    let (subject, body) = split_subject_body(inner);

    let body = clamp_bullets(&normalize_bullet_glyphs(&body));
    let (main, closing) = split_closing(&body, sender);
    let closing = repair_closing(closing.as_deref(), sender);

    let main = trim_to_words(&main, MAX_BODY_WORDS.saturating_sub(word_count(&closing)));
    if main.trim().is_empty() {
        return None;
    }

    Some(EmailContent {
        subject: if subject.is_empty() {
            "Reaching out about open roles".to_string()
        } else {
            subject
        },
        body: format!("{}\n\n{}", main.trim_end(), closing),
    })
}

fn between_markers(reply: &str) -> &str {
    let start = reply
        .find(BEGIN_MARKER)
        .map(|i| i + BEGIN_MARKER.len())
        .unwrap_or(0);
    let rest = &reply[start..];
    let end = rest.find(END_MARKER).unwrap_or(rest.len());
    rest[..end].trim()
}

/// Splits on `SUBJECT:`/`BODY:` labels. With only a `SUBJECT:` label, the
/// first line after it is the subject and everything else is the body.
fn split_subject_body(text: &str) -> (String, String) {
    let subject_at = text.find("SUBJECT:");
    let body_at = text.find("BODY:");

    match (subject_at, body_at) {
        (Some(s), Some(b)) if s < b => {
            let subject = text[s + "SUBJECT:".len()..b].trim();
            let subject = subject.lines().next().unwrap_or("").trim().to_string();
            (subject, text[b + "BODY:".len()..].trim().to_string())
        }
        (_, Some(b)) => (String::new(), text[b + "BODY:".len()..].trim().to_string()),
        (Some(s), None) => {
            let after = &text[s + "SUBJECT:".len()..];
            let (subject, body) = after.split_once('\n').unwrap_or((after, ""));
            (subject.trim().to_string(), body.trim().to_string())
        }
        (None, None) => (String::new(), text.trim().to_string()),
    }
}

fn normalize_bullet_glyphs(body: &str) -> String {
    body.lines()
        .map(|line| {
            let trimmed = line.trim_start();
            match trimmed.chars().next() {
                Some(c) if BULLET_GLYPHS.contains(&c) => {
                    format!("- {}", trimmed.trim_start_matches(BULLET_GLYPHS).trim())
                }
                _ => line.trim_end().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_bullet(line: &str) -> bool {
    line.starts_with("- ")
}

/// Keeps the first `MAX_BULLETS` bullets and cuts each to `MAX_BULLET_WORDS`.
fn clamp_bullets(body: &str) -> String {
    let mut kept = 0;
    let mut lines = Vec::new();
    for line in body.lines() {
        if !is_bullet(line) {
            lines.push(line.to_string());
            continue;
        }
        if kept == MAX_BULLETS {
            continue;
        }
        kept += 1;
        let words: Vec<&str> = line[2..].split_whitespace().take(MAX_BULLET_WORDS).collect();
        lines.push(format!("- {}", words.join(" ")));
    }
    lines.join("\n")
}

/// A sign-off line is a known phrase, alone or followed on the same line by
/// the sender's name ("Best regards, Jane Doe").
fn closing_phrase_at(line: &str, sender: Option<&str>) -> bool {
    let lower = line.trim().to_lowercase();
    let sender = sender.map(|name| name.trim().to_lowercase());
    CLOSING_PHRASES.iter().any(|phrase| {
        let Some(rest) = lower.strip_prefix(phrase) else {
            return false;
        };
        let rest = rest.trim_matches([',', '.', '!', ' ']);
        rest.is_empty() || sender.as_deref() == Some(rest)
    })
}

/// Separates the sign-off block (from the last closing phrase line onward).
fn split_closing(body: &str, sender: Option<&str>) -> (String, Option<String>) {
    let lines: Vec<&str> = body.lines().collect();
    match lines.iter().rposition(|line| closing_phrase_at(line, sender)) {
        Some(i) => (
            lines[..i].join("\n"),
            Some(lines[i..].join("\n").trim().to_string()),
        ),
        None => (body.to_string(), None),
    }
}

/// Keeps a closing that carries the sender's name; anything else becomes
/// the canonical sign-off.
fn repair_closing(closing: Option<&str>, sender: Option<&str>) -> String {
    match (closing, sender) {
        (Some(existing), Some(name)) if existing.contains(name) => existing.to_string(),
        (Some(existing), None) => existing.to_string(),
        (_, Some(name)) => format!("{CANONICAL_CLOSING}\n{name}"),
        (None, None) => CANONICAL_CLOSING.to_string(),
    }
}

/// Accumulates whole lines until the word budget runs out; the line that
/// crosses it is cut to the remaining words.
fn trim_to_words(text: &str, max_words: usize) -> String {
    let mut remaining = max_words;
    let mut lines = Vec::new();
    for line in text.lines() {
        let words = word_count(line);
        if words <= remaining {
            lines.push(line.to_string());
            remaining -= words;
            continue;
        }
        if remaining > 0 {
            let cut: Vec<&str> = line.split_whitespace().take(remaining).collect();
            lines.push(cut.join(" "));
        }
        break;
    }
    lines.join("\n")
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Deterministic email used when the model is unavailable.
pub fn fallback_email(
    job_titles: &[String],
    job_type: &str,
    recruiter: &Recruiter,
    resume_bullets: &str,
    sender: Option<&str>,
) -> EmailContent {
    let roles = if job_titles.is_empty() {
        format!("{job_type} roles")
    } else {
        job_titles.join(", ")
    };
    let subject = format!("Interest in {} at {}", roles, recruiter.company);

    let highlights: Vec<String> = resume_bullets
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(BULLET))
        .map(|line| line.trim_start_matches(BULLET).trim())
        .filter(|line| !line.starts_with("Name:") && !line.is_empty())
        .take(MAX_BULLETS)
        .map(|line| {
            let words: Vec<&str> = line.split_whitespace().take(MAX_BULLET_WORDS).collect();
            format!("- {}", words.join(" "))
        })
        .collect();

    let mut body = format!(
        "Hi {},\n\nI'm reaching out about the {} opportunities at {}. I believe my background is a strong fit.",
        recruiter.first_name(),
        roles,
        recruiter.company
    );
    if !highlights.is_empty() {
        body.push_str("\n\n");
        body.push_str(&highlights.join("\n"));
    }
    body.push_str("\n\nWould you be open to a short conversation about the team?\n\n");
    body.push_str(&repair_closing(None, sender));

    EmailContent { subject, body }
}
