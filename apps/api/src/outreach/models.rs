use serde::{Deserialize, Serialize};

use crate::resume::bullets::BULLET;

/// Share of non-empty lines that must start with a bullet glyph for text to
/// count as already-parsed bullets.
const BULLET_LINE_RATIO: f64 = 0.3;
/// Parsed bullet text is always short; anything longer is treated as raw.
const MAX_BULLET_TEXT_CHARS: usize = 1000;

/// Provenance of the resume text handed to a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    RawText,
    ParsedBullets,
}

impl ContentKind {
    /// Guesses provenance when the caller could not say.
    ///
    /// A very terse raw resume written as a list can be misread as bullets;
    /// callers that know the provenance should build `ResumeContent` directly.
    pub fn classify(text: &str) -> Self {
        if text.chars().count() >= MAX_BULLET_TEXT_CHARS {
            return ContentKind::RawText;
        }
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            return ContentKind::RawText;
        }
        let bulleted = lines
            .iter()
            .filter(|l| l.starts_with(BULLET) || l.starts_with('-') || l.starts_with('*'))
            .count();
        if bulleted as f64 / lines.len() as f64 >= BULLET_LINE_RATIO {
            ContentKind::ParsedBullets
        } else {
            ContentKind::RawText
        }
    }
}

/// Resume text tagged with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeContent {
    pub kind: ContentKind,
    pub text: String,
}

impl ResumeContent {
    pub fn bullets(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::ParsedBullets,
            text: text.into(),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            kind: ContentKind::RawText,
            text: text.into(),
        }
    }

    /// Tags untagged text using the `ContentKind::classify` heuristic.
    pub fn classified(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            kind: ContentKind::classify(&text),
            text,
        }
    }
}

/// How the final message length was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthOutcome {
    OnTarget,
    Expanded,
    Trimmed,
    /// Outside the ideal window but under the hard limit.
    AcceptedOutsideTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedMessage {
    pub text: String,
    pub length: usize,
    /// Model calls spent, including the initial generation.
    pub attempts: u32,
    pub outcome: LengthOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recruiter {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub company: String,
    #[serde(default)]
    pub title: Option<String>,
}

impl Recruiter {
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("there")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
}
