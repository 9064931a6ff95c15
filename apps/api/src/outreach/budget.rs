//! Character budgets for LinkedIn connection messages.
//!
//! The hard cap comes from the sender's account tier; the target window sits
//! just under it so messages use the space without brushing the limit.
//!
//! Deterministic fallbacks live here too: clause expansion for short messages
//! and sentence-boundary trimming for long ones. Neither ever exceeds the cap.

use serde::{Deserialize, Serialize};

/// Closing clauses for expansion, in priority order.
pub const CLOSING_CLAUSES: &[&str] = &[
    "I would welcome the chance to learn more about your team and share how my background could contribute.",
    "I'd love to connect and hear more about the team's current priorities.",
    "Looking forward to connecting with you.",
    "Thank you for your time.",
    "Thanks so much!",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountTier {
    Free,
    Premium,
}

impl AccountTier {
    pub fn from_premium_flag(is_premium: bool) -> Self {
        if is_premium {
            AccountTier::Premium
        } else {
            AccountTier::Free
        }
    }

    pub fn char_limit(self) -> usize {
        match self {
            AccountTier::Free => 200,
            AccountTier::Premium => 300,
        }
    }
}

/// Which way a message missed the target window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureDirection {
    TooShort,
    TooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharBudget {
    pub target_min: usize,
    pub target_max: usize,
    pub char_limit: usize,
}

impl CharBudget {
    /// `char_limit <= 200` → (180, 195); anything larger → (280, 295).
    pub fn for_limit(char_limit: usize) -> Self {
        let (target_min, target_max) = if char_limit <= 200 { (180, 195) } else { (280, 295) };
        Self {
            target_min,
            target_max,
            char_limit,
        }
    }

    pub fn for_tier(tier: AccountTier) -> Self {
        Self::for_limit(tier.char_limit())
    }

    /// `None` when the length is inside `[target_min, target_max]`.
    pub fn failure_direction(&self, len: usize) -> Option<FailureDirection> {
        if len < self.target_min {
            Some(FailureDirection::TooShort)
        } else if len > self.target_max {
            Some(FailureDirection::TooLong)
        } else {
            None
        }
    }
}

/// Message length as the recipient platform counts it.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Appends closing clauses until the message reaches `target_min`.
///
/// Each round picks the longest unused clause that still fits under
/// `char_limit` (ties go to the earlier clause). Stops when the target is
/// reached or nothing fits.
pub fn expand_with_closings(message: &str, budget: &CharBudget) -> String {
    let mut result = ensure_terminal_punctuation(message.trim());

    while char_len(&result) < budget.target_min {
        let remaining = budget.char_limit.saturating_sub(char_len(&result));
        let pick = CLOSING_CLAUSES
            .iter()
            .filter(|clause| !result.contains(**clause))
            .filter(|clause| char_len(clause) + 1 <= remaining)
            .fold(None::<&str>, |best, clause| match best {
                Some(b) if char_len(b) >= char_len(clause) => Some(b),
                _ => Some(*clause),
            });

        let Some(clause) = pick else {
            break;
        };
        if !result.is_empty() {
            result.push(' ');
        }
        result.push_str(clause);
    }

    result
}

/// Rebuilds the message sentence by sentence, stopping before the sentence
/// that would cross `char_limit`.
///
/// If even the first sentence is over the limit, it is cut at the last word
/// boundary and closed with a period so the cap always holds.
pub fn trim_to_limit(message: &str, char_limit: usize) -> String {
    let message = message.trim();
    if char_len(message) <= char_limit {
        return message.to_string();
    }

    let pieces: Vec<&str> = message.split(". ").collect();
    let last = pieces.len() - 1;
    let sentences: Vec<String> = pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| {
            if i < last {
                format!("{piece}.")
            } else {
                piece.to_string()
            }
        })
        .collect();

    let mut result = String::new();
    for sentence in &sentences {
        let candidate = if result.is_empty() {
            sentence.clone()
        } else {
            format!("{result} {sentence}")
        };
        if char_len(&candidate) > char_limit {
            break;
        }
        result = candidate;
    }

    if result.is_empty() {
        return cut_at_word_boundary(&sentences[0], char_limit);
    }
    result
}

fn cut_at_word_boundary(sentence: &str, char_limit: usize) -> String {
    if char_limit == 0 {
        return String::new();
    }
    // Leave one char for the closing period.
    let budget = char_limit - 1;
    let mut cut = String::new();
    for word in sentence.split_whitespace() {
        let candidate = if cut.is_empty() {
            word.to_string()
        } else {
            format!("{cut} {word}")
        };
        if char_len(&candidate) > budget {
            break;
        }
        cut = candidate;
    }
    if cut.is_empty() {
        cut = sentence.chars().take(budget).collect();
    }
    let mut cut = cut
        .trim_end_matches([',', ';', ':', '-', '.', '!', '?', ' '])
        .to_string();
    cut.push('.');
    cut
}

fn ensure_terminal_punctuation(text: &str) -> String {
    if text.is_empty() || text.ends_with(['.', '!', '?']) {
        text.to_string()
    } else {
        format!("{text}.")
    }
}
