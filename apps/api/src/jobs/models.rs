use serde::{Deserialize, Serialize};

pub const RESPONSIBILITIES_HEADER: &str = "RESPONSIBILITIES:";
pub const REQUIREMENTS_HEADER: &str = "REQUIREMENTS:";
pub const TECHNOLOGIES_HEADER: &str = "KEY TECHNOLOGIES:";

/// Bullets kept per section in a persisted job context.
pub const MAX_SECTION_BULLETS: usize = 3;

fn default_employment_type() -> String {
    "Not specified".to_string()
}

/// A scraped job posting as handed over by the scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_employment_type")]
    pub employment_type: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl JobPosting {
    /// Replaces the long description with its condensed form.
    pub fn into_condensed(mut self, condensed: String) -> CondensedJob {
        self.description = condensed.clone();
        CondensedJob {
            posting: self,
            condensed_description: condensed,
        }
    }
}

/// A posting whose `description` now holds the three-section condensed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedJob {
    #[serde(flatten)]
    pub posting: JobPosting,
    pub condensed_description: String,
}

impl CondensedJob {
    pub fn url(&self) -> &str {
        &self.posting.url
    }
}

/// Snapshot persisted per job URL for later message generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobContext {
    pub title: String,
    pub company: String,
    pub url: String,
    pub responsibilities: Vec<String>,
    pub requirements: Vec<String>,
    pub technologies: Vec<String>,
    pub employment_type: String,
}

impl JobContext {
    pub fn from_condensed(job: &CondensedJob) -> Self {
        let text = &job.condensed_description;
        Self {
            title: job.posting.title.clone(),
            company: job.posting.company.clone(),
            url: job.posting.url.clone(),
            responsibilities: extract_section_bullets(text, RESPONSIBILITIES_HEADER),
            requirements: extract_section_bullets(text, REQUIREMENTS_HEADER),
            technologies: extract_section_bullets(text, TECHNOLOGIES_HEADER),
            employment_type: job.posting.employment_type.clone(),
        }
    }
}

/// Slices the bullets under `header`, stopping at the next known header.
/// At most `MAX_SECTION_BULLETS` are returned, with bullet glyphs stripped.
pub fn extract_section_bullets(text: &str, header: &str) -> Vec<String> {
    let Some(start) = text.find(header) else {
        return Vec::new();
    };
    let section = &text[start + header.len()..];
    let end = [RESPONSIBILITIES_HEADER, REQUIREMENTS_HEADER, TECHNOLOGIES_HEADER]
        .iter()
        .filter(|h| **h != header)
        .filter_map(|h| section.find(h))
        .min()
        .unwrap_or(section.len());

    section[..end]
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '•', '*', '–'])
                .trim()
                .to_string()
        })
        .filter(|line| !line.is_empty())
        .take(MAX_SECTION_BULLETS)
        .collect()
}
