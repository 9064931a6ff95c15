//! Resume Bullet Renderer — `ResumeRecord` → compact bullet text.
//!
//! Deterministic, no LLM call. The output is the canonical short resume used
//! in every downstream prompt, so section order and glyphs are fixed.

use crate::llm_client::ChatModel;
use crate::llm_client::LlmError;
use crate::resume::extractor::extract_resume_record;
use crate::resume::models::{ResumeRecord, MAX_KEY_TECHNOLOGIES, NAME_NOT_AVAILABLE};

pub const BULLET: &str = "•";
const SUB_BULLET: &str = "  -";

/// Renders a record as bullet lines. Empty sections produce no line at all.
pub fn render_bullets(record: &ResumeRecord) -> String {
    let mut lines: Vec<String> = Vec::new();

    let name = record.name.trim();
    if !name.is_empty() && name != NAME_NOT_AVAILABLE {
        lines.push(format!("{BULLET} Name: {name}"));
    }

    for edu in &record.education {
        lines.push(format!("{BULLET} Education: {}", education_summary(edu)));
        if !edu.graduation_date.is_empty() {
            lines.push(format!("{SUB_BULLET} Graduation: {}", edu.graduation_date));
        }
    }

    if !record.experience.is_empty() {
        lines.push(format!(
            "{BULLET} Experience: {} position(s) at {}",
            record.experience.len(),
            joined_unique(record.experience.iter().map(|e| e.company.as_str()))
        ));
        for exp in &record.experience {
            let mut line = format!("{SUB_BULLET} {} at {}", or_unknown(&exp.title), or_unknown(&exp.company));
            if !exp.kind.is_empty() {
                line.push_str(&format!(" ({})", exp.kind));
            }
            lines.push(line);
        }
    }

    if !record.competitions.is_empty() {
        lines.push(format!(
            "{BULLET} Competitions: {} ({})",
            record.competitions.len(),
            joined_unique(record.competitions.iter().map(|c| c.name.as_str()))
        ));
        for comp in &record.competitions {
            let mut line = format!("{SUB_BULLET} {}", or_unknown(&comp.name));
            if !comp.placement.is_empty() {
                line.push_str(&format!(": {}", comp.placement));
            }
            if !comp.date.is_empty() {
                line.push_str(&format!(" ({})", comp.date));
            }
            lines.push(line);
        }
    }

    if !record.projects.is_empty() {
        lines.push(format!(
            "{BULLET} Projects: {} ({})",
            record.projects.len(),
            joined_unique(record.projects.iter().map(|p| p.title.as_str()))
        ));
        for project in &record.projects {
            let mut line = format!("{SUB_BULLET} {}", or_unknown(&project.title));
            if !project.technologies.is_empty() {
                line.push_str(&format!(" [{}]", project.technologies.join(", ")));
            }
            lines.push(line);
        }
    }

    if !record.key_technologies.is_empty() {
        let techs: Vec<&str> = record
            .key_technologies
            .iter()
            .take(MAX_KEY_TECHNOLOGIES)
            .map(String::as_str)
            .collect();
        lines.push(format!("{BULLET} Key Technologies: {}", techs.join(", ")));
    }

    lines.join("\n")
}

/// Extracts a record from raw resume text and renders it as bullets.
pub async fn resume_to_bullets(resume_text: &str, llm: &dyn ChatModel) -> Result<String, LlmError> {
    let record = extract_resume_record(resume_text, llm).await?;
    Ok(render_bullets(&record))
}

fn education_summary(edu: &crate::resume::models::EducationEntry) -> String {
    let program = match (edu.level.is_empty(), edu.degree.is_empty()) {
        (false, false) => format!("{} in {}", edu.level, edu.degree),
        (false, true) => edu.level.clone(),
        (true, false) => edu.degree.clone(),
        (true, true) => String::new(),
    };
    match (program.is_empty(), edu.university.is_empty()) {
        (false, false) => format!("{program} from {}", edu.university),
        (false, true) => program,
        (true, false) => edu.university.clone(),
        (true, true) => "Unknown".to_string(),
    }
}

fn joined_unique<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut seen: Vec<&str> = Vec::new();
    for name in names.map(str::trim).filter(|n| !n.is_empty()) {
        if !seen.contains(&name) {
            seen.push(name);
        }
    }
    seen.join(", ")
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "Unknown"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::models::{CompetitionEntry, EducationEntry, ExperienceEntry, ProjectEntry};

    fn sample_record() -> ResumeRecord {
        ResumeRecord {
            name: "Jane Doe".to_string(),
            education: vec![EducationEntry {
                university: "MIT".to_string(),
                level: "Bachelor's".to_string(),
                degree: "CS".to_string(),
                graduation_date: "May 2026".to_string(),
            }],
            experience: vec![
                ExperienceEntry {
                    company: "Acme".to_string(),
                    title: "SWE Intern".to_string(),
                    kind: "Internship".to_string(),
                    ..Default::default()
                },
                ExperienceEntry {
                    company: "MIT CSAIL".to_string(),
                    title: "Research Assistant".to_string(),
                    kind: "Research".to_string(),
                    ..Default::default()
                },
            ],
            competitions: vec![CompetitionEntry {
                name: "ICPC Regional".to_string(),
                placement: "2nd Place".to_string(),
                date: "2024".to_string(),
                description: String::new(),
            }],
            projects: vec![ProjectEntry {
                title: "Crawler".to_string(),
                description: "Fast crawler".to_string(),
                technologies: vec!["Rust".to_string(), "Tokio".to_string()],
            }],
            key_technologies: vec!["Rust".to_string(), "Python".to_string()],
        }
    }

    #[test]
    fn test_renders_sections_in_fixed_order() {
        let text = render_bullets(&sample_record());
        let expected = "\
• Name: Jane Doe
• Education: Bachelor's in CS from MIT
  - Graduation: May 2026
• Experience: 2 position(s) at Acme, MIT CSAIL
  - SWE Intern at Acme (Internship)
  - Research Assistant at MIT CSAIL (Research)
• Competitions: 1 (ICPC Regional)
  - ICPC Regional: 2nd Place (2024)
• Projects: 1 (Crawler)
  - Crawler [Rust, Tokio]
• Key Technologies: Rust, Python";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let record = sample_record();
        assert_eq!(render_bullets(&record), render_bullets(&record));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let record = ResumeRecord {
            name: "Jane Doe".to_string(),
            key_technologies: vec!["Rust".to_string()],
            ..ResumeRecord::default()
        };
        let text = render_bullets(&record);
        assert_eq!(text, "• Name: Jane Doe\n• Key Technologies: Rust");
        assert!(!text.contains("Experience"));
    }

    #[test]
    fn test_default_record_renders_empty() {
        assert_eq!(render_bullets(&ResumeRecord::default()), "");
    }

    #[test]
    fn test_key_technologies_line_lists_at_most_ten() {
        let record = ResumeRecord {
            key_technologies: (0..12).map(|i| format!("t{i}")).collect(),
            ..ResumeRecord::default()
        };
        let text = render_bullets(&record);
        assert!(text.contains("t9"));
        assert!(!text.contains("t10"));
    }
}
