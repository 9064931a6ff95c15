use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder name used whenever the model gives no usable name.
pub const NAME_NOT_AVAILABLE: &str = "Not Available";

/// Maximum number of key technologies kept on a record.
pub const MAX_KEY_TECHNOLOGIES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub university: String,
    pub level: String,
    pub degree: String,
    pub graduation_date: String,
}

/// One position of any kind. Work, internships, research and teaching all
/// land here, told apart by `kind` (serialized as `type`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionEntry {
    pub name: String,
    pub placement: String,
    pub date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
}

/// Structured resume. All six sections are always present; a failed parse
/// yields `ResumeRecord::default()` rather than a partial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub competitions: Vec<CompetitionEntry>,
    pub projects: Vec<ProjectEntry>,
    pub key_technologies: Vec<String>,
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self {
            name: NAME_NOT_AVAILABLE.to_string(),
            education: Vec::new(),
            experience: Vec::new(),
            competitions: Vec::new(),
            projects: Vec::new(),
            key_technologies: Vec::new(),
        }
    }
}

impl ResumeRecord {
    /// Builds a record from loosely-typed model JSON.
    ///
    /// Missing keys, `null`s and numbers-where-strings-were-expected are all
    /// tolerated; anything unusable becomes the section default.
    pub fn from_json(value: &Value) -> Self {
        let name = text_field(value, "name");
        let name = if name.is_empty() {
            NAME_NOT_AVAILABLE.to_string()
        } else {
            name
        };

        let education = objects(value, "education")
            .map(|e| EducationEntry {
                university: text_field(e, "university"),
                level: text_field(e, "level"),
                degree: text_field(e, "degree"),
                graduation_date: text_field(e, "graduation_date"),
            })
            .collect();

        let experience = objects(value, "experience")
            .map(|e| ExperienceEntry {
                company: text_field(e, "company"),
                title: text_field(e, "title"),
                kind: text_field(e, "type"),
                duration: text_field(e, "duration"),
                description: text_field(e, "description"),
            })
            .collect();

        let competitions = objects(value, "competitions")
            .map(|c| CompetitionEntry {
                name: text_field(c, "name"),
                placement: text_field(c, "placement"),
                date: text_field(c, "date"),
                description: text_field(c, "description"),
            })
            .collect();

        let projects = objects(value, "projects")
            .map(|p| ProjectEntry {
                title: text_field(p, "title"),
                description: text_field(p, "description"),
                technologies: text_list(p, "technologies"),
            })
            .collect();

        let mut key_technologies = text_list(value, "key_technologies");
        key_technologies.truncate(MAX_KEY_TECHNOLOGIES);

        Self {
            name,
            education,
            experience,
            competitions,
            projects,
            key_technologies,
        }
    }

    /// True when the name is the placeholder and every section is empty.
    pub fn is_empty(&self) -> bool {
        (self.name.is_empty() || self.name == NAME_NOT_AVAILABLE)
            && self.education.is_empty()
            && self.experience.is_empty()
            && self.competitions.is_empty()
            && self.projects.is_empty()
            && self.key_technologies.is_empty()
    }
}

fn objects<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|v| v.is_object())
}

fn text_field(value: &Value, key: &str) -> String {
    value.get(key).map(value_to_text).unwrap_or_default()
}

fn text_list(value: &Value, key: &str) -> Vec<String> {
    match value.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_to_text)
            .filter(|s| !s.is_empty())
            .collect(),
        // Some models answer with "Rust, Go, SQL" instead of a list.
        Some(Value::String(s)) => s
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_record_has_placeholder_name_and_empty_sections() {
        let record = ResumeRecord::default();
        assert_eq!(record.name, NAME_NOT_AVAILABLE);
        assert!(record.is_empty());
    }

    #[test]
    fn test_from_json_tolerates_nulls_and_numbers() {
        let value = json!({
            "name": null,
            "education": [{"university": "MIT", "level": null, "degree": "CS", "graduation_date": 2025}],
            "experience": "not a list",
            "key_technologies": ["Rust", null, "Go"]
        });
        let record = ResumeRecord::from_json(&value);
        assert_eq!(record.name, NAME_NOT_AVAILABLE);
        assert_eq!(record.education[0].graduation_date, "2025");
        assert_eq!(record.education[0].level, "");
        assert!(record.experience.is_empty());
        assert_eq!(record.key_technologies, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_key_technologies_capped_at_ten() {
        let techs: Vec<String> = (0..14).map(|i| format!("tech{i}")).collect();
        let record = ResumeRecord::from_json(&json!({ "key_technologies": techs }));
        assert_eq!(record.key_technologies.len(), MAX_KEY_TECHNOLOGIES);
        assert_eq!(record.key_technologies[9], "tech9");
    }

    #[test]
    fn test_comma_separated_technologies_are_split() {
        let record = ResumeRecord::from_json(&json!({
            "projects": [{"title": "Crawler", "description": "", "technologies": "Rust, Tokio ,SQL"}]
        }));
        assert_eq!(record.projects[0].technologies, vec!["Rust", "Tokio", "SQL"]);
    }

    #[test]
    fn test_experience_type_serializes_as_type() {
        let entry = ExperienceEntry {
            company: "Acme".to_string(),
            title: "Intern".to_string(),
            kind: "Internship".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "Internship");
        assert!(value.get("kind").is_none());
    }
}
