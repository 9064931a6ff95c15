//! Resume Structured Extractor — raw resume text → `ResumeRecord` via one LLM call.
//!
//! The model is told to return a bare JSON object, but replies routinely arrive
//! fenced, wrapped in prose, or truncated. Parsing therefore walks a recovery
//! ladder: fences → outermost braces → greedy regex rescue → default record.
//! Parse failures never surface to the caller; model-call failures do.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{strip_json_fences, ChatModel, LlmError};
use crate::resume::models::ResumeRecord;
use crate::resume::prompts::RESUME_EXTRACT_PROMPT_TEMPLATE;

lazy_static! {
    static ref JSON_OBJECT_RESCUE: Regex = Regex::new(r"(?s)\{.*\}").unwrap();
}

const LEGACY_WORK_KEY: &str = "work_experience";
const LEGACY_RESEARCH_KEY: &str = "research_experiences";

/// Extracts a structured resume record from raw resume text.
pub async fn extract_resume_record(
    resume_text: &str,
    llm: &dyn ChatModel,
) -> Result<ResumeRecord, LlmError> {
    let prompt = RESUME_EXTRACT_PROMPT_TEMPLATE
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
        .replace("{resume_text}", resume_text);

    let reply = llm.invoke_text(&prompt).await?;
    let record = parse_resume_response(&reply);
    if record.is_empty() {
        warn!("Resume extraction produced an empty record");
    }

    info!(
        "Resume extracted: {} education, {} experience, {} projects",
        record.education.len(),
        record.experience.len(),
        record.projects.len()
    );
    Ok(record)
}

/// Turns a raw model reply into a `ResumeRecord`, never failing.
pub fn parse_resume_response(reply: &str) -> ResumeRecord {
    let Some(mut object) = decode_object(reply) else {
        warn!("Resume extraction reply was not recoverable JSON; using default record");
        return ResumeRecord::default();
    };

    merge_legacy_experience(&mut object);
    ResumeRecord::from_json(&Value::Object(object))
}

fn decode_object(reply: &str) -> Option<Map<String, Value>> {
    let unfenced = strip_json_fences(reply);
    let candidate = outermost_braces(unfenced).unwrap_or(unfenced);

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => return Some(map),
        Ok(other) => {
            debug!("Resume reply decoded to non-object JSON: {}", type_name(&other));
        }
        Err(e) => {
            debug!("Resume reply failed to decode ({e}); attempting regex rescue");
        }
    }

    let rescued = JSON_OBJECT_RESCUE.find(reply)?;
    match serde_json::from_str::<Value>(rescued.as_str()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn outermost_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Folds the older split layout (`work_experience` + `research_experiences`)
/// into the single `experience` list and removes the legacy keys.
fn merge_legacy_experience(object: &mut Map<String, Value>) {
    let work = object.remove(LEGACY_WORK_KEY);
    let research = object.remove(LEGACY_RESEARCH_KEY);
    if work.is_none() && research.is_none() {
        return;
    }

    let mut experience: Vec<Value> = match object.remove("experience") {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    if let Some(Value::Array(items)) = work {
        for mut item in items {
            if let Value::Object(entry) = &mut item {
                entry
                    .entry("type")
                    .or_insert_with(|| Value::String("Work".to_string()));
            }
            experience.push(item);
        }
    }

    if let Some(Value::Array(items)) = research {
        for item in items {
            let Value::Object(mut entry) = item else {
                continue;
            };
            if !entry.contains_key("company") {
                if let Some(institution) = entry.remove("institution") {
                    entry.insert("company".to_string(), institution);
                }
            }
            if !entry.contains_key("title") {
                if let Some(role) = entry.remove("position").or_else(|| entry.remove("role")) {
                    entry.insert("title".to_string(), role);
                }
            }
            entry.insert("type".to_string(), Value::String("Research".to_string()));
            experience.push(Value::Object(entry));
        }
    }

    debug!("Merged legacy experience keys into {} entries", experience.len());
    object.insert("experience".to_string(), Value::Array(experience));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::resume::models::NAME_NOT_AVAILABLE;

    const CLEAN_REPLY: &str = r#"{
        "name": "Jane Doe",
        "education": [{"university": "MIT", "level": "Bachelor's", "degree": "CS", "graduation_date": "May 2026"}],
        "experience": [{"company": "Acme", "title": "SWE Intern", "type": "Internship", "duration": "Summer 2025", "description": "Built APIs"}],
        "competitions": [],
        "projects": [{"title": "Crawler", "description": "Fast crawler", "technologies": ["Rust"]}],
        "key_technologies": ["Rust", "Python"]
    }"#;

    #[test]
    fn test_parses_clean_json() {
        let record = parse_resume_response(CLEAN_REPLY);
        assert_eq!(record.name, "Jane Doe");
        assert_eq!(record.experience[0].kind, "Internship");
        assert_eq!(record.key_technologies, vec!["Rust", "Python"]);
    }

    #[test]
    fn test_parses_fenced_json_with_prose() {
        let reply = format!("Sure! Here is the data:\n```json\n{CLEAN_REPLY}\n```\nLet me know.");
        let record = parse_resume_response(&reply);
        assert_eq!(record.name, "Jane Doe");
    }

    #[test]
    fn test_parses_json_embedded_in_prose_without_fences() {
        let reply = format!("The extracted record is {CLEAN_REPLY} as requested.");
        let record = parse_resume_response(&reply);
        assert_eq!(record.education[0].university, "MIT");
    }

    #[test]
    fn test_garbage_falls_back_to_default_record() {
        let record = parse_resume_response("I could not read this resume, sorry.");
        assert_eq!(record, ResumeRecord::default());
    }

    #[test]
    fn test_truncated_json_falls_back_to_default_record() {
        let record = parse_resume_response(r#"{"name": "Jane", "education": ["#);
        assert_eq!(record.name, NAME_NOT_AVAILABLE);
        assert!(record.education.is_empty());
    }

    #[test]
    fn test_legacy_keys_are_merged_into_experience() {
        let reply = r#"{
            "name": "Jane Doe",
            "work_experience": [{"company": "Acme", "title": "Engineer", "duration": "2y", "description": "x"}],
            "research_experiences": [{"institution": "MIT CSAIL", "position": "RA", "duration": "1y", "description": "y"}],
            "key_technologies": []
        }"#;
        let record = parse_resume_response(reply);
        assert_eq!(record.experience.len(), 2);
        assert_eq!(record.experience[0].company, "Acme");
        assert_eq!(record.experience[0].kind, "Work");
        assert_eq!(record.experience[1].company, "MIT CSAIL");
        assert_eq!(record.experience[1].title, "RA");
        assert_eq!(record.experience[1].kind, "Research");

        let serialized = serde_json::to_value(&record).unwrap();
        let keys: Vec<&String> = serialized.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 6);
        assert!(serialized.get(LEGACY_WORK_KEY).is_none());
        assert!(serialized.get(LEGACY_RESEARCH_KEY).is_none());
    }

    #[test]
    fn test_legacy_keys_append_after_existing_experience() {
        let reply = r#"{
            "experience": [{"company": "First", "title": "TA", "type": "Teaching"}],
            "research_experiences": [{"institution": "Lab", "title": "Researcher"}]
        }"#;
        let record = parse_resume_response(reply);
        assert_eq!(record.experience[0].company, "First");
        assert_eq!(record.experience[1].company, "Lab");
        assert_eq!(record.experience[1].kind, "Research");
    }

    #[test]
    fn test_object_after_non_json_fence_is_rescued() {
        let record = parse_resume_response("```\nnote\n```\n{\"name\": \"Jane\"}");
        assert_eq!(record.name, "Jane");
    }

    #[tokio::test]
    async fn test_extract_sends_resume_text_in_prompt() {
        let model = ScriptedModel::new().reply(CLEAN_REPLY);
        let record = extract_resume_record("Jane Doe\nMIT 2026", &model)
            .await
            .unwrap();
        assert_eq!(record.name, "Jane Doe");
        let prompts = model.prompts();
        assert!(prompts[0].contains("Jane Doe\nMIT 2026"));
        assert!(prompts[0].contains("NEVER create separate"));
    }

    #[tokio::test]
    async fn test_extract_propagates_model_failure() {
        let model = ScriptedModel::new().fail(LlmError::EmptyContent);
        let result = extract_resume_record("anything", &model).await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }
}
