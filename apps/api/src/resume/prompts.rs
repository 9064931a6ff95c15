// LLM prompt templates for the resume module.

/// Structured resume extraction prompt. Replace `{json_only}` and `{resume_text}` before sending.
pub const RESUME_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured information from the resume below.

Return a JSON object with EXACTLY these six keys:
{
  "name": "Full Name",
  "education": [
    {"university": "string", "level": "Bachelor's | Master's | PhD | ...", "degree": "field of study", "graduation_date": "Month YYYY"}
  ],
  "experience": [
    {"company": "string", "title": "string", "type": "Work | Internship | Research | Teaching", "duration": "string", "description": "one sentence"}
  ],
  "competitions": [
    {"name": "string", "placement": "string", "date": "string", "description": "one sentence"}
  ],
  "projects": [
    {"title": "string", "description": "one sentence", "technologies": ["string"]}
  ],
  "key_technologies": ["up to 10 strings"]
}

MERGE RULE: Every kind of position (work, internship, research, teaching assistant)
goes into the single "experience" list, distinguished by "type".
NEVER create separate "work_experience" or "research_experiences" arrays.
For research positions, put the lab or institution in "company".

Use empty lists for sections the resume does not have. List at most 10 key technologies.

{json_only}

RESUME:
{resume_text}"#;
