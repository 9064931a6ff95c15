/// LLM Client — the single point of entry for all model calls in the outreach service.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// Core components depend on the `ChatModel` trait, never on `LlmClient` itself,
/// so tests can swap in a scripted model.
///
/// Model: claude-sonnet-4-5 (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
#[cfg(test)]
pub mod testing;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 2048;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model credentials missing: {0}")]
    MissingCredentials(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Model boundary
// ────────────────────────────────────────────────────────────────────────────

/// Raw reply from a chat model. Providers disagree on shape, so the core
/// accepts all three and normalizes through `into_text`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput {
    /// Message object carrying a `content` string.
    Message { content: String },
    /// Loose key/value payload; `text` wins over `content`.
    Mapping(Map<String, Value>),
    /// Bare string.
    Text(String),
}

impl ModelOutput {
    /// Normalizes any reply shape to a trimmed string.
    pub fn into_text(self) -> String {
        match self {
            ModelOutput::Message { content } => content.trim().to_string(),
            ModelOutput::Text(text) => text.trim().to_string(),
            ModelOutput::Mapping(map) => {
                let picked = ["text", "content"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
                    .map(str::to_string);
                match picked {
                    Some(text) => text.trim().to_string(),
                    None => Value::Object(map).to_string().trim().to_string(),
                }
            }
        }
    }
}

impl From<String> for ModelOutput {
    fn from(text: String) -> Self {
        ModelOutput::Text(text)
    }
}

impl From<&str> for ModelOutput {
    fn from(text: &str) -> Self {
        ModelOutput::Text(text.to_string())
    }
}

/// The capability every LLM-orchestration component depends on.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<ModelOutput, LlmError>;

    /// Invokes the model and normalizes the reply to a trimmed string.
    async fn invoke_text(&self, prompt: &str) -> Result<String, LlmError> {
        Ok(self.invoke(prompt).await?.into_text())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Production client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Anthropic Messages API with retry logic.
/// Constructed once at startup and injected into `AppState`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    /// Validates credentials up front: a blank key is a configuration error,
    /// never something to discover on the first request.
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingCredentials(
                "ANTHROPIC_API_KEY is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        Ok(Self { client, api_key })
    }

    /// Makes a raw call to the Claude API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl ChatModel for LlmClient {
    async fn invoke(&self, prompt: &str) -> Result<ModelOutput, LlmError> {
        let response = self.call(prompt, prompts::DEFAULT_SYSTEM).await?;
        let text = response.text().ok_or(LlmError::EmptyContent)?;
        Ok(ModelOutput::Message {
            content: text.to_string(),
        })
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
///
/// Fences are searched anywhere in the text, so a model that prefixes its JSON
/// with chatter still yields the fenced body.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let (start, marker_len) = if let Some(idx) = text.find("```json") {
        (idx, "```json".len())
    } else if let Some(idx) = text.find("```") {
        (idx, "```".len())
    } else {
        return text;
    };

    let body = &text[start + marker_len..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_after_preamble() {
        let input = "Here is the JSON you asked for:\n```json\n{\"a\": 1}\n```\nHope it helps!";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```json\n{\"a\": 1}";
        assert_eq!(strip_json_fences(input), "{\"a\": 1}");
    }

    #[test]
    fn test_model_output_message_is_trimmed() {
        let out = ModelOutput::Message {
            content: "  hello \n".to_string(),
        };
        assert_eq!(out.into_text(), "hello");
    }

    #[test]
    fn test_model_output_mapping_prefers_text_key() {
        let mut map = Map::new();
        map.insert("content".to_string(), Value::String("from content".into()));
        map.insert("text".to_string(), Value::String(" from text ".into()));
        assert_eq!(ModelOutput::Mapping(map).into_text(), "from text");
    }

    #[test]
    fn test_model_output_mapping_falls_back_to_content_key() {
        let mut map = Map::new();
        map.insert("content".to_string(), Value::String("body".into()));
        assert_eq!(ModelOutput::Mapping(map).into_text(), "body");
    }

    #[test]
    fn test_model_output_bare_string() {
        assert_eq!(ModelOutput::from("  plain  ").into_text(), "plain");
    }

    #[test]
    fn test_blank_api_key_is_rejected_at_construction() {
        let result = LlmClient::new("   ".to_string());
        assert!(matches!(result, Err(LlmError::MissingCredentials(_))));
    }
}
