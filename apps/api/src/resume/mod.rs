// Resume pipeline: load → extract structured record → render bullets.
// All LLM calls go through llm_client::ChatModel.

pub mod bullets;
pub mod extractor;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod prompts;
