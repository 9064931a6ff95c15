//! Scripted chat model for unit tests.
//!
//! Replies are served in order; once the queue is drained the model repeats
//! its `repeat` reply (if any) or fails with `EmptyContent`.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ChatModel, LlmError, ModelOutput};

#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<ModelOutput, LlmError>>>,
    repeat: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// A model that answers every prompt with the same text.
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            repeat: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn reply(self, output: impl Into<ModelOutput>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(output.into()));
        self
    }

    pub fn fail(self, error: LlmError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn invoke(&self, prompt: &str) -> Result<ModelOutput, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            return next;
        }
        match &self.repeat {
            Some(text) => Ok(ModelOutput::Text(text.clone())),
            None => Err(LlmError::EmptyContent),
        }
    }
}
