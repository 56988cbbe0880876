use serde::{Deserialize, Serialize};

use super::Message;

pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Fixed generation parameters sent with every turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    model: String,
    max_tokens: u32,
}

impl GenerationSettings {
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            max_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL, DEFAULT_MAX_TOKENS)
    }
}

/// Metadata and full text of a completed turn, handed to the presentation
/// layer once the stream has ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    provider: String,
    settings: GenerationSettings,
    messages: Vec<Message>,
    completion: String,
}

impl CompletionRecord {
    pub fn new(
        provider: impl Into<String>,
        settings: GenerationSettings,
        messages: Vec<Message>,
        completion: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            settings,
            messages,
            completion: completion.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// The outbound message list the request was made with.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn completion(&self) -> &str {
        &self.completion
    }

    /// Outbound messages followed by the assistant reply.
    pub fn transcript(&self) -> Vec<Message> {
        let mut transcript = self.messages.clone();
        transcript.push(Message::assistant(self.completion.clone()));
        transcript
    }
}
