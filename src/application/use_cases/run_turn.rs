use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::application::{ChatStreamClient, CompletionRequest, PresentationSink};
use crate::domain::{
    CompletionRecord, ConversationHistory, DomainError, GenerationSettings, Message, SystemPrompt,
};

/// Result of a turn whose stream completed.
#[derive(Debug, Clone)]
pub struct CompletedTurn {
    message: Message,
    history: ConversationHistory,
}

impl CompletedTurn {
    /// The assistant reply.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Prior history plus the user message and the assistant reply; what the
    /// caller commits to its store.
    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn into_parts(self) -> (Message, ConversationHistory) {
        (self.message, self.history)
    }
}

/// Runs one request/response cycle against the model provider.
///
/// The handler is stateless across turns: history comes in as an argument and
/// the extended history goes out in the [`CompletedTurn`]. It is shared by
/// every session in the process.
pub struct TurnHandler {
    client: Arc<dyn ChatStreamClient>,
    system_prompt: Arc<SystemPrompt>,
    settings: GenerationSettings,
}

impl TurnHandler {
    pub fn new(
        client: Arc<dyn ChatStreamClient>,
        system_prompt: Arc<SystemPrompt>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            system_prompt,
            settings,
        }
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Send `history + [user_text]` to the provider and forward the reply to
    /// `sink` fragment by fragment.
    ///
    /// Blank `user_text` is rejected before any request is made. `finalize` is
    /// only reached once the provider stream has ended cleanly. On any error
    /// the turn is abandoned and `history` is left as it was.
    pub async fn run_turn(
        &self,
        history: &ConversationHistory,
        user_text: &str,
        sink: &mut dyn PresentationSink,
    ) -> Result<CompletedTurn, DomainError> {
        if user_text.trim().is_empty() {
            return Err(DomainError::invalid_input("message must not be blank"));
        }

        let outbound = history.with_user(user_text);
        let request = CompletionRequest {
            settings: &self.settings,
            system_prompt: &self.system_prompt,
            messages: outbound.messages(),
        };

        debug!(
            "Starting turn: {} prior messages, model {}, max_tokens {}",
            history.len(),
            self.settings.model(),
            self.settings.max_tokens()
        );
        let start_time = Instant::now();

        let mut fragments = self.client.stream(request).await.map_err(|e| {
            warn!("Failed to open completion stream: {}", e);
            e
        })?;

        let mut output = String::new();
        let mut fragment_count = 0usize;
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment.map_err(|e| {
                warn!(
                    "Completion stream failed after {} fragments: {}",
                    fragment_count, e
                );
                e
            })?;
            sink.append_fragment(&fragment).await?;
            output.push_str(&fragment);
            fragment_count += 1;
        }

        let record = CompletionRecord::new(
            self.client.provider(),
            self.settings.clone(),
            outbound.messages().to_vec(),
            output.clone(),
        );
        sink.finalize(&record).await?;

        debug!(
            "Turn completed in {:?}: {} fragments, {} bytes",
            start_time.elapsed(),
            fragment_count,
            output.len()
        );

        let message = Message::assistant(output);
        let history = outbound.with_message(message.clone());

        Ok(CompletedTurn { message, history })
    }
}
