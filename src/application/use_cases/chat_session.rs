use std::sync::Arc;

use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::application::{ConversationStore, PresentationSink};
use crate::domain::{ConversationHistory, DomainError, Message};

use super::TurnHandler;

/// Request sent on session start so the model opens with a fixed greeting.
pub const GREETING_REQUEST: &str = "Acknowledge that you understand the provided context with \
the response, 'Hello, I am an expert on Albert Wenger's book The World After Capital. What \
would you like to know?'";

/// Whether the session-initialization exchange becomes part of the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GreetingPolicy {
    /// The greeting is shown but never committed; the first user question
    /// starts from an empty history.
    #[default]
    Discard,
    /// The acknowledgment request and the greeting are committed like any
    /// other turn.
    Persist,
}

/// One user's conversation: a store of committed history plus the lifecycle
/// hooks that drive turns through the shared [`TurnHandler`].
///
/// Both hooks take `&mut self`, so a session can never have two turns in
/// flight at once.
pub struct ChatSession {
    id: String,
    turns: Arc<TurnHandler>,
    store: Arc<dyn ConversationStore>,
    greeting_policy: GreetingPolicy,
}

impl ChatSession {
    pub fn new(turns: Arc<TurnHandler>, store: Arc<dyn ConversationStore>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            turns,
            store,
            greeting_policy: GreetingPolicy::default(),
        }
    }

    pub fn with_greeting_policy(mut self, policy: GreetingPolicy) -> Self {
        self.greeting_policy = policy;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reset the history and stream the model's greeting.
    pub async fn on_session_start(
        &mut self,
        sink: &mut dyn PresentationSink,
    ) -> Result<Message, DomainError> {
        let span = info_span!("session_start", session = %self.id);
        async {
            let empty = ConversationHistory::new();
            self.store.set(empty.clone()).await?;

            let turn = self.turns.run_turn(&empty, GREETING_REQUEST, sink).await?;
            let (message, history) = turn.into_parts();

            if self.greeting_policy == GreetingPolicy::Persist {
                self.store.set(history).await?;
            }

            debug!("Greeting delivered ({:?})", self.greeting_policy);
            Ok::<_, DomainError>(message)
        }
        .instrument(span)
        .await
    }

    /// Run a normal turn on top of the stored history and commit the result.
    ///
    /// Nothing is committed if the turn fails, including when `text` is blank.
    pub async fn on_user_message(
        &mut self,
        text: &str,
        sink: &mut dyn PresentationSink,
    ) -> Result<Message, DomainError> {
        let span = info_span!("user_turn", session = %self.id);
        async {
            let history = self.store.get().await?;
            let turn = self.turns.run_turn(&history, text, sink).await?;
            let (message, history) = turn.into_parts();

            debug!(
                "Committing turn {} ({} messages)",
                history.turn_count(),
                history.len()
            );
            self.store.set(history).await?;

            Ok::<_, DomainError>(message)
        }
        .instrument(span)
        .await
    }

    /// The committed history as currently stored.
    pub async fn history(&self) -> Result<ConversationHistory, DomainError> {
        self.store.get().await
    }
}
