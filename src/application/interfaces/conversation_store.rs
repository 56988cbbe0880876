use async_trait::async_trait;

use crate::domain::{ConversationHistory, DomainError};

/// Holds the committed history of exactly one session.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The current history; empty when nothing has been committed yet.
    async fn get(&self) -> Result<ConversationHistory, DomainError>;

    /// Replace the stored history wholesale.
    async fn set(&self, history: ConversationHistory) -> Result<(), DomainError>;
}
