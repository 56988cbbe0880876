use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ConversationStore;
use crate::domain::{ConversationHistory, DomainError};

/// Process-lifetime history for a single session.
pub struct InMemoryConversationStore {
    history: Arc<Mutex<ConversationHistory>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self {
            history: Arc::new(Mutex::new(ConversationHistory::new())),
        }
    }
}

impl Default for InMemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self) -> Result<ConversationHistory, DomainError> {
        let history = self.history.lock().await;
        Ok(history.clone())
    }

    async fn set(&self, history: ConversationHistory) -> Result<(), DomainError> {
        let mut stored = self.history.lock().await;
        debug!("Replacing {} stored messages with {}", stored.len(), history.len());
        *stored = history;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_empty() {
        let store = InMemoryConversationStore::new();
        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn set_replaces_wholesale() {
        let store = InMemoryConversationStore::new();
        store
            .set(ConversationHistory::new().with_user("a").with_assistant("b"))
            .await
            .unwrap();
        store
            .set(ConversationHistory::new().with_user("c"))
            .await
            .unwrap();

        let history = store.get().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.messages()[0].content(), "c");
    }
}
