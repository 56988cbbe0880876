use serde::{Deserialize, Serialize};

use super::Message;

/// Ordered, append-only transcript of one session.
///
/// Extending a history never mutates it: [`ConversationHistory::with_user`] and
/// [`ConversationHistory::with_assistant`] return a new value, so the history a
/// turn was started from stays intact while the response is streaming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(&self, content: impl Into<String>) -> Self {
        self.with_message(Message::user(content))
    }

    pub fn with_assistant(&self, content: impl Into<String>) -> Self {
        self.with_message(Message::assistant(content))
    }

    pub fn with_message(&self, message: Message) -> Self {
        let mut messages = Vec::with_capacity(self.messages.len() + 1);
        messages.extend_from_slice(&self.messages);
        messages.push(message);
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of completed user/assistant exchanges.
    pub fn turn_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_assistant()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn with_user_leaves_original_untouched() {
        let base = ConversationHistory::new().with_user("q1").with_assistant("a1");
        let extended = base.with_user("q2");

        assert_eq!(base.len(), 2);
        assert_eq!(extended.len(), 3);
        assert_eq!(&extended.messages()[..2], base.messages());
        assert_eq!(extended.last().map(|m| m.role()), Some(Role::User));
    }

    #[test]
    fn turn_count_counts_assistant_replies() {
        let history = ConversationHistory::new()
            .with_user("q1")
            .with_assistant("a1")
            .with_user("q2")
            .with_assistant("a2");
        assert_eq!(history.turn_count(), 2);
        assert_eq!(ConversationHistory::new().turn_count(), 0);
    }

    #[test]
    fn serializes_as_plain_message_list() {
        let history = ConversationHistory::new().with_user("hi");
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"[{"role":"user","content":"hi"}]"#);
    }
}
