use async_trait::async_trait;
use futures_util::stream;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::{ChatStreamClient, CompletionRequest, FragmentStream};
use crate::domain::{DomainError, GenerationSettings, Message};

const PROVIDER: &str = "mock";

/// A request as seen by [`MockChatClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub settings: GenerationSettings,
    pub system_prompt: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    OnOpen,
    AfterFragments(usize),
}

/// Offline [`ChatStreamClient`] for development and tests.
///
/// With no script it echoes the last user message back word by word. With a
/// script it emits exactly those fragments on every call. It can also be told
/// to fail, either before streaming or after a given number of fragments.
pub struct MockChatClient {
    script: Option<Vec<String>>,
    failure: Option<Failure>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            script: None,
            failure: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: Some(fragments.into_iter().map(Into::into).collect()),
            ..Self::new()
        }
    }

    /// Yield `count` fragments, then a streaming failure instead of the rest.
    pub fn failing_after(mut self, count: usize) -> Self {
        self.failure = Some(Failure::AfterFragments(count));
        self
    }

    /// Refuse to open the stream at all.
    pub fn failing_on_open(mut self) -> Self {
        self.failure = Some(Failure::OnOpen);
        self
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    fn fragments_for(&self, messages: &[Message]) -> Vec<String> {
        if let Some(script) = &self.script {
            return script.clone();
        }

        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.is_user())
            .map(|m| m.content())
            .unwrap_or_default();

        let mut fragments = vec!["You asked:".to_string()];
        fragments.extend(last_user.split_whitespace().map(|w| format!(" {w}")));
        fragments
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatStreamClient for MockChatClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    async fn stream(&self, request: CompletionRequest<'_>) -> Result<FragmentStream, DomainError> {
        self.requests.lock().await.push(RecordedRequest {
            settings: request.settings.clone(),
            system_prompt: request.system_prompt.as_str().to_string(),
            messages: request.messages.to_vec(),
        });

        let mut items: Vec<Result<String, DomainError>> = self
            .fragments_for(request.messages)
            .into_iter()
            .map(Ok)
            .collect();

        match self.failure {
            Some(Failure::OnOpen) => {
                return Err(DomainError::streaming("MockChatClient: connection refused"));
            }
            Some(Failure::AfterFragments(count)) => {
                items.truncate(count);
                items.push(Err(DomainError::streaming(
                    "MockChatClient: simulated transport failure",
                )));
            }
            None => {}
        }

        debug!("MockChatClient streaming {} items", items.len());
        Ok(Box::pin(stream::iter(items)))
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;
    use crate::domain::SystemPrompt;

    async fn collect(client: &MockChatClient, messages: &[Message]) -> Vec<Result<String, DomainError>> {
        let settings = GenerationSettings::default();
        let prompt = SystemPrompt::from_reference("book");
        let request = CompletionRequest {
            settings: &settings,
            system_prompt: &prompt,
            messages,
        };
        client.stream(request).await.unwrap().collect().await
    }

    #[tokio::test]
    async fn echoes_last_user_message() {
        let client = MockChatClient::new();
        let items = collect(&client, &[Message::user("what is it")]).await;

        let text: String = items.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(text, "You asked: what is it");
    }

    #[tokio::test]
    async fn failing_after_truncates_and_errors() {
        let client = MockChatClient::with_fragments(["a", "b", "c"]).failing_after(1);
        let items = collect(&client, &[Message::user("q")]).await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "a");
        assert!(items[1].as_ref().unwrap_err().is_streaming_failure());
    }

    #[tokio::test]
    async fn records_requests() {
        let client = MockChatClient::with_fragments(["x"]);
        collect(&client, &[Message::user("q")]).await;

        let requests = client.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages, vec![Message::user("q")]);
        assert!(requests[0].system_prompt.contains("<book-content>\nbook\n</book-content>"));
    }
}
