use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::domain::{DomainError, GenerationSettings, Message, SystemPrompt};

/// Incremental text fragments of one assistant reply, in provider order.
///
/// The stream ends after the provider signalled end-of-message. Any item may
/// be a [`DomainError::StreamingFailure`], after which the stream yields nothing
/// further.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, DomainError>> + Send>>;

/// Everything a provider needs to produce one reply.
#[derive(Debug, Clone, Copy)]
pub struct CompletionRequest<'a> {
    pub settings: &'a GenerationSettings,
    pub system_prompt: &'a SystemPrompt,
    pub messages: &'a [Message],
}

/// An interface for streaming chat completions from a remote model.
///
/// Implementors encapsulate transport, serialization, and vendor-specific
/// event formats. The returned stream owns everything it needs, so the
/// request may be dropped as soon as `stream` returns.
#[async_trait]
pub trait ChatStreamClient: Send + Sync {
    /// Short provider identifier recorded in completion records.
    fn provider(&self) -> &str;

    async fn stream(&self, request: CompletionRequest<'_>) -> Result<FragmentStream, DomainError>;
}
