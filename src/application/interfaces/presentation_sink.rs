use async_trait::async_trait;

use crate::domain::{CompletionRecord, DomainError};

/// Receives the output of a turn as it is produced.
///
/// `append_fragment` is called once per provider fragment, in arrival order.
/// `finalize` is called at most once, after the stream completed successfully;
/// a failed turn never reaches it.
#[async_trait]
pub trait PresentationSink: Send {
    async fn append_fragment(&mut self, fragment: &str) -> Result<(), DomainError>;

    async fn finalize(&mut self, record: &CompletionRecord) -> Result<(), DomainError>;
}
