use async_trait::async_trait;

use crate::domain::DomainError;

/// Supplies the static reference text (the book) the system prompt is built from.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Load the whole document into memory.
    ///
    /// Fails with [`DomainError::ResourceUnavailable`] when the content cannot
    /// be read.
    async fn load(&self) -> Result<String, DomainError>;

    /// Human-readable origin of the content, for logging.
    fn describe(&self) -> String;
}
