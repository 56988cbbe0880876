use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::application::ReferenceSource;
use crate::domain::{DomainError, SystemPrompt};

/// Builds the system prompt from the reference content, exactly once.
///
/// The first successful [`execute`](Self::execute) reads the source and caches
/// the result; later calls return the same `Arc` without touching the source.
/// A failed load is not cached, so the caller sees the error every time.
pub struct BuildSystemPromptUseCase {
    source: Arc<dyn ReferenceSource>,
    prompt: OnceCell<Arc<SystemPrompt>>,
}

impl BuildSystemPromptUseCase {
    pub fn new(source: Arc<dyn ReferenceSource>) -> Self {
        Self {
            source,
            prompt: OnceCell::new(),
        }
    }

    pub async fn execute(&self) -> Result<Arc<SystemPrompt>, DomainError> {
        let prompt = self
            .prompt
            .get_or_try_init(|| async {
                let origin = self.source.describe();
                debug!("Loading reference content from {}", origin);

                let content = self.source.load().await?;
                if content.trim().is_empty() {
                    return Err(DomainError::resource_unavailable(format!(
                        "reference content at {} is empty",
                        origin
                    )));
                }

                let prompt = SystemPrompt::from_reference(&content);
                info!(
                    "Built system prompt from {} ({} bytes of reference text, {} bytes total)",
                    origin,
                    prompt.reference_len(),
                    prompt.len()
                );
                Ok::<_, DomainError>(Arc::new(prompt))
            })
            .await?;

        Ok(Arc::clone(prompt))
    }

    pub fn is_built(&self) -> bool {
        self.prompt.initialized()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    struct CountingSource {
        content: Option<&'static str>,
        reads: AtomicUsize,
    }

    impl CountingSource {
        fn new(content: Option<&'static str>) -> Self {
            Self {
                content,
                reads: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ReferenceSource for CountingSource {
        async fn load(&self) -> Result<String, DomainError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.content
                .map(str::to_string)
                .ok_or_else(|| DomainError::resource_unavailable("no book"))
        }

        fn describe(&self) -> String {
            "counting-stub".to_string()
        }
    }

    #[tokio::test]
    async fn builds_once_and_returns_identical_prompt() {
        let source = Arc::new(CountingSource::new(Some("The book.")));
        let use_case = BuildSystemPromptUseCase::new(source.clone());

        let first = use_case.execute().await.unwrap();
        let second = use_case.execute().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.as_str(), second.as_str());
        assert_eq!(source.reads.load(Ordering::SeqCst), 1);
        assert!(use_case.is_built());
    }

    #[tokio::test]
    async fn missing_content_is_resource_unavailable() {
        let use_case = BuildSystemPromptUseCase::new(Arc::new(CountingSource::new(None)));

        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err, DomainError::ResourceUnavailable(_)));
        assert!(err.is_fatal());
        assert!(!use_case.is_built());
    }

    #[tokio::test]
    async fn blank_content_is_resource_unavailable() {
        let use_case = BuildSystemPromptUseCase::new(Arc::new(CountingSource::new(Some(" \n"))));

        let err = use_case.execute().await.unwrap_err();
        assert!(matches!(err, DomainError::ResourceUnavailable(_)));
    }
}
