use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    /// The static reference content (the book) could not be loaded.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// No credential was supplied for the remote model provider.
    #[error("Authentication missing: {0}")]
    AuthenticationMissing(String),

    /// The provider stream failed or was interrupted mid-turn.
    #[error("Streaming failure: {0}")]
    StreamingFailure(String),

    #[error("Presentation error: {0}")]
    Presentation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DomainError {
    pub fn resource_unavailable(msg: impl Into<String>) -> Self {
        Self::ResourceUnavailable(msg.into())
    }

    pub fn authentication_missing(msg: impl Into<String>) -> Self {
        Self::AuthenticationMissing(msg.into())
    }

    pub fn streaming(msg: impl Into<String>) -> Self {
        Self::StreamingFailure(msg.into())
    }

    pub fn presentation(msg: impl Into<String>) -> Self {
        Self::Presentation(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Startup errors abort the process; everything else is scoped to a turn.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ResourceUnavailable(_) | Self::AuthenticationMissing(_)
        )
    }

    pub fn is_streaming_failure(&self) -> bool {
        matches!(self, Self::StreamingFailure(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_startup_errors_are_fatal() {
        for (error, fatal) in [
            (DomainError::resource_unavailable("book"), true),
            (DomainError::authentication_missing("key"), true),
            (DomainError::streaming("reset"), false),
            (DomainError::presentation("closed"), false),
            (DomainError::invalid_input("blank"), false),
        ] {
            assert_eq!(error.is_fatal(), fatal, "{error}");
        }
    }
}
