use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::application::{ChatStreamClient, ReferenceSource};
use crate::{
    AnthropicStreamClient, BuildSystemPromptUseCase, ChatSession, FileReferenceSource,
    GenerationSettings, GreetingPolicy, InMemoryConversationStore, MockChatClient, SystemPrompt,
    TurnHandler,
};

pub const DEFAULT_BOOK_PATH: &str = "TWAC2023.txt";

pub struct ContainerConfig {
    /// Plain-text reference document embedded in the system prompt.
    pub book_path: PathBuf,
    /// Model id; when `None`, `ANTHROPIC_MODEL` or the built-in default is used.
    pub model: Option<String>,
    pub max_tokens: u32,
    /// Use the offline [`MockChatClient`] instead of the Anthropic API.
    ///
    /// No credential is required in this mode.
    pub mock_provider: bool,
    /// Commit the session-initialization exchange to history.
    pub persist_greeting: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            book_path: PathBuf::from(DEFAULT_BOOK_PATH),
            model: None,
            max_tokens: GenerationSettings::default().max_tokens(),
            mock_provider: false,
            persist_greeting: false,
        }
    }
}

/// Process-wide wiring: everything here is built once at startup and shared
/// read-only by every session.
pub struct Container {
    system_prompt: Arc<SystemPrompt>,
    turn_handler: Arc<TurnHandler>,
    greeting_policy: GreetingPolicy,
    config: ContainerConfig,
}

impl Container {
    /// Build the system prompt and the provider client.
    ///
    /// Fails when the book cannot be read (`ResourceUnavailable`) or when the
    /// real provider is selected without a credential (`AuthenticationMissing`).
    pub async fn new(config: ContainerConfig) -> Result<Self> {
        let source: Arc<dyn ReferenceSource> =
            Arc::new(FileReferenceSource::new(config.book_path.clone()));
        let client: Arc<dyn ChatStreamClient> = if config.mock_provider {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            let client = AnthropicStreamClient::from_env()?;
            debug!("Using Anthropic chat client at {}", client.url());
            Arc::new(client)
        };

        Self::with_parts(config, source, client).await
    }

    /// Assemble a container from explicit adapters.
    pub async fn with_parts(
        config: ContainerConfig,
        source: Arc<dyn ReferenceSource>,
        client: Arc<dyn ChatStreamClient>,
    ) -> Result<Self> {
        let system_prompt = BuildSystemPromptUseCase::new(source).execute().await?;

        let model = config
            .model
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_MODEL").ok())
            .unwrap_or_else(|| GenerationSettings::default().model().to_string());
        let settings = GenerationSettings::new(model, config.max_tokens);
        info!(
            "Provider {} with model {} (max_tokens {})",
            client.provider(),
            settings.model(),
            settings.max_tokens()
        );

        let turn_handler = Arc::new(TurnHandler::new(
            client,
            Arc::clone(&system_prompt),
            settings,
        ));

        let greeting_policy = if config.persist_greeting {
            GreetingPolicy::Persist
        } else {
            GreetingPolicy::Discard
        };

        Ok(Self {
            system_prompt,
            turn_handler,
            greeting_policy,
            config,
        })
    }

    /// A fresh session with its own empty history.
    pub fn new_session(&self) -> ChatSession {
        ChatSession::new(
            self.turn_handler.clone(),
            Arc::new(InMemoryConversationStore::new()),
        )
        .with_greeting_policy(self.greeting_policy)
    }

    pub fn system_prompt(&self) -> Arc<SystemPrompt> {
        self.system_prompt.clone()
    }

    pub fn settings(&self) -> &GenerationSettings {
        self.turn_handler.settings()
    }

    pub fn book_path(&self) -> &std::path::Path {
        &self.config.book_path
    }

    pub fn mock_provider(&self) -> bool {
        self.config.mock_provider
    }
}
