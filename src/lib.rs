pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use cli::Commands;

pub use application::{
    BuildSystemPromptUseCase, ChatSession, ChatStreamClient, CompletedTurn, CompletionRequest,
    ConversationStore, FragmentStream, GreetingPolicy, PresentationSink, ReferenceSource,
    TurnHandler, GREETING_REQUEST,
};

pub use connector::{
    AnthropicStreamClient, ConsoleSink, FileReferenceSource, InMemoryConversationStore,
    MockChatClient, RecordedRequest,
};

pub use domain::{
    CompletionRecord, ConversationHistory, DomainError, GenerationSettings, Message, Role,
    SystemPrompt,
};
