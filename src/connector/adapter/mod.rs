mod anthropic_stream_client;
mod console_sink;
mod file_reference_source;
mod in_memory_conversation_store;
mod mock_chat_client;

pub use anthropic_stream_client::*;
pub use console_sink::*;
pub use file_reference_source::*;
pub use in_memory_conversation_store::*;
pub use mock_chat_client::*;
