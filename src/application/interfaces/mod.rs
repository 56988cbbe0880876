mod chat_stream_client;
mod conversation_store;
mod presentation_sink;
mod reference_source;

pub use chat_stream_client::*;
pub use conversation_store::*;
pub use presentation_sink::*;
pub use reference_source::*;
