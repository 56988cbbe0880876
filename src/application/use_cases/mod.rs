mod build_system_prompt;
mod chat_session;
mod run_turn;

pub use build_system_prompt::*;
pub use chat_session::*;
pub use run_turn::*;
