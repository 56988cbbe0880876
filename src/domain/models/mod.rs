mod completion;
mod conversation;
mod message;
mod system_prompt;

pub use completion::*;
pub use conversation::*;
pub use message::*;
pub use system_prompt::*;
