use anyhow::Result;
use tracing::debug;

use crate::ConsoleSink;

use super::super::Container;

pub struct AskController<'a> {
    container: &'a Container,
}

impl<'a> AskController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// One question in a fresh session; the answer streams to stdout.
    pub async fn ask(&self, question: String, greet: bool) -> Result<String> {
        let mut session = self.container.new_session();
        let mut sink = ConsoleSink::stdout();
        debug!("Started session {}", session.id());

        if greet {
            sink.wait_for_reply();
            if let Err(e) = session.on_session_start(&mut sink).await {
                sink.abandon_reply();
                return Err(e.into());
            }
        }

        sink.wait_for_reply();
        if let Err(e) = session.on_user_message(&question, &mut sink).await {
            sink.abandon_reply();
            return Err(e.into());
        }

        // The answer has already been streamed.
        Ok(String::new())
    }
}
