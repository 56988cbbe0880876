use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::{ChatSession, ConsoleSink, ConversationHistory, DomainError};

use super::super::Container;

const REPLY_LABEL: &str = "Claude: ";

pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Interactive session on stdin/stdout.
    pub async fn chat(&self, greet: bool) -> Result<String> {
        let input = BufReader::new(tokio::io::stdin());
        let sink = ConsoleSink::stdout().with_label(REPLY_LABEL);
        self.chat_with(input, sink, greet, true).await
    }

    /// Run a session reading one user message per line from `input`.
    ///
    /// A failed turn is reported and the session carries on with its history
    /// unchanged. Only a broken output or input ends the session early.
    pub async fn chat_with<R, W>(
        &self,
        input: R,
        mut sink: ConsoleSink<W>,
        greet: bool,
        show_prompt: bool,
    ) -> Result<String>
    where
        R: AsyncBufRead + Unpin,
        W: Write + Send,
    {
        let mut session = self.container.new_session();
        debug!("Started session {}", session.id());

        if greet {
            sink.wait_for_reply();
            if let Err(e) = session.on_session_start(&mut sink).await {
                sink.abandon_reply();
                report_turn_error(e)?;
            }
        }

        let mut lines = input.lines();
        let mut failed_turns = 0usize;
        loop {
            if show_prompt {
                eprint!("> ");
                let _ = std::io::stderr().flush();
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let text = line.trim();
            match text {
                "" => continue,
                "/exit" | "/quit" => break,
                "/history" => {
                    eprintln!("{}", format_history(&session.history().await?));
                    continue;
                }
                _ => {}
            }

            sink.wait_for_reply();
            if let Err(e) = session.on_user_message(text, &mut sink).await {
                sink.abandon_reply();
                report_turn_error(e)?;
                failed_turns += 1;
            }
        }

        self.format_summary(&session, failed_turns).await
    }

    async fn format_summary(&self, session: &ChatSession, failed_turns: usize) -> Result<String> {
        let history = session.history().await?;
        let mut output = format!(
            "Session {} ended after {} turns ({} messages).",
            session.id(),
            history.turn_count(),
            history.len()
        );
        if failed_turns > 0 {
            output.push_str(&format!(" {} turns failed.", failed_turns));
        }
        Ok(output)
    }
}

/// Turn-scoped errors are shown to the user; a broken sink is not recoverable.
fn report_turn_error(error: DomainError) -> Result<()> {
    if matches!(error, DomainError::Presentation(_)) || error.is_fatal() {
        return Err(error.into());
    }
    warn!("Turn failed: {}", error);
    eprintln!("Error: {}", error);
    Ok(())
}

fn format_history(history: &ConversationHistory) -> String {
    if history.is_empty() {
        return "No messages yet.".to_string();
    }

    let mut output = String::new();
    for (i, message) in history.messages().iter().enumerate() {
        let preview: String = message.content().chars().take(80).collect();
        output.push_str(&format!("{:>3}. [{}] {}\n", i + 1, message.role(), preview));
    }
    output.trim_end().to_string()
}
