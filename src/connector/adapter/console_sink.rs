use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::application::PresentationSink;
use crate::domain::{CompletionRecord, DomainError};

/// Writes streamed replies to a terminal (or any writer).
///
/// Each fragment is written and flushed as soon as it arrives. Between
/// [`ConsoleSink::wait_for_reply`] and the first fragment a spinner is shown on
/// stderr; indicatif hides it automatically when stderr is not a terminal.
pub struct ConsoleSink<W: Write + Send> {
    out: W,
    spinner: Option<ProgressBar>,
    show_spinner: bool,
    label: Option<String>,
    fragments: usize,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            spinner: None,
            show_spinner: true,
            label: None,
            fragments: 0,
        }
    }

    /// Prefix printed before the first fragment of every reply, e.g. `"Claude: "`.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn without_spinner(mut self) -> Self {
        self.show_spinner = false;
        self
    }

    /// Prepare for a new reply: reset counters and start the spinner.
    pub fn wait_for_reply(&mut self) {
        self.fragments = 0;
        if !self.show_spinner {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    /// Stop the spinner, e.g. when a turn failed and no fragment will come.
    pub fn abandon_reply(&mut self) {
        self.clear_spinner();
        if self.fragments > 0 {
            // Terminate the partial line so the error prints on its own.
            let _ = writeln!(self.out);
            let _ = self.out.flush();
        }
        self.fragments = 0;
    }

    pub fn into_inner(mut self) -> W {
        self.clear_spinner();
        self.out
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn write(&mut self, text: &str) -> Result<(), DomainError> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
            .map_err(|e| DomainError::presentation(format!("failed to write reply: {e}")))
    }
}

#[async_trait]
impl<W: Write + Send> PresentationSink for ConsoleSink<W> {
    async fn append_fragment(&mut self, fragment: &str) -> Result<(), DomainError> {
        if self.fragments == 0 {
            self.clear_spinner();
            if let Some(label) = self.label.clone() {
                self.write(&label)?;
            }
        }
        self.fragments += 1;
        self.write(fragment)
    }

    async fn finalize(&mut self, record: &CompletionRecord) -> Result<(), DomainError> {
        self.clear_spinner();
        self.write("\n")?;
        debug!(
            "Reply complete: provider {}, model {}, {} outbound messages, {} fragments, {} bytes",
            record.provider(),
            record.settings().model(),
            record.messages().len(),
            self.fragments,
            record.completion().len()
        );
        self.fragments = 0;
        Ok(())
    }
}
