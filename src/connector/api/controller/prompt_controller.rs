use anyhow::Result;

use crate::SystemPrompt;

use super::super::Container;

pub struct PromptController<'a> {
    container: &'a Container,
}

impl<'a> PromptController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn show(&self, full: bool) -> Result<String> {
        let prompt = self.container.system_prompt();
        if full {
            return Ok(prompt.as_str().to_string());
        }
        Ok(self.format_summary(&prompt))
    }

    fn format_summary(&self, prompt: &SystemPrompt) -> String {
        let settings = self.container.settings();
        format!(
            "BookChat System Prompt\n======================\nBook:         {}\nBook Size:    {} bytes\nPrompt Size:  {} bytes\nModel:        {}\nMax Tokens:   {}\nProvider:     {}",
            self.container.book_path().display(),
            prompt.reference_len(),
            prompt.len(),
            settings.model(),
            settings.max_tokens(),
            if self.container.mock_provider() { "mock" } else { "anthropic" }
        )
    }
}
