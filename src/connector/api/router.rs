use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, PromptController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    ask_controller: AskController<'a>,
    prompt_controller: PromptController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            ask_controller: AskController::new(container),
            prompt_controller: PromptController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat { no_greeting } => self.chat_controller.chat(!no_greeting).await,
            Commands::Ask { question, greet } => self.ask_controller.ask(question, greet).await,
            Commands::Prompt { full } => self.prompt_controller.show(full).await,
        }
    }
}
