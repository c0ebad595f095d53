use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, StatusController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    ask_controller: AskController<'a>,
    status_controller: StatusController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            ask_controller: AskController::new(container),
            status_controller: StatusController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Chat { export } => self.chat_controller.chat(export).await,
            Commands::Ask { prompt } => self.ask_controller.ask(prompt).await,
            Commands::Status => self.status_controller.status().await,
        }
    }
}
