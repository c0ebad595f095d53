pub mod ask_controller;
pub mod chat_controller;
pub mod status_controller;
mod turn;

pub use ask_controller::AskController;
pub use chat_controller::ChatController;
pub use status_controller::StatusController;
