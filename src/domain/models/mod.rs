mod embedding;
mod message_log;
mod model_config;
mod stored_document;
mod turn;

pub use embedding::*;
pub use message_log::*;
pub use model_config::*;
pub use stored_document::*;
pub use turn::*;
