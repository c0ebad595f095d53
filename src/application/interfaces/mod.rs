mod conversation_store;
mod embedding_service;
mod model_backend;

pub use conversation_store::*;
pub use embedding_service::*;
pub use model_backend::*;
