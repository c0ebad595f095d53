mod anthropic_backend;
mod backend_factory;
mod chroma_conversation_store;
mod echo_backend;
mod hashed_embedding;
mod in_memory_conversation_store;
mod openai_backend;

pub use anthropic_backend::*;
pub use backend_factory::*;
pub use chroma_conversation_store::*;
pub use echo_backend::*;
pub use hashed_embedding::*;
pub use in_memory_conversation_store::*;
pub use openai_backend::*;
