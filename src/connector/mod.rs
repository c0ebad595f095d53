//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Model backends (Anthropic, OpenAI, offline echo)
//! - Conversation stores (in-memory, ChromaDB)
//! - Embeddings (offline hashed bag-of-words)
//! - The CLI-facing container, router, and controllers

pub mod adapter;
pub mod api;

pub use adapter::*;
pub use api::*;
