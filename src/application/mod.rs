//! # Application Layer
//!
//! Ports implemented by connectors, and the use cases that drive a chat turn.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
