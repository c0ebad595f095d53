mod chat_orchestrator;
mod check_backends;
mod compose_prompt;

pub use chat_orchestrator::*;
pub use check_backends::*;
pub use compose_prompt::*;
