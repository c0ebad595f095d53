use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::use_cases::compose_prompt::compose_prompt;
use crate::application::{ConversationStore, ModelBackend};
use crate::domain::{DocumentMetadata, DomainError, MessageLog, Role, Turn, DEFAULT_MAX_TOKENS};

/// Number of prior documents retrieved as context for each turn.
pub const DEFAULT_CONTEXT_K: usize = 5;

/// Progress of the most recent turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Idle,
    AwaitingModelResponse,
    Completed,
    Failed,
}

impl TurnState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnState::Idle => "idle",
            TurnState::AwaitingModelResponse => "awaiting_model_response",
            TurnState::Completed => "completed",
            TurnState::Failed => "failed",
        }
    }
}

/// Drives one chat session: owns the message log and runs each turn through
/// context retrieval, prompt composition, the model backend, and the store.
///
/// `submit` takes `&mut self`, so turns within a session are strictly sequential.
/// The assistant turn is appended only after the store write returns; dropping
/// an in-flight `submit` future leaves just the user turn in the log.
pub struct ChatOrchestrator {
    store: Arc<dyn ConversationStore>,
    backend: Arc<dyn ModelBackend>,
    log: MessageLog,
    state: TurnState,
    context_k: usize,
    max_tokens: u32,
}

impl ChatOrchestrator {
    pub fn new(store: Arc<dyn ConversationStore>, backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            store,
            backend,
            log: MessageLog::new(),
            state: TurnState::Idle,
            context_k: DEFAULT_CONTEXT_K,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_context_k(mut self, k: usize) -> Self {
        self.context_k = k;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Run one turn and return the assistant's reply.
    pub async fn submit(&mut self, user_text: &str) -> Result<Turn, DomainError> {
        if user_text.trim().is_empty() {
            return Err(DomainError::invalid_argument("message cannot be empty"));
        }

        self.log.append(Role::User, user_text);
        self.state = TurnState::AwaitingModelResponse;

        let result = self.run_turn(user_text).await;
        self.state = match &result {
            Ok(_) => TurnState::Completed,
            Err(e) => {
                warn!("Turn failed: {}", e);
                TurnState::Failed
            }
        };
        debug!("Turn {}", self.state.as_str());
        result
    }

    async fn run_turn(&mut self, user_text: &str) -> Result<Turn, DomainError> {
        let start_time = Instant::now();
        let k = i64::try_from(self.context_k).unwrap_or(i64::MAX);
        let context = self.store.query(user_text, k).await?;
        debug!("Retrieved {} context documents", context.len());
        for document in &context {
            debug!("  {}", document.display_line());
        }

        let prompt = compose_prompt(&context, user_text);

        info!(
            "Sending {} chars to {} (context documents: {})",
            prompt.len(),
            self.backend.name(),
            context.len()
        );
        let reply = self.backend.generate(&prompt, self.max_tokens).await?;

        if reply.trim().is_empty() {
            return Err(DomainError::model_backend(
                self.backend.name(),
                "model returned an empty response",
            ));
        }

        // No await may follow the assistant append.
        let document = format!("{} {}", user_text, reply);
        let id = self.store.add(&document, DocumentMetadata::now()).await?;

        let assistant_turn = self.log.append(Role::Assistant, reply.as_str()).clone();

        info!(
            "Turn completed in {:.2}s (stored document {})",
            start_time.elapsed().as_secs_f64(),
            id
        );

        Ok(assistant_turn)
    }

    /// Record that the in-flight turn was abandoned by the caller (timeout or
    /// cancellation). Has no effect once the turn has finished.
    pub fn mark_cancelled(&mut self) {
        if self.state == TurnState::AwaitingModelResponse {
            self.state = TurnState::Failed;
        }
    }

    /// Plain-text transcript, one `"<role>: <text>"` line per turn.
    pub fn export_transcript(&self) -> String {
        self.log.export_transcript()
    }

    pub fn messages(&self) -> &[Turn] {
        self.log.turns()
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }
}
