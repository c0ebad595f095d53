use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ChatOrchestrator;
use crate::domain::{DomainError, Turn};

/// Submit one message, bounded by `limit` and abandoned on Ctrl-C.
///
/// An abandoned turn keeps the user message in the log and writes nothing to
/// the store; it is reported as a model backend error.
pub async fn submit_bounded(
    orchestrator: &mut ChatOrchestrator,
    text: &str,
    limit: Duration,
    show_spinner: bool,
) -> Result<Turn, DomainError> {
    let spinner = show_spinner.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let outcome = tokio::select! {
        result = tokio::time::timeout(limit, orchestrator.submit(text)) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match outcome {
        Some(Ok(result)) => result,
        Some(Err(_elapsed)) => {
            orchestrator.mark_cancelled();
            Err(DomainError::model_backend(
                orchestrator.backend_name(),
                format!("timed out after {}s", limit.as_secs()),
            ))
        }
        None => {
            orchestrator.mark_cancelled();
            Err(DomainError::model_backend(
                orchestrator.backend_name(),
                "cancelled by user",
            ))
        }
    }
}
