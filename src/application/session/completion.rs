use tokio::sync::oneshot;

use crate::domain::errors::SessionError;
use crate::domain::models::ProcessingResult;

pub type SessionOutcome = Result<ProcessingResult, SessionError>;

/// Single-shot result slot shared between a session and its caller
#[derive(Debug)]
pub(crate) struct Completion {
    sender: Option<oneshot::Sender<SessionOutcome>>,
    completed: bool,
}

impl Completion {
    pub(crate) fn channel() -> (Completion, oneshot::Receiver<SessionOutcome>) {
        let (sender, receiver) = oneshot::channel();
        (
            Completion {
                sender: Some(sender),
                completed: false,
            },
            receiver,
        )
    }

    /// Deliver the outcome. Returns false if the session had already completed.
    pub(crate) fn fulfil(&mut self, outcome: SessionOutcome) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(outcome);
        }
        true
    }
}
