use std::any::Any;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::SessionOutcome;
use crate::domain::errors::SessionError;

/// Handle to a session running on its own task
#[derive(Debug)]
pub struct SessionHandle {
    outcome: oneshot::Receiver<SessionOutcome>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub(crate) fn new(
        outcome: oneshot::Receiver<SessionOutcome>,
        cancel: CancellationToken,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            outcome,
            cancel,
            task,
        }
    }

    /// Ask the session to stop. It fails with `SessionError::Cancelled` unless
    /// it has already completed.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the session's single outcome.
    ///
    /// A task that dies without an outcome is reported as `Panicked` if it
    /// panicked and as `Cancelled` if the runtime aborted it.
    pub async fn wait(self) -> SessionOutcome {
        match self.outcome.await {
            Ok(outcome) => outcome,
            Err(_) => match self.task.await {
                Err(error) if error.is_panic() => {
                    Err(SessionError::Panicked(panic_message(error.into_panic())))
                }
                _ => Err(SessionError::Cancelled),
            },
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
