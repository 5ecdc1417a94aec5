use crate::core::form::FormState;
use crate::task::action::{Action, ActionError, ActionOutcome};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tokio::task::AbortHandle;

#[derive(Debug, Clone)]
pub struct ActionInvocation {
    pub run_id: u64,
    pub form: FormState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCompletion {
    pub run_id: u64,
    pub outcome: ActionOutcome,
}

/// Runs actions on the tokio runtime and hands their completions back
/// through a channel, tagged with the run id they were started under.
pub struct ActionExecutor {
    completion_tx: UnboundedSender<ActionCompletion>,
    completion_rx: UnboundedReceiver<ActionCompletion>,
    in_flight: Vec<AbortHandle>,
}

impl ActionExecutor {
    pub fn new() -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel::<ActionCompletion>();
        Self {
            completion_tx,
            completion_rx,
            in_flight: Vec::new(),
        }
    }

    pub fn spawn(&mut self, action: Arc<dyn Action>, invocation: ActionInvocation) {
        let ActionInvocation { run_id, form } = invocation;
        let worker = tokio::spawn(async move { action.perform(form).await });
        let worker_abort = worker.abort_handle();

        let completion_tx = self.completion_tx.clone();
        let relay = tokio::spawn(async move {
            let result = match worker.await {
                Ok(result) => result,
                Err(err) if err.is_cancelled() => return,
                Err(err) => {
                    tracing::error!(run_id, error = %err, "action task panicked");
                    Err(ActionError::Crashed)
                }
            };
            let _ = completion_tx.send(ActionCompletion {
                run_id,
                outcome: ActionOutcome::from(result),
            });
        });

        self.in_flight.retain(|handle| !handle.is_finished());
        self.in_flight.push(worker_abort);
        self.in_flight.push(relay.abort_handle());
    }

    pub async fn next_completion(&mut self) -> Option<ActionCompletion> {
        self.completion_rx.recv().await
    }

    pub fn drain_ready(&mut self) -> Vec<ActionCompletion> {
        let mut out = Vec::<ActionCompletion>::new();
        loop {
            match self.completion_rx.try_recv() {
                Ok(completion) => out.push(completion),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    pub fn abort_all(&mut self) {
        for handle in self.in_flight.drain(..) {
            handle.abort();
        }
    }
}

impl Default for ActionExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ActionExecutor {
    fn drop(&mut self) {
        self.abort_all();
    }
}
