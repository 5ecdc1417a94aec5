use crate::core::form::FormState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// What a backend returns for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("{0}")]
    Rejected(String),
    #[error("action terminated before replying")]
    Crashed,
}

/// Outcome after folding `Err` and `success: false` into one failure case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Succeeded { message: Option<String> },
    Failed { message: String },
}

impl ActionOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

impl From<Result<ActionReply, ActionError>> for ActionOutcome {
    fn from(result: Result<ActionReply, ActionError>) -> Self {
        match result {
            Ok(ActionReply {
                success: true,
                message,
            }) => Self::Succeeded { message },
            Ok(ActionReply {
                success: false,
                message,
            }) => Self::failed(
                message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string()),
            ),
            Err(ActionError::Rejected(message)) if !message.is_empty() => Self::failed(message),
            Err(_) => Self::failed(DEFAULT_FAILURE_MESSAGE),
        }
    }
}

/// The external operation a screen performs once its form is valid.
#[async_trait]
pub trait Action: Send + Sync {
    async fn perform(&self, form: FormState) -> Result<ActionReply, ActionError>;
}

pub struct FnAction<F>(F);

pub fn action_fn<F, Fut>(f: F) -> FnAction<F>
where
    F: Fn(FormState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ActionReply, ActionError>> + Send + 'static,
{
    FnAction(f)
}

#[async_trait]
impl<F, Fut> Action for FnAction<F>
where
    F: Fn(FormState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ActionReply, ActionError>> + Send + 'static,
{
    async fn perform(&self, form: FormState) -> Result<ActionReply, ActionError> {
        (self.0)(form).await
    }
}
