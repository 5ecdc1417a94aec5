//! Stand-in backend for the stock screens.
//!
//! Every check here is placeholder logic (hard-coded demo credentials). A real
//! backend replaces this by implementing [`Action`]; nothing else changes.

use crate::core::form::FormState;
use crate::screens::ScreenKind;
use crate::task::action::{Action, ActionError, ActionReply};
use async_trait::async_trait;
use std::time::Duration;

pub const MOCK_LATENCY: Duration = Duration::from_millis(500);
pub const DEMO_EMAIL: &str = "john.doe@gmail.com";
pub const DEMO_PASSWORD: &str = "password123";
pub const DEMO_CODE: &str = "123456";

#[derive(Debug, Clone)]
pub struct MockBackend {
    kind: ScreenKind,
    latency: Duration,
}

impl MockBackend {
    pub fn new(kind: ScreenKind) -> Self {
        Self {
            kind,
            latency: MOCK_LATENCY,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn reply(&self, form: &FormState) -> Result<ActionReply, ActionError> {
        match self.kind {
            ScreenKind::Login => {
                if text(form, "email") == DEMO_EMAIL && text(form, "password") == DEMO_PASSWORD {
                    Ok(ActionReply::ok("Login successful"))
                } else {
                    Err(ActionError::Rejected("Invalid email or password".into()))
                }
            }
            ScreenKind::Signup => Ok(ActionReply::ok("Signup successful")),
            ScreenKind::Forgot => {
                if text(form, "email") == DEMO_EMAIL {
                    Ok(ActionReply::ok("Reset link sent"))
                } else {
                    Err(ActionError::Rejected("Email not found".into()))
                }
            }
            ScreenKind::Verify => {
                if text(form, "code").to_uppercase() == DEMO_CODE {
                    Ok(ActionReply::ok("Code verified"))
                } else {
                    Ok(ActionReply::rejected("Invalid or expired code"))
                }
            }
            ScreenKind::Reset => {
                if text(form, "password").chars().count() >= 8 {
                    Ok(ActionReply::ok("Password reset"))
                } else {
                    Err(ActionError::Rejected("Password reset failed".into()))
                }
            }
        }
    }
}

fn text<'a>(form: &'a FormState, id: &str) -> &'a str {
    form.text(id).unwrap_or_default()
}

#[async_trait]
impl Action for MockBackend {
    async fn perform(&self, form: FormState) -> Result<ActionReply, ActionError> {
        tracing::debug!(screen = %self.kind, "mock backend called");
        tokio::time::sleep(self.latency).await;
        self.reply(&form)
    }
}
