use crate::core::value::Value;
use crate::runtime::navigation::TracingGateway;
use crate::runtime::screen::Screen;
use crate::screens::{ScreenConfig, ScreenKind};
use crate::state::view::ScreenView;
use crate::task::mock::MockBackend;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
pub struct Args {
    pub kind: ScreenKind,
    pub config: ScreenConfig,
    pub fields: Vec<(String, Value)>,
    pub latency: Duration,
}

/// Fills the screen, submits once and waits for the outcome, including the
/// redirect on success.
///
/// # Errors
/// Returns an error if a field is not declared by the screen.
pub async fn execute(args: Args) -> Result<ScreenView> {
    let Args {
        kind,
        config,
        fields,
        latency,
    } = args;

    let backend = MockBackend::new(kind).with_latency(latency);
    let mut screen = Screen::new(config, Arc::new(backend), Box::new(TracingGateway::default()));

    for (id, value) in fields {
        screen
            .set_field(&id, value)
            .with_context(|| format!("cannot set field on {kind} screen"))?;
    }

    if let Err(rejected) = screen.submit() {
        tracing::warn!(%rejected, "submit ignored");
    }
    screen.run_until_settled().await;

    let view = screen.view();
    screen.teardown();
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::status::SubmissionStatus;
    use crate::task::mock::DEMO_CODE;

    fn args(kind: ScreenKind, fields: &[(&str, Value)]) -> Args {
        Args {
            kind,
            config: kind.config(),
            fields: fields
                .iter()
                .map(|(id, value)| ((*id).to_string(), value.clone()))
                .collect(),
            latency: Duration::from_millis(10),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn verify_with_demo_code_settles_idle() {
        let view = execute(args(ScreenKind::Verify, &[("code", Value::from(DEMO_CODE))]))
            .await
            .expect("view");
        assert_eq!(view.status, SubmissionStatus::Idle);
        assert!(view.errors.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn forgot_with_unknown_email_reports_failure() {
        let view = execute(args(ScreenKind::Forgot, &[("email", Value::from("jane@example.com"))]))
            .await
            .expect("view");
        assert_eq!(view.status, SubmissionStatus::Failed);
        assert_eq!(
            view.notice.map(|notice| notice.text),
            Some("Failed to send reset link: Email not found".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn undeclared_field_is_an_error() {
        let result = execute(args(ScreenKind::Verify, &[("email", Value::from("a@b.co"))])).await;
        assert!(result.is_err());
    }
}
