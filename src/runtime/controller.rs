//! Submission state machine for one screen.
//!
//! The controller never performs I/O. Every operation mutates the screen
//! state and returns the effects the runtime must carry out: run the action,
//! arm or cancel the redirect timer, navigate, move focus.

use crate::core::form::{FieldId, FormError, FormState};
use crate::core::rules::{self, RuleTable};
use crate::core::value::Value;
use crate::runtime::effect::Effect;
use crate::runtime::event::ScreenEvent;
use crate::runtime::navigation::{NavigationError, Route};
use crate::runtime::scheduler::SchedulerCommand;
use crate::screens::ScreenConfig;
use crate::state::status::{Notice, SubmissionStatus};
use crate::state::validation::ErrorState;
use crate::task::action::ActionOutcome;
use crate::task::executor::ActionCompletion;
use crate::task::run_state::RunState;

pub const NAVIGATION_KEY: &str = "navigation:redirect";

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("submission rejected: screen is {status}")]
pub struct SubmitRejected {
    pub status: SubmissionStatus,
}

pub struct SubmissionController {
    config: ScreenConfig,
    rules: RuleTable,
    form: FormState,
    errors: ErrorState,
    status: SubmissionStatus,
    notice: Option<Notice>,
    runs: RunState,
}

impl SubmissionController {
    pub fn new(config: ScreenConfig) -> Self {
        let rules = config.rules();
        let form = config.initial_form();
        Self {
            config,
            rules,
            form,
            errors: ErrorState::new(),
            status: SubmissionStatus::Idle,
            notice: None,
            runs: RunState::default(),
        }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn errors(&self) -> &ErrorState {
        &self.errors
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.runs.in_flight()
    }

    /// Live, field-scoped check for the presentation layer. Does not touch ErrorState.
    pub fn check_field(&self, id: &str) -> Option<String> {
        rules::validate_field(&self.form, &self.rules, id)
    }

    /// Back to the initial values, as when the screen is entered again.
    pub fn reset(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::Schedule(SchedulerCommand::Cancel {
            key: NAVIGATION_KEY.to_string(),
        })];
        self.runs.abandon();
        self.form = self.config.initial_form();
        self.errors.clear();
        self.notice = None;
        self.transition(SubmissionStatus::Idle, &mut effects);
        effects
    }

    pub fn set_field(
        &mut self,
        id: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<Effect>, FormError> {
        self.form.set(id, value)?;
        self.errors.clear_error(id);
        self.notice = None;

        let mut effects = Vec::new();
        if self.status == SubmissionStatus::Failed {
            self.transition(SubmissionStatus::Idle, &mut effects);
        }
        Ok(effects)
    }

    pub fn submit(&mut self) -> Result<Vec<Effect>, SubmitRejected> {
        if self.status.is_busy() {
            tracing::debug!(status = %self.status, "ignoring submit while busy");
            return Err(SubmitRejected {
                status: self.status,
            });
        }

        let mut effects = Vec::new();
        self.transition(SubmissionStatus::Validating, &mut effects);

        let errors = rules::validate_form(&self.form, &self.rules);
        if let Some(first) = errors.first_invalid_field().map(FieldId::from) {
            tracing::debug!(fields = errors.len(), %first, "validation failed");
            self.errors = errors;
            self.notice = self.config.invalid_message.clone().map(Notice::error);
            self.transition(SubmissionStatus::Failed, &mut effects);
            effects.push(Effect::FocusField(first));
            return Ok(effects);
        }

        self.errors.clear();
        self.notice = None;
        let run_id = self.runs.next_run_id();
        self.runs.on_started(run_id);
        self.transition(SubmissionStatus::Pending, &mut effects);
        tracing::info!(run_id, "submitting form");
        effects.push(Effect::RunAction {
            run_id,
            form: self.form.clone(),
        });
        Ok(effects)
    }

    pub fn complete(&mut self, completion: ActionCompletion) -> Vec<Effect> {
        let ActionCompletion { run_id, outcome } = completion;
        if self.status != SubmissionStatus::Pending || !self.runs.on_finished(run_id) {
            tracing::debug!(run_id, status = %self.status, "dropping stale completion");
            return Vec::new();
        }

        let mut effects = Vec::new();
        match outcome {
            ActionOutcome::Succeeded { message } => {
                tracing::info!(run_id, reply = message.as_deref().unwrap_or(""), "action succeeded");
                self.errors.clear();
                self.notice = Some(Notice::success(self.config.success_message.clone()));
                self.transition(SubmissionStatus::Succeeded, &mut effects);
                effects.push(Effect::Schedule(SchedulerCommand::EmitAfter {
                    key: NAVIGATION_KEY.to_string(),
                    delay: self.config.redirect_delay(),
                    event: ScreenEvent::Navigate(self.config.destination),
                }));
            }
            ActionOutcome::Failed { message } => {
                tracing::warn!(run_id, %message, "action failed");
                self.notice = self.config.failure_notice(&message).map(Notice::error);
                self.errors.set_general(message);
                self.transition(SubmissionStatus::Failed, &mut effects);
            }
        }
        effects
    }

    /// Called once the redirect has been attempted. A failed redirect surfaces
    /// a general message and asks for one fallback navigation.
    pub fn navigation_finished(
        &mut self,
        route: Route,
        result: Result<(), NavigationError>,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        match result {
            Ok(()) => {
                self.notice = None;
            }
            Err(err) => {
                tracing::warn!(%err, "redirect failed");
                let message = self.config.redirect_error_message.clone();
                self.errors.set_general(message.clone());
                self.notice = Some(Notice::error(message));
                if route != Route::FALLBACK {
                    effects.push(Effect::Navigate(Route::FALLBACK));
                }
            }
        }
        self.transition(SubmissionStatus::Idle, &mut effects);
        effects
    }

    /// Forget any in-flight run; used on teardown.
    pub fn abandon(&mut self) {
        self.runs.abandon();
    }

    fn transition(&mut self, next: SubmissionStatus, effects: &mut Vec<Effect>) {
        if self.status == next {
            return;
        }
        tracing::debug!(from = %self.status, to = %next, "status");
        self.status = next;
        effects.push(Effect::StatusChanged(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::ScreenKind;

    fn statuses(effects: &[Effect]) -> Vec<SubmissionStatus> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::StatusChanged(status) => Some(*status),
                _ => None,
            })
            .collect()
    }

    fn run_id(effects: &[Effect]) -> u64 {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::RunAction { run_id, .. } => Some(*run_id),
                _ => None,
            })
            .expect("run action effect")
    }

    fn filled_login() -> SubmissionController {
        let mut controller = SubmissionController::new(ScreenKind::Login.config());
        controller.set_field("email", "john.doe@gmail.com").expect("email");
        controller.set_field("password", "password123").expect("password");
        controller
    }

    #[test]
    fn invalid_form_fails_without_running_the_action() {
        let mut controller = SubmissionController::new(ScreenKind::Login.config());
        controller.set_field("email", "john.doe@gmail.com").expect("email");
        controller.set_field("password", "short").expect("password");

        let effects = controller.submit().expect("accepted");
        assert_eq!(
            statuses(&effects),
            vec![SubmissionStatus::Validating, SubmissionStatus::Failed]
        );
        assert!(!effects.iter().any(|e| matches!(e, Effect::RunAction { .. })));
        assert!(effects.contains(&Effect::FocusField("password".to_string())));
        assert_eq!(
            controller.errors().error("password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn success_runs_once_then_schedules_a_single_redirect() {
        let mut controller = filled_login();
        let mut effects = controller.submit().expect("accepted");
        let id = run_id(&effects);
        assert_eq!(controller.status(), SubmissionStatus::Pending);

        let done = controller.complete(ActionCompletion {
            run_id: id,
            outcome: ActionOutcome::Succeeded { message: None },
        });
        let redirects: Vec<&Effect> = done
            .iter()
            .filter(|e| matches!(e, Effect::Schedule(SchedulerCommand::EmitAfter { .. })))
            .collect();
        assert_eq!(
            redirects,
            vec![&Effect::Schedule(SchedulerCommand::EmitAfter {
                key: NAVIGATION_KEY.to_string(),
                delay: std::time::Duration::from_millis(1000),
                event: ScreenEvent::Navigate(Route::PostAuthLanding),
            })]
        );
        assert_eq!(
            controller.notice().map(|n| n.text.as_str()),
            Some("Login successful! Redirecting...")
        );
        effects.extend(done);
        effects.extend(controller.navigation_finished(Route::PostAuthLanding, Ok(())));

        assert_eq!(
            statuses(&effects),
            vec![
                SubmissionStatus::Validating,
                SubmissionStatus::Pending,
                SubmissionStatus::Succeeded,
                SubmissionStatus::Idle,
            ]
        );
    }

    #[test]
    fn second_submit_while_pending_is_rejected() {
        let mut controller = filled_login();
        controller.submit().expect("first submit");
        assert_eq!(
            controller.submit(),
            Err(SubmitRejected {
                status: SubmissionStatus::Pending
            })
        );
    }

    #[test]
    fn failure_sets_general_and_stays_failed_until_edit() {
        let mut controller = filled_login();
        let id = run_id(&controller.submit().expect("accepted"));
        let effects = controller.complete(ActionCompletion {
            run_id: id,
            outcome: ActionOutcome::failed("Invalid email or password"),
        });

        assert_eq!(statuses(&effects), vec![SubmissionStatus::Failed]);
        assert!(!effects.iter().any(|e| matches!(e, Effect::Schedule(_))));
        assert_eq!(controller.errors().general(), Some("Invalid email or password"));
        assert_eq!(
            controller.notice().map(|n| n.text.as_str()),
            Some("Login failed. Please check your credentials and try again.")
        );

        let edit = controller.set_field("password", "password124").expect("edit");
        assert_eq!(statuses(&edit), vec![SubmissionStatus::Idle]);
        assert!(controller.notice().is_none());
    }

    #[test]
    fn editing_a_field_clears_only_its_error() {
        let mut controller = SubmissionController::new(ScreenKind::Login.config());
        controller.submit().expect("accepted");
        assert_eq!(controller.errors().len(), 2);

        controller.set_field("email", "x").expect("edit");
        assert_eq!(controller.errors().error("email"), None);
        assert_eq!(controller.errors().error("password"), Some("Password is required"));
        assert_eq!(controller.check_field("email").as_deref(), Some("Invalid email format"));
    }

    #[test]
    fn stale_completion_is_ignored() {
        let mut controller = filled_login();
        let id = run_id(&controller.submit().expect("accepted"));
        let effects = controller.complete(ActionCompletion {
            run_id: id + 1,
            outcome: ActionOutcome::Succeeded { message: None },
        });
        assert!(effects.is_empty());
        assert_eq!(controller.status(), SubmissionStatus::Pending);

        controller.abandon();
        assert!(controller
            .complete(ActionCompletion {
                run_id: id,
                outcome: ActionOutcome::Succeeded { message: None },
            })
            .is_empty());
    }

    #[test]
    fn failed_redirect_falls_back_to_login() {
        let mut controller = SubmissionController::new(ScreenKind::Forgot.config());
        controller.set_field("email", "john.doe@gmail.com").expect("email");
        let id = run_id(&controller.submit().expect("accepted"));
        controller.complete(ActionCompletion {
            run_id: id,
            outcome: ActionOutcome::Succeeded { message: None },
        });

        let effects = controller.navigation_finished(
            Route::Verify,
            Err(NavigationError::new(Route::Verify, "route missing")),
        );
        assert!(effects.contains(&Effect::Navigate(Route::Login)));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert_eq!(
            controller.errors().general(),
            Some("Error redirecting to verification page. Redirecting to login...")
        );
    }

    #[test]
    fn failed_redirect_to_fallback_asks_for_no_second_navigation() {
        let mut controller = SubmissionController::new(ScreenKind::Signup.config());
        let effects = controller.navigation_finished(
            Route::Login,
            Err(NavigationError::new(Route::Login, "route missing")),
        );
        assert!(!effects.iter().any(|e| matches!(e, Effect::Navigate(_))));
        assert_eq!(
            controller.errors().general(),
            Some("Error redirecting. Please try again.")
        );
        assert_eq!(controller.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn reset_restores_initial_values_and_cancels_redirect() {
        let mut controller = filled_login();
        controller.submit().expect("accepted");
        let effects = controller.reset();

        assert!(effects.contains(&Effect::Schedule(SchedulerCommand::Cancel {
            key: NAVIGATION_KEY.to_string(),
        })));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert_eq!(controller.form(), &ScreenKind::Login.config().initial_form());
        assert_eq!(controller.in_flight(), None);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let mut controller = SubmissionController::new(ScreenKind::Verify.config());
        assert_eq!(
            controller.set_field("email", "a@b.c"),
            Err(FormError::UnknownField("email".to_string()))
        );
    }

    #[test]
    fn terms_toggle_only_accepts_a_bool() {
        let mut controller = SubmissionController::new(ScreenKind::Signup.config());
        for (id, value) in [
            ("firstName", "John"),
            ("lastName", "Doe"),
            ("email", "john.doe@gmail.com"),
            ("countryCode", "1"),
            ("phone", "5551234567"),
            ("password", "password123"),
            ("confirmPassword", "password123"),
        ] {
            controller.set_field(id, value).expect(id);
        }
        assert_eq!(
            controller.set_field("agreeTerms", "false"),
            Err(FormError::KindMismatch("agreeTerms".to_string()))
        );

        let effects = controller.submit().expect("accepted");
        assert!(!effects.iter().any(|e| matches!(e, Effect::RunAction { .. })));
        assert_eq!(controller.status(), SubmissionStatus::Failed);
        assert_eq!(
            controller.errors().error("agreeTerms"),
            Some("You must agree to the terms")
        );

        controller.set_field("agreeTerms", true).expect("toggle");
        assert_eq!(
            statuses(&controller.submit().expect("accepted")),
            vec![SubmissionStatus::Validating, SubmissionStatus::Pending]
        );
    }
}
