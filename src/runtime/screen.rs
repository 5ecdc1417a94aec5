use crate::core::form::{FieldId, FormError};
use crate::core::value::Value;
use crate::runtime::controller::{NAVIGATION_KEY, SubmissionController, SubmitRejected};
use crate::runtime::effect::Effect;
use crate::runtime::event::ScreenEvent;
use crate::runtime::navigation::{NavigationGateway, Route};
use crate::runtime::scheduler::{Scheduler, SchedulerCommand};
use crate::screens::ScreenConfig;
use crate::state::carousel::Carousel;
use crate::state::status::SubmissionStatus;
use crate::state::view::{ScreenView, SlideView};
use crate::task::action::Action;
use crate::task::executor::{ActionCompletion, ActionExecutor, ActionInvocation};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

pub const CAROUSEL_KEY: &str = "carousel:advance";
const IDLE_POLL: Duration = Duration::from_millis(120);

type StatusListener = Box<dyn FnMut(SubmissionStatus) + Send>;

/// One mounted auth screen: the controller plus the timers, the running
/// action and the navigation gateway it drives.
///
/// Dropping the screen tears it down; nothing scheduled or in flight
/// touches it afterwards.
///
/// A screen must be driven inside a tokio runtime: a valid `submit` spawns
/// the action with `tokio::spawn`, which panics outside one.
pub struct Screen {
    controller: SubmissionController,
    scheduler: Scheduler,
    executor: ActionExecutor,
    action: Arc<dyn Action>,
    gateway: Box<dyn NavigationGateway>,
    carousel: Option<Carousel>,
    focus: Option<FieldId>,
    listeners: Vec<StatusListener>,
    torn_down: bool,
}

impl Screen {
    pub fn new(
        config: ScreenConfig,
        action: Arc<dyn Action>,
        gateway: Box<dyn NavigationGateway>,
    ) -> Self {
        let carousel = config.carousel.then(Carousel::default);
        let mut screen = Self {
            controller: SubmissionController::new(config),
            scheduler: Scheduler::new(),
            executor: ActionExecutor::new(),
            action,
            gateway,
            carousel: None,
            focus: None,
            listeners: Vec::new(),
            torn_down: false,
        };
        if let Some(carousel) = carousel {
            screen.install_carousel(carousel);
        }
        screen
    }

    pub fn on_status(mut self, listener: impl FnMut(SubmissionStatus) + Send + 'static) -> Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn controller(&self) -> &SubmissionController {
        &self.controller
    }

    pub fn status(&self) -> SubmissionStatus {
        self.controller.status()
    }

    pub fn carousel(&self) -> Option<&Carousel> {
        self.carousel.as_ref()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn set_field(&mut self, id: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let effects = self.controller.set_field(id, value)?;
        if self.focus.as_deref() == Some(id) {
            self.focus = None;
        }
        self.apply_effects(effects);
        Ok(())
    }

    pub fn check_field(&self, id: &str) -> Option<String> {
        self.controller.check_field(id)
    }

    /// # Panics
    /// Panics when the form is valid and no tokio runtime is running.
    pub fn submit(&mut self) -> Result<(), SubmitRejected> {
        if self.torn_down {
            return Err(SubmitRejected {
                status: self.controller.status(),
            });
        }
        let effects = self.controller.submit()?;
        self.apply_effects(effects);
        Ok(())
    }

    /// Enter the screen again: initial values, no pending redirect, first slide.
    pub fn reenter(&mut self) {
        if self.torn_down {
            return;
        }
        self.executor.abort_all();
        let effects = self.controller.reset();
        self.focus = None;
        self.apply_effects(effects);
        if let Some(mut carousel) = self.carousel.take() {
            carousel.go_to(0);
            self.install_carousel(carousel);
        }
    }

    pub fn next_slide(&mut self) {
        self.move_slide(|carousel| {
            carousel.next();
            true
        });
    }

    pub fn prev_slide(&mut self) {
        self.move_slide(|carousel| {
            carousel.prev();
            true
        });
    }

    /// Jump to a slide. Out-of-range indexes are ignored.
    pub fn show_slide(&mut self, index: usize) -> bool {
        self.move_slide(|carousel| carousel.go_to(index))
    }

    /// Applies whatever is ready right now without waiting. Returns true if
    /// anything was processed.
    pub fn pump(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let mut processed = false;

        for completion in self.executor.drain_ready() {
            processed = true;
            self.handle_completion(completion);
        }
        for event in self.scheduler.drain_ready(Instant::now()) {
            processed = true;
            self.handle_event(event);
        }

        processed
    }

    /// Waits for the next completion or timer, then applies it.
    pub async fn step(&mut self) {
        if self.torn_down {
            return;
        }
        let timeout = self.scheduler.poll_timeout(Instant::now(), IDLE_POLL);
        let completion = tokio::select! {
            completion = self.executor.next_completion() => completion,
            () = tokio::time::sleep(timeout) => None,
        };
        if let Some(completion) = completion {
            self.handle_completion(completion);
        }
        self.pump();
    }

    /// Drives the screen until no submission is pending and no redirect is scheduled.
    pub async fn run_until_settled(&mut self) {
        while !self.torn_down
            && (self.controller.status().is_busy() || self.scheduler.is_scheduled(NAVIGATION_KEY))
        {
            self.step().await;
        }
    }

    pub fn view(&self) -> ScreenView {
        let status = self.controller.status();
        ScreenView {
            status,
            values: self.controller.form().clone(),
            errors: self.controller.errors().clone(),
            focus: self.focus.clone(),
            notice: self.controller.notice().cloned(),
            slide: self.carousel.as_ref().and_then(SlideView::from_carousel),
            submit_enabled: !self.torn_down && !status.is_busy(),
        }
    }

    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.scheduler.clear();
        self.executor.abort_all();
        self.controller.abandon();
        tracing::debug!("screen torn down");
    }

    fn install_carousel(&mut self, carousel: Carousel) {
        self.carousel = Some(carousel);
        self.restart_slide_timer();
    }

    fn restart_slide_timer(&mut self) {
        self.scheduler.schedule(
            SchedulerCommand::Cancel {
                key: CAROUSEL_KEY.to_string(),
            },
            Instant::now(),
        );
        let Some(carousel) = self.carousel.as_ref() else {
            return;
        };
        let (rotates, interval) = (carousel.slides().len() > 1, carousel.interval());
        if rotates && !self.torn_down {
            self.schedule_slide_advance(interval);
        }
    }

    fn schedule_slide_advance(&mut self, interval: Duration) {
        self.scheduler.schedule(
            SchedulerCommand::EmitAfter {
                key: CAROUSEL_KEY.to_string(),
                delay: interval,
                event: ScreenEvent::AdvanceSlide,
            },
            Instant::now(),
        );
    }

    /// Manual moves restart the auto-advance countdown.
    fn move_slide(&mut self, apply: impl FnOnce(&mut Carousel) -> bool) -> bool {
        let Some(carousel) = self.carousel.as_mut() else {
            return false;
        };
        if !apply(carousel) {
            return false;
        }
        self.restart_slide_timer();
        true
    }

    fn handle_completion(&mut self, completion: ActionCompletion) {
        let effects = self.controller.complete(completion);
        self.apply_effects(effects);
    }

    fn handle_event(&mut self, event: ScreenEvent) {
        match event {
            ScreenEvent::Navigate(route) => {
                let result = self.gateway.go_to(route);
                let effects = self.controller.navigation_finished(route, result);
                self.apply_effects(effects);
            }
            ScreenEvent::AdvanceSlide => {
                if let Some(carousel) = self.carousel.as_mut() {
                    carousel.next();
                    let interval = carousel.interval();
                    self.schedule_slide_advance(interval);
                }
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StatusChanged(status) => {
                    for listener in &mut self.listeners {
                        listener(status);
                    }
                }
                Effect::FocusField(id) => {
                    self.focus = Some(id);
                }
                Effect::RunAction { run_id, form } => {
                    self.executor
                        .spawn(Arc::clone(&self.action), ActionInvocation { run_id, form });
                }
                Effect::Schedule(command) => {
                    self.scheduler.schedule(command, Instant::now());
                }
                Effect::Navigate(route) => self.fallback_navigate(route),
            }
        }
    }

    fn fallback_navigate(&mut self, route: Route) {
        if let Err(err) = self.gateway.go_to(route) {
            tracing::error!(%err, "fallback navigation failed");
        }
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::navigation::NavigationError;
    use crate::screens::ScreenKind;
    use crate::task::action::{ActionError, ActionReply, FnAction, action_fn};
    use crate::task::mock::{DEMO_EMAIL, DEMO_PASSWORD, MOCK_LATENCY, MockBackend};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct RecordingGateway {
        visits: Arc<Mutex<Vec<(Route, Instant)>>>,
        fail: Vec<Route>,
    }

    impl RecordingGateway {
        fn failing_on(routes: &[Route]) -> Self {
            Self {
                fail: routes.to_vec(),
                ..Self::default()
            }
        }

        fn routes(&self) -> Vec<Route> {
            self.visits
                .lock()
                .expect("visits")
                .iter()
                .map(|(route, _)| *route)
                .collect()
        }
    }

    impl NavigationGateway for RecordingGateway {
        fn go_to(&mut self, route: Route) -> Result<(), NavigationError> {
            self.visits
                .lock()
                .expect("visits")
                .push((route, Instant::now()));
            if self.fail.contains(&route) {
                return Err(NavigationError::new(route, "unmounted"));
            }
            Ok(())
        }
    }

    fn login_screen(gateway: &RecordingGateway) -> Screen {
        Screen::new(
            ScreenKind::Login.config(),
            Arc::new(MockBackend::new(ScreenKind::Login)),
            Box::new(gateway.clone()),
        )
    }

    fn fill_login(screen: &mut Screen, password: &str) {
        screen.set_field("email", DEMO_EMAIL).expect("email");
        screen.set_field("password", password).expect("password");
    }

    #[tokio::test(start_paused = true)]
    async fn successful_login_redirects_once_after_the_delay() {
        let gateway = RecordingGateway::default();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut screen =
            login_screen(&gateway).on_status(move |status| sink.lock().expect("seen").push(status));
        fill_login(&mut screen, DEMO_PASSWORD);

        let start = Instant::now();
        screen.submit().expect("submit");
        assert!(!screen.view().submit_enabled);
        screen.run_until_settled().await;

        let visits = gateway.visits.lock().expect("visits").clone();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0].0, Route::PostAuthLanding);
        assert!(visits[0].1 >= start + MOCK_LATENCY + Duration::from_millis(1000));
        assert_eq!(
            *seen.lock().expect("seen"),
            vec![
                SubmissionStatus::Validating,
                SubmissionStatus::Pending,
                SubmissionStatus::Succeeded,
                SubmissionStatus::Idle,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_login_never_navigates() {
        let gateway = RecordingGateway::default();
        let mut screen = login_screen(&gateway);
        fill_login(&mut screen, "password124");

        screen.submit().expect("submit");
        screen.run_until_settled().await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        screen.pump();

        assert!(gateway.routes().is_empty());
        let view = screen.view();
        assert_eq!(view.status, SubmissionStatus::Failed);
        assert_eq!(view.errors.general(), Some("Invalid email or password"));
        assert!(view.submit_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_form_focuses_first_bad_field() {
        let gateway = RecordingGateway::default();
        let mut screen = login_screen(&gateway);
        screen.set_field("email", "not-an-email").expect("email");

        screen.submit().expect("submit");
        let view = screen.view();
        assert_eq!(view.status, SubmissionStatus::Failed);
        assert_eq!(view.focus.as_deref(), Some("email"));

        screen.set_field("email", DEMO_EMAIL).expect("email");
        assert_eq!(screen.view().focus, None);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_while_busy_does_not_start_a_second_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let action: FnAction<_> = action_fn(move |_form| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(ActionReply::ok("ok"))
            }
        });
        let gateway = RecordingGateway::default();
        let mut screen = Screen::new(
            ScreenKind::Verify.config(),
            Arc::new(action),
            Box::new(gateway.clone()),
        );
        screen.set_field("code", "123456").expect("code");

        screen.submit().expect("first submit");
        assert!(screen.submit().is_err());
        screen.run_until_settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(screen.submit().is_ok());
        screen.run_until_settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(gateway.routes(), vec![Route::Reset, Route::Reset]);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_pending_redirect() {
        let gateway = RecordingGateway::default();
        let mut screen = login_screen(&gateway);
        fill_login(&mut screen, DEMO_PASSWORD);
        screen.submit().expect("submit");

        while screen.status() != SubmissionStatus::Succeeded {
            screen.step().await;
        }
        screen.teardown();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!screen.pump());

        assert!(gateway.routes().is_empty());
        assert!(screen.submit().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_during_pending_ignores_the_late_result() {
        let gateway = RecordingGateway::default();
        let mut screen = login_screen(&gateway);
        fill_login(&mut screen, DEMO_PASSWORD);
        screen.submit().expect("submit");
        screen.teardown();

        tokio::time::sleep(MOCK_LATENCY * 4).await;
        screen.pump();
        assert_eq!(screen.status(), SubmissionStatus::Pending);
        assert!(gateway.routes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_redirect_falls_back_to_login() {
        let gateway = RecordingGateway::failing_on(&[Route::Verify]);
        let mut screen = Screen::new(
            ScreenKind::Forgot.config(),
            Arc::new(MockBackend::new(ScreenKind::Forgot)),
            Box::new(gateway.clone()),
        );
        screen.set_field("email", DEMO_EMAIL).expect("email");
        screen.submit().expect("submit");
        screen.run_until_settled().await;

        assert_eq!(gateway.routes(), vec![Route::Verify, Route::Login]);
        assert_eq!(
            screen.view().errors.general(),
            Some("Error redirecting to verification page. Redirecting to login...")
        );
        assert_eq!(screen.status(), SubmissionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_fallback_is_only_logged() {
        let gateway = RecordingGateway::failing_on(&[Route::Verify, Route::Login]);
        let mut screen = Screen::new(
            ScreenKind::Forgot.config(),
            Arc::new(MockBackend::new(ScreenKind::Forgot)),
            Box::new(gateway.clone()),
        );
        screen.set_field("email", DEMO_EMAIL).expect("email");
        screen.submit().expect("submit");
        screen.run_until_settled().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        screen.pump();

        assert_eq!(gateway.routes(), vec![Route::Verify, Route::Login]);
        let view = screen.view();
        assert_eq!(
            view.errors.general(),
            Some("Error redirecting to verification page. Redirecting to login...")
        );
        assert_eq!(view.status, SubmissionStatus::Idle);
        assert!(view.submit_enabled);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_redirect_to_login_is_not_retried() {
        let gateway = RecordingGateway::failing_on(&[Route::Login]);
        let mut screen = Screen::new(
            ScreenKind::Reset.config(),
            Arc::new(MockBackend::new(ScreenKind::Reset)),
            Box::new(gateway.clone()),
        );
        screen.set_field("password", "newpassword").expect("password");
        screen.set_field("confirmPassword", "newpassword").expect("confirm");
        screen.submit().expect("submit");
        screen.run_until_settled().await;
        tokio::time::sleep(Duration::from_secs(5)).await;
        screen.pump();

        assert_eq!(gateway.routes(), vec![Route::Login]);
        assert_eq!(
            screen.view().errors.general(),
            Some("Error redirecting. Please try again.")
        );
        assert_eq!(screen.status(), SubmissionStatus::Idle);
    }

    #[test]
    #[should_panic(expected = "runtime")]
    fn valid_submit_needs_a_tokio_runtime() {
        let mut screen = Screen::new(
            ScreenKind::Verify.config(),
            Arc::new(MockBackend::new(ScreenKind::Verify)),
            Box::new(RecordingGateway::default()),
        );
        screen.set_field("code", "123456").expect("code");
        let _ = screen.submit();
    }

    #[tokio::test(start_paused = true)]
    async fn crashed_action_is_reported_as_failure() {
        let action = action_fn(|_form| async { Err::<ActionReply, _>(ActionError::Crashed) });
        let gateway = RecordingGateway::default();
        let mut screen = Screen::new(
            ScreenKind::Reset.config(),
            Arc::new(action),
            Box::new(gateway.clone()),
        );
        screen.set_field("password", "newpassword").expect("password");
        screen.set_field("confirmPassword", "newpassword").expect("confirm");
        screen.submit().expect("submit");
        screen.run_until_settled().await;

        let view = screen.view();
        assert_eq!(view.status, SubmissionStatus::Failed);
        assert_eq!(
            view.notice.map(|notice| notice.text),
            Some("Password reset failed. Please try again.".to_string())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn carousel_advances_on_its_interval() {
        let gateway = RecordingGateway::default();
        let mut screen = login_screen(&gateway);
        assert_eq!(screen.view().slide.map(|slide| slide.index), Some(0));

        tokio::time::sleep(Duration::from_millis(5000)).await;
        screen.pump();
        assert_eq!(screen.carousel().map(Carousel::active), Some(1));

        assert!(!screen.show_slide(7));
        assert!(screen.show_slide(0));
        tokio::time::sleep(Duration::from_millis(4999)).await;
        screen.pump();
        assert_eq!(screen.carousel().map(Carousel::active), Some(0));
        tokio::time::sleep(Duration::from_millis(1)).await;
        screen.pump();
        assert_eq!(screen.carousel().map(Carousel::active), Some(1));

        screen.teardown();
        tokio::time::sleep(Duration::from_millis(20_000)).await;
        screen.pump();
        assert_eq!(screen.carousel().map(Carousel::active), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn reenter_restores_initial_state() {
        let gateway = RecordingGateway::default();
        let mut screen = login_screen(&gateway);
        fill_login(&mut screen, DEMO_PASSWORD);
        screen.next_slide();
        screen.submit().expect("submit");

        screen.reenter();
        tokio::time::sleep(Duration::from_secs(3)).await;
        screen.pump();

        let view = screen.view();
        assert_eq!(view.status, SubmissionStatus::Idle);
        assert_eq!(view.values.text("email"), Some(""));
        assert_eq!(view.slide.map(|slide| slide.index), Some(0));
        assert!(gateway.routes().is_empty());
    }
}
