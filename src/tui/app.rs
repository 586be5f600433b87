use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::{Frame, Terminal};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::autosave::{AutosaveClient, StatusLine};
use crate::cli::Config;
use crate::remote::{ApplicationEndpoint, RemoteError};

use super::action::Action;
use super::error::AppError;
use super::screens::application::{ApplicationForm, draw_application};
use super::screens::help::{HelpState, draw_help};
use super::validator::{Verdict, validate};
use super::widgets::{StatusBarContext, draw_alert, draw_status_bar};

/// How long the event loop waits for input before redrawing.
const TICK: Duration = Duration::from_millis(50);

const SUBMITTING: &str = "Submitting...";

/// Top-level application state.
pub struct App {
    form: ApplicationForm,
    autosave: AutosaveClient,
    status: StatusLine,
    endpoint: Arc<dyn ApplicationEndpoint>,
    runtime: Handle,
    help: HelpState,
    show_help: bool,
    alert: Option<String>,
    submission: Option<oneshot::Receiver<Result<(), RemoteError>>>,
    submitted: bool,
    should_quit: bool,
}

impl App {
    /// Creates an `App` around `form`, talking to `endpoint` from tasks on `runtime`.
    pub fn new(
        form: ApplicationForm,
        endpoint: Arc<dyn ApplicationEndpoint>,
        config: &Config,
        runtime: Handle,
    ) -> Self {
        let autosave = AutosaveClient::new(
            Arc::clone(&endpoint),
            config.autosave_delay,
            runtime.clone(),
        );
        Self {
            form,
            autosave,
            status: StatusLine::new(config.status_duration),
            endpoint,
            runtime,
            help: HelpState::new(),
            show_help: false,
            alert: None,
            submission: None,
            submitted: false,
            should_quit: false,
        }
    }

    /// Main event loop: apply background results → draw → poll for a key → dispatch.
    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    pub fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        while !self.should_quit {
            self.tick(Instant::now());
            if self.should_quit {
                break;
            }
            terminal.draw(|frame| self.draw(frame))?;
            if event::poll(TICK)?
                && let Event::Key(key) = event::read()?
            {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    #[cfg_attr(coverage_nightly, coverage(off))]
    #[mutants::skip]
    fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let [main, bar] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        draw_application(&self.form, frame, main);
        let ctx = StatusBarContext {
            steps: self.form.step_titles(),
            progress: *self.form.steps(),
            status: self.status_text(),
        };
        draw_status_bar(&ctx, frame, bar);

        if self.show_help {
            let [row] = Layout::vertical([Constraint::Percentage(80)])
                .flex(Flex::Center)
                .areas(main);
            let [popup] = Layout::horizontal([Constraint::Percentage(80)])
                .flex(Flex::Center)
                .areas(row);
            draw_help(&self.help, frame, popup);
        }
        if let Some(message) = &self.alert {
            draw_alert(message, frame, main);
        }
    }

    /// Handles a key event: an open alert or help overlay first, then the form.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.alert.is_some() || self.submission.is_some() {
            if is_quit(&key) {
                self.should_quit = true;
                return;
            }
            if self.alert.is_some() && matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return;
        }

        let action = if self.show_help {
            self.help.handle_key(key)
        } else {
            self.form.handle_key(key)
        };
        self.apply(action);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Edited => self.autosave.schedule(self.form.form_data()),
            Action::Alert(message) => self.alert = Some(message),
            Action::Submit => self.submit(),
            Action::ToggleHelp => {
                self.show_help = !self.show_help;
                self.help.reset();
            }
            Action::Quit => self.should_quit = true,
        }
    }

    /// Runs the validator and, if it passes, sends the cleaned form in the background.
    fn submit(&mut self) {
        match validate(&mut self.form) {
            Verdict::Blocked(alert) => {
                if let Some(message) = alert {
                    self.alert = Some(message.to_string());
                }
            }
            Verdict::Proceed => {
                let data = self.form.form_data().cleaned();
                let endpoint = Arc::clone(&self.endpoint);
                let (tx, rx) = oneshot::channel();
                tracing::info!(fields = data.entries().len(), "submitting application");
                self.runtime.spawn(async move {
                    let _ = tx.send(endpoint.submit(data).await);
                });
                self.submission = Some(rx);
            }
        }
    }

    /// Applies background results: autosave events, status expiry, submission outcome.
    pub fn tick(&mut self, now: Instant) {
        for event in self.autosave.drain() {
            self.status.apply(event, now);
        }
        self.status.tick(now);

        let Some(rx) = self.submission.as_mut() else {
            return;
        };
        let outcome = match rx.try_recv() {
            Err(TryRecvError::Empty) => return,
            Ok(result) => result,
            Err(TryRecvError::Closed) => Err(RemoteError::Io(std::io::Error::other(
                "submission task ended without a result",
            ))),
        };
        self.submission = None;
        match outcome {
            Ok(()) => {
                tracing::info!("application submitted");
                self.submitted = true;
                self.should_quit = true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "submission failed");
                self.alert = Some(format!("Submission failed: {e}"));
            }
        }
    }

    /// Text for the right side of the status bar.
    pub fn status_text(&self) -> String {
        if self.submission.is_some() {
            SUBMITTING.to_string()
        } else {
            self.status.text()
        }
    }

    pub fn form(&self) -> &ApplicationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ApplicationForm {
        &mut self.form
    }

    /// Returns the open alert message, if any.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_help_visible(&self) -> bool {
        self.show_help
    }

    /// Returns `true` while a submission is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submission.is_some()
    }

    /// Returns `true` once the server accepted the application.
    pub fn submitted(&self) -> bool {
        self.submitted
    }

    /// Returns `true` if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;
    use crate::autosave::tests::{FakeEndpoint, Reply};
    use crate::tui::validator::tests::{complete, report};
    use crate::tui::validator::{MISSING_REQUIRED, OVER_WORD_LIMIT};

    const DELAY: Duration = Duration::from_secs(2);

    fn make_app(endpoint: &Arc<FakeEndpoint>, form: ApplicationForm) -> App {
        App::new(
            form,
            endpoint.clone(),
            &Config::default(),
            Handle::current(),
        )
    }

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn ctrl(ch: char) -> KeyEvent {
        key(KeyCode::Char(ch), KeyModifiers::CONTROL, KeyEventKind::Press)
    }

    /// Lets spawned tasks run without advancing the paused clock.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    mod keys {
        use super::*;

        #[tokio::test]
        async fn ctrl_q_quits() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(ctrl('q'));
            assert!(app.should_quit());
            assert!(!app.submitted());
        }

        #[tokio::test]
        async fn release_events_are_ignored() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(key(
                KeyCode::Char('q'),
                KeyModifiers::CONTROL,
                KeyEventKind::Release,
            ));
            assert!(!app.should_quit());
        }

        #[tokio::test]
        async fn f1_opens_help_and_esc_closes() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(press(KeyCode::F(1)));
            assert!(app.is_help_visible());
            app.handle_key(press(KeyCode::Char('x')));
            assert_eq!(app.form().field("student_name").unwrap().value, "");
            app.handle_key(press(KeyCode::Esc));
            assert!(!app.is_help_visible());
        }
    }

    mod alerts {
        use super::*;

        #[tokio::test]
        async fn blocked_submit_shows_alert() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(ctrl('s'));
            assert_eq!(app.alert(), Some(MISSING_REQUIRED));
            assert!(!app.is_submitting());
        }

        #[tokio::test]
        async fn alert_swallows_keys_until_dismissed() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(ctrl('s'));
            app.handle_key(press(KeyCode::Char('x')));
            assert_eq!(app.form().field("student_name").unwrap().value, "");
            app.handle_key(press(KeyCode::Enter));
            assert!(app.alert().is_none());
            app.handle_key(press(KeyCode::Char('x')));
            assert_eq!(app.form().field("student_name").unwrap().value, "x");
        }

        #[tokio::test]
        async fn quit_chord_passes_through_alert() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(ctrl('s'));
            assert!(app.alert().is_some());
            app.handle_key(ctrl('q'));
            assert!(app.should_quit());
        }

        #[tokio::test]
        async fn activity_cap_alert() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.form_mut().show_step(3);
            for _ in 0..5 {
                app.handle_key(ctrl('a'));
            }
            assert_eq!(app.alert(), Some("You can only add up to 5 activities."));
            assert_eq!(app.form().activities().unwrap().len(), 5);
        }

        #[tokio::test]
        async fn silent_abort_off_last_step() {
            let file = report();
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, complete(&file));
            app.form_mut().show_step(1);
            app.handle_key(ctrl('s'));
            assert!(app.alert().is_none());
            assert!(!app.is_submitting());
        }
    }

    mod autosave {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn edits_are_saved_after_quiet_period() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            for ch in "Ada".chars() {
                app.handle_key(press(KeyCode::Char(ch)));
            }
            tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
            settle().await;

            let saved = endpoint.saved.lock().unwrap();
            assert_eq!(saved.len(), 1);
            assert_eq!(saved[0].get("student_name"), Some("Ada"));
        }

        #[tokio::test(start_paused = true)]
        async fn navigation_does_not_autosave() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(press(KeyCode::Tab));
            app.handle_key(press(KeyCode::PageDown));
            tokio::time::sleep(DELAY * 2).await;
            settle().await;
            assert!(endpoint.saved.lock().unwrap().is_empty());
        }

        #[tokio::test(start_paused = true)]
        async fn activity_edits_are_saved() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.form_mut().show_step(3);
            app.handle_key(ctrl('a'));
            app.handle_key(press(KeyCode::Char('Z')));
            tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
            settle().await;

            let saved = endpoint.saved.lock().unwrap();
            assert_eq!(saved.len(), 1);
            assert_eq!(saved[0].get_all("activity_type[]"), vec!["", "Z"]);
        }

        #[tokio::test(start_paused = true)]
        async fn status_shows_save_then_clears() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(press(KeyCode::Char('A')));
            tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
            settle().await;

            let now = Instant::now();
            app.tick(now);
            assert!(app.status_text().starts_with("Last saved at "));
            app.tick(now + Duration::from_secs(5));
            assert_eq!(app.status_text(), "");
        }

        #[tokio::test(start_paused = true)]
        async fn rejected_save_reported() {
            let endpoint = FakeEndpoint::new(Reply::Rejected);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(press(KeyCode::Char('A')));
            tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
            settle().await;
            app.tick(Instant::now());
            assert_eq!(app.status_text(), "Unable to save draft.");
        }

        #[tokio::test(start_paused = true)]
        async fn offline_save_reported() {
            let endpoint = FakeEndpoint::new(Reply::Offline);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(press(KeyCode::Char('A')));
            let before = app.form().form_data();
            tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
            settle().await;

            let now = Instant::now();
            app.tick(now);
            assert_eq!(
                app.status_text(),
                "Network error. Changes may not be saved."
            );
            assert_eq!(app.form().form_data(), before);
            assert_eq!(before.get("student_name"), Some("A"));

            app.tick(now + Duration::from_secs(5));
            assert_eq!(app.status_text(), "");
            assert_eq!(app.form().form_data(), before);
        }
    }

    mod submission {
        use super::*;

        #[tokio::test]
        async fn valid_form_is_sent_cleaned_and_app_quits() {
            let file = report();
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut form = complete(&file);
            form.set_field("student_name", "\u{a0} Ada Lovelace  ");
            let mut app = make_app(&endpoint, form);

            app.handle_key(ctrl('s'));
            assert!(app.is_submitting());
            assert_eq!(app.status_text(), "Submitting...");

            settle().await;
            app.tick(Instant::now());
            assert!(app.submitted());
            assert!(app.should_quit());

            let submitted = endpoint.submitted.lock().unwrap();
            assert_eq!(submitted.len(), 1);
            assert_eq!(submitted[0].get("student_name"), Some("Ada Lovelace"));
        }

        #[tokio::test]
        async fn failure_alerts_and_keeps_form() {
            let file = report();
            let endpoint = FakeEndpoint::new(Reply::Offline);
            let mut app = make_app(&endpoint, complete(&file));

            app.handle_key(ctrl('s'));
            settle().await;
            app.tick(Instant::now());

            assert!(!app.submitted());
            assert!(!app.should_quit());
            assert!(!app.is_submitting());
            let alert = app.alert().unwrap();
            assert!(alert.starts_with("Submission failed: "), "{alert}");
        }

        #[tokio::test]
        async fn keys_ignored_while_submitting() {
            let file = report();
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, complete(&file));
            app.handle_key(ctrl('s'));
            app.handle_key(ctrl('s'));
            app.handle_key(press(KeyCode::PageUp));
            assert_eq!(app.form().steps().current(), 5);
            settle().await;
            assert_eq!(endpoint.submitted.lock().unwrap().len(), 1);
        }

        #[tokio::test]
        async fn word_limit_blocks_submission() {
            let file = report();
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut form = complete(&file);
            form.set_field("essay3", vec!["w"; 151].join(" "));
            let mut app = make_app(&endpoint, form);
            app.handle_key(ctrl('s'));
            assert_eq!(app.alert(), Some(OVER_WORD_LIMIT));
            settle().await;
            assert!(endpoint.submitted.lock().unwrap().is_empty());
        }
    }

    mod rendering {
        use ratatui::backend::TestBackend;

        use super::*;

        fn render(app: &App) -> String {
            let backend = TestBackend::new(100, 40);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal.draw(|frame| app.draw(frame)).unwrap();
            let buf = terminal.backend().buffer();
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[tokio::test]
        async fn shows_progress_and_alert() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(ctrl('s'));
            let output = render(&app);
            assert!(output.contains("1. Student"));
            assert!(output.contains("6. Review"));
            assert!(output.contains("Alert"));
        }

        #[tokio::test]
        async fn shows_help_overlay() {
            let endpoint = FakeEndpoint::new(Reply::Ok);
            let mut app = make_app(&endpoint, ApplicationForm::new());
            app.handle_key(press(KeyCode::F(1)));
            assert!(render(&app).contains("Navigation"));
        }
    }
}
