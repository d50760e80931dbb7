use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::config::Config;
use crate::session::IntakeSession;
use crate::steps::Step;
use crate::submission::{SubmissionOutcome, Submitter};
use crate::ui::chat::render_transcript;
use crate::ui::terminal_guard::{install_panic_hook, TerminalGuard};
use crate::ui::wizard::WizardForm;

/// Progress from a background submission
#[derive(Debug)]
pub enum SubmitEvent {
    Progress(String),
    Finished(SubmissionOutcome),
}

pub struct App {
    config: Config,
    session: IntakeSession,
    wizard: WizardForm,
    submitter: Arc<Submitter>,
    submit_rx: Option<UnboundedReceiver<SubmitEvent>>,
    error: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let submitter = Submitter::from_config(&config)?;
        tracing::info!(
            webhook = %config.webhook.resolved_url(),
            max_retries = config.submission.max_retries,
            "Intake wizard starting"
        );
        Ok(Self::with_submitter(config, Arc::new(submitter)))
    }

    pub fn with_submitter(config: Config, submitter: Arc<Submitter>) -> Self {
        Self {
            config,
            session: IntakeSession::new(),
            wizard: WizardForm::new(),
            submitter,
            submit_rx: None,
            error: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &IntakeSession {
        &self.session
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        install_panic_hook();
        let mut guard = TerminalGuard::new()?;
        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            self.drain_submission_events();
            guard.terminal().draw(|f| self.draw(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(frame.area());

        let visible = self.session.visible_messages();
        render_transcript(frame, chunks[0], &visible, self.session.is_processing());
        self.wizard
            .render(frame, chunks[1], &self.session, self.error.as_deref());
    }

    /// Apply any messages or outcome sent by the submission task
    pub fn drain_submission_events(&mut self) {
        let Some(rx) = self.submit_rx.as_mut() else {
            return;
        };
        let mut finished = false;
        while let Ok(event) = rx.try_recv() {
            match event {
                SubmitEvent::Progress(text) => self.session.record_progress(text),
                SubmitEvent::Finished(outcome) => {
                    self.session.finish_submission(outcome);
                    finished = true;
                }
            }
        }
        if finished {
            self.submit_rx = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.should_quit = true;
            return;
        }
        if self.session.is_processing() {
            return;
        }

        let step = self.session.current_step();
        if step == Step::Confirmation {
            self.handle_confirmation_key(key);
            return;
        }

        if key.code == KeyCode::Enter {
            self.advance(step);
        } else if self.wizard.handle_key(step, key) {
            self.error = None;
        }
    }

    fn advance(&mut self, step: Step) {
        let result = self
            .wizard
            .apply(step, &mut self.session)
            .and_then(|_| self.session.advance());
        match result {
            Ok(next) => {
                self.error = None;
                tracing::debug!(step = %next, "Moved to step");
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn handle_confirmation_key(&mut self, key: KeyEvent) {
        let outcome_ok = self.session.outcome().map(|o| o.is_success());
        match (key.code, outcome_ok) {
            (KeyCode::Char('n'), Some(_)) => {
                self.session.reset();
                self.wizard = WizardForm::new();
                self.error = None;
            }
            (KeyCode::Enter, None | Some(false)) => self.start_submission(),
            (KeyCode::Char('e'), None | Some(false)) => match self.session.edit_description() {
                Ok(_) => self.error = None,
                Err(e) => self.error = Some(e.to_string()),
            },
            _ => {}
        }
    }

    /// Hand the ticket to a background task so the screen keeps drawing
    /// while retries run
    fn start_submission(&mut self) {
        let form = match self.session.begin_submission() {
            Ok(form) => form,
            Err(e) => {
                self.error = Some(e.to_string());
                return;
            }
        };
        self.error = None;

        let (tx, rx) = mpsc::unbounded_channel();
        let submitter = Arc::clone(&self.submitter);
        tokio::spawn(async move {
            let progress = tx.clone();
            let outcome = submitter
                .submit_with(&form, |text| {
                    let _ = progress.send(SubmitEvent::Progress(text));
                })
                .await;
            let _ = tx.send(SubmitEvent::Finished(outcome));
        });
        self.submit_rx = Some(rx);
    }
}
