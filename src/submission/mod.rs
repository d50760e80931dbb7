//! Ticket submission with a bounded, fixed-delay retry.
//!
//! A [`Submitter`] assembles the ticket, posts it through a
//! [`WebhookSender`] and reports progress as assistant messages.

use anyhow::Result;
use backon::{ConstantBuilder, Retryable};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{Config, SubmissionConfig};
use crate::steps::Step;
use crate::templates::{MessageRenderer, PROCESSING};
use crate::types::{FormData, Ticket, Transcript};
use crate::webhook::{DeliveryError, HttpWebhookSender, WebhookResponse, WebhookSender};

/// How many extra attempts to make and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: usize,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&SubmissionConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &SubmissionConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            delay: config.retry_delay(),
        }
    }

    /// Retry immediately; for tests and dry runs
    pub fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            delay: Duration::ZERO,
        }
    }

    fn strategy(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_retries)
    }
}

/// Result of one submission, after all retries
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Submitted {
        ticket: Ticket,
        response: WebhookResponse,
        attempts: usize,
    },
    Failed {
        ticket: Ticket,
        error: DeliveryError,
        attempts: usize,
    },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted { .. })
    }

    pub fn ticket(&self) -> &Ticket {
        match self {
            SubmissionOutcome::Submitted { ticket, .. } | SubmissionOutcome::Failed { ticket, .. } => {
                ticket
            }
        }
    }

    /// Total attempts made, including the first
    pub fn attempts(&self) -> usize {
        match self {
            SubmissionOutcome::Submitted { attempts, .. }
            | SubmissionOutcome::Failed { attempts, .. } => *attempts,
        }
    }
}

/// Posts tickets and narrates progress
pub struct Submitter {
    sender: Arc<dyn WebhookSender>,
    policy: RetryPolicy,
    support_contact: String,
    renderer: MessageRenderer,
}

impl Submitter {
    pub fn new(
        sender: Arc<dyn WebhookSender>,
        policy: RetryPolicy,
        support_contact: impl Into<String>,
    ) -> Self {
        Self {
            sender,
            policy,
            support_contact: support_contact.into(),
            renderer: MessageRenderer::new(),
        }
    }

    /// HTTP submitter built from the loaded configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let sender = HttpWebhookSender::new(&config.webhook)?;
        Ok(Self::new(
            Arc::new(sender),
            RetryPolicy::from_config(&config.submission),
            config.support.contact_email.clone(),
        ))
    }

    /// Submit `form` and append progress messages to `transcript`
    pub async fn submit(&self, form: &FormData, transcript: &mut Transcript) -> SubmissionOutcome {
        self.submit_with(form, |text| {
            transcript.assistant(text, Step::Confirmation);
        })
        .await
    }

    /// Submit `form`, passing each progress message to `on_message` as it
    /// is produced: one processing notice, one notice per retry, then one
    /// success or failure message.
    pub async fn submit_with<F>(&self, form: &FormData, mut on_message: F) -> SubmissionOutcome
    where
        F: FnMut(String),
    {
        let ticket = Ticket::assemble(form, Utc::now());
        on_message(PROCESSING.to_string());

        let max = self.policy.max_retries;
        let mut retries = 0usize;
        let send = || self.sender.send(&ticket);

        let result = send
            .retry(self.policy.strategy())
            .notify(|err: &DeliveryError, dur: Duration| {
                retries += 1;
                warn!(
                    ticket_id = %ticket.ticket_id,
                    attempt = retries,
                    max_retries = max,
                    delay_ms = dur.as_millis() as u64,
                    error = %err,
                    "Retrying ticket submission"
                );
                on_message(self.retrying_message(retries, max));
            })
            .await;

        let attempts = retries + 1;
        match result {
            Ok(response) => {
                info!(
                    ticket_id = %ticket.ticket_id,
                    attempts,
                    category = %ticket.category,
                    escalated = ticket.needs_escalation,
                    "Ticket submitted"
                );
                on_message(self.success_message(&ticket));
                SubmissionOutcome::Submitted {
                    ticket,
                    response,
                    attempts,
                }
            }
            Err(error) => {
                warn!(
                    ticket_id = %ticket.ticket_id,
                    attempts,
                    service_failure = error.is_service_failure(),
                    error = %error,
                    "Ticket submission failed"
                );
                on_message(self.failure_message(&error));
                SubmissionOutcome::Failed {
                    ticket,
                    error,
                    attempts,
                }
            }
        }
    }

    fn retrying_message(&self, attempt: usize, max: usize) -> String {
        self.renderer.retrying(attempt, max).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to render retry message");
            format!("Retrying... (Attempt {attempt}/{max})")
        })
    }

    fn success_message(&self, ticket: &Ticket) -> String {
        self.renderer.submitted(ticket).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to render success message");
            format!("Ticket {} submitted.", ticket.ticket_id)
        })
    }

    fn failure_message(&self, error: &DeliveryError) -> String {
        let message = error.user_message();
        let rendered = if error.is_service_failure() {
            self.renderer
                .service_failure(&message, &self.support_contact)
        } else {
            self.renderer
                .exception_failure(&message, &self.support_contact)
        };
        rendered.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to render failure message");
            format!(
                "Ticket submission failed: {message}. Contact {}.",
                self.support_contact
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::RETRY_MARKER;
    use crate::types::{ClinicId, Message, Priority};
    use crate::webhook::MockWebhookSender;

    fn complete_form() -> FormData {
        let mut form = FormData::new();
        form.select_clinic(ClinicId::Central);
        form.select_department("ICU").unwrap();
        form.floor = "2".into();
        form.room = "210".into();
        form.phone = "5552223333".into();
        form.priority = Some(Priority::Medium);
        form.description = "The monitor at the nurse station flickers".into();
        form
    }

    fn submitter(mock: &MockWebhookSender, max_retries: usize) -> Submitter {
        Submitter::new(
            Arc::new(mock.clone()),
            RetryPolicy::immediate(max_retries),
            "help@example.org",
        )
    }

    fn retry_notices(transcript: &Transcript) -> Vec<&Message> {
        transcript
            .messages()
            .iter()
            .filter(|m| m.content.contains(RETRY_MARKER))
            .collect()
    }

    #[tokio::test]
    async fn test_success_first_try() {
        let mock = MockWebhookSender::new();
        let mut transcript = Transcript::default();

        let outcome = submitter(&mock, 2)
            .submit(&complete_form(), &mut transcript)
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 1);
        assert!(retry_notices(&transcript).is_empty());
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].content, PROCESSING);
        let last = transcript.last().unwrap();
        assert!(last.content.contains(&outcome.ticket().ticket_id));
        assert!(outcome.ticket().ticket_id.starts_with("CEN-"));
        assert_eq!(last.step, Step::Confirmation);
    }

    #[tokio::test]
    async fn test_exhausted_retries() {
        let mock = MockWebhookSender::failing_times(
            DeliveryError::Transport("connection refused".into()),
            3,
        );
        let mut transcript = Transcript::default();

        let outcome = submitter(&mock, 2)
            .submit(&complete_form(), &mut transcript)
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(mock.call_count(), 3);

        let notices = retry_notices(&transcript);
        assert_eq!(notices.len(), 2);
        assert!(notices[0].content.ends_with("(Attempt 1/2)"));
        assert!(notices[1].content.ends_with("(Attempt 2/2)"));

        // processing + 2 retries + 1 failure
        assert_eq!(transcript.len(), 4);
        let last = transcript.last().unwrap();
        assert!(last.content.starts_with("An unexpected error occurred"));
        assert!(last.content.contains("connection refused"));
        assert!(last.content.contains("help@example.org"));
    }

    #[tokio::test]
    async fn test_recovers_after_one_retry() {
        let mock = MockWebhookSender::new();
        mock.push_response(Err(DeliveryError::Transport("timeout".into())));

        let mut transcript = Transcript::default();
        let outcome = submitter(&mock, 2)
            .submit(&complete_form(), &mut transcript)
            .await;

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(retry_notices(&transcript).len(), 1);

        // every attempt posts the same ticket
        let sent = mock.sent_tickets();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn test_service_failure_message() {
        let rejected = DeliveryError::Rejected {
            message: "Workflow inactive".into(),
        };
        let mock = MockWebhookSender::failing_times(rejected.clone(), 1);
        let mut transcript = Transcript::default();

        let outcome = submitter(&mock, 0)
            .submit(&complete_form(), &mut transcript)
            .await;

        match outcome {
            SubmissionOutcome::Failed {
                error, attempts, ..
            } => {
                assert_eq!(error, rejected);
                assert_eq!(attempts, 1);
            }
            other => panic!("expected failure, got {other:?}"),
        }
        let last = transcript.last().unwrap();
        assert!(last
            .content
            .starts_with("There was an error submitting your ticket: Workflow inactive"));
    }

    #[tokio::test]
    async fn test_submit_with_streams_messages() {
        let mock = MockWebhookSender::failing_times(DeliveryError::Transport("down".into()), 1);
        let mut seen = Vec::new();

        let outcome = submitter(&mock, 1)
            .submit_with(&complete_form(), |m| seen.push(m))
            .await;

        assert!(outcome.is_success());
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], PROCESSING);
        assert!(seen[1].contains(RETRY_MARKER));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }
}
