//! Scripted sender for tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::{DeliveryError, WebhookResponse, WebhookSender};
use crate::types::Ticket;

/// Mock implementation for testing.
///
/// Returns queued results in order; once the queue is empty every call
/// succeeds. Every ticket it receives is recorded.
#[derive(Debug, Clone, Default)]
pub struct MockWebhookSender {
    responses: Arc<Mutex<VecDeque<Result<WebhookResponse, DeliveryError>>>>,
    sent: Arc<Mutex<Vec<Ticket>>>,
}

impl MockWebhookSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sender that fails the first `times` calls with `error`, then succeeds
    pub fn failing_times(error: DeliveryError, times: usize) -> Self {
        let mock = Self::new();
        for _ in 0..times {
            mock.push_response(Err(error.clone()));
        }
        mock
    }

    pub fn push_response(&self, response: Result<WebhookResponse, DeliveryError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn sent_tickets(&self) -> Vec<Ticket> {
        self.sent.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl WebhookSender for MockWebhookSender {
    fn name(&self) -> &str {
        "mock"
    }

    async fn send(&self, ticket: &Ticket) -> Result<WebhookResponse, DeliveryError> {
        self.sent.lock().unwrap().push(ticket.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(WebhookResponse::ok("Ticket received")))
    }
}
