//! Webhook connectivity check

use chrono::{DateTime, Utc};

use super::{DeliveryError, WebhookResponse, WebhookSender};
use crate::types::{Ticket, INITIAL_STATUS};

/// Things to check when the connectivity test fails
pub const TROUBLESHOOTING: &[&str] = &[
    "Check that the workflow engine is running and reachable",
    "Check that the webhook workflow is active",
    "Verify the webhook URL and path in the configuration",
    "Verify the authentication settings and environment variables",
    "Check firewall and proxy settings between this machine and the host",
];

/// A recognisable test ticket with a `TEST-nnnn` identifier
pub fn sample_ticket(now: DateTime<Utc>) -> Ticket {
    let suffix = now.timestamp_millis().rem_euclid(10_000);
    Ticket {
        ticket_id: format!("TEST-{suffix:04}"),
        clinic_name: "Test Clinic".to_string(),
        department: "IT".to_string(),
        location: "Floor 1, Room 101".to_string(),
        phone: "(555) 123-4567".to_string(),
        priority: "LOW".to_string(),
        description: "Technical Issue Report: Webhook connectivity test".to_string(),
        category: "General IT Support".to_string(),
        needs_escalation: false,
        suggested_solution: "No action required; this is a connectivity test.".to_string(),
        timestamp: now.to_rfc3339(),
        status: INITIAL_STATUS.to_string(),
        requester_email: String::new(),
    }
}

/// Send the sample ticket once, without retries
pub async fn test_webhook(sender: &dyn WebhookSender) -> Result<WebhookResponse, DeliveryError> {
    let ticket = sample_ticket(Utc::now());
    tracing::info!(
        target_name = sender.name(),
        ticket_id = %ticket.ticket_id,
        "Testing webhook connectivity"
    );
    sender.send(&ticket).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhook::MockWebhookSender;

    #[test]
    fn test_sample_ticket_id() {
        let now = DateTime::from_timestamp_millis(1_700_000_004_321).unwrap();
        let ticket = sample_ticket(now);
        assert_eq!(ticket.ticket_id, "TEST-4321");
        assert_eq!(ticket.status, "Open");
    }

    #[tokio::test]
    async fn test_webhook_sends_one_test_ticket() {
        let mock = MockWebhookSender::new();
        mock.push_response(Ok(WebhookResponse::ok("pong")));

        let resp = test_webhook(&mock).await.unwrap();
        assert_eq!(resp.message.as_deref(), Some("pong"));

        let sent = mock.sent_tickets();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].ticket_id.starts_with("TEST-"));
    }

    #[tokio::test]
    async fn test_webhook_failure_is_returned_not_retried() {
        let mock = MockWebhookSender::new();
        mock.push_response(Err(DeliveryError::Transport("refused".into())));
        mock.push_response(Ok(WebhookResponse::ok("late")));

        assert!(test_webhook(&mock).await.is_err());
        assert_eq!(mock.call_count(), 1);
    }
}
