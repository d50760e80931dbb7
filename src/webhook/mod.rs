//! Ticket delivery to the IT workflow webhook.
//!
//! [`WebhookSender`] is the seam the submission layer posts through.
//! [`HttpWebhookSender`] talks to the real endpoint; [`MockWebhookSender`]
//! replays scripted results for tests.

mod connectivity;
mod http;
mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Ticket;

pub use connectivity::{sample_ticket, test_webhook, TROUBLESHOOTING};
pub use http::{HttpWebhookSender, WebhookAuth};
pub use mock::MockWebhookSender;

/// Body returned by the workflow engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WebhookResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }
}

/// Why a delivery attempt failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The service answered and reported `success: false`
    #[error("{message}")]
    Rejected { message: String },

    /// The service answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection, DNS or timeout failure
    #[error("{0}")]
    Transport(String),

    /// The service answered with something that is not a usable response
    #[error("Invalid response from webhook: {0}")]
    InvalidResponse(String),
}

impl DeliveryError {
    /// True when the service itself reported the failure, false for
    /// transport problems and malformed replies
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            DeliveryError::Rejected { .. } | DeliveryError::Http { .. }
        )
    }

    /// Message to show the user
    pub fn user_message(&self) -> String {
        match self {
            DeliveryError::Rejected { message } => message.clone(),
            DeliveryError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeliveryError::Transport(format!("Request timed out: {err}"))
        } else {
            DeliveryError::Transport(err.to_string())
        }
    }
}

/// Posts a ticket and reports the service's answer
#[async_trait]
pub trait WebhookSender: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn send(&self, ticket: &Ticket) -> Result<WebhookResponse, DeliveryError>;
}

/// Turn a raw HTTP status and body into a delivery result.
///
/// JSON bodies may carry `success` and `message` (either optional). A 2xx
/// without `success`, or with a plain-text body, counts as success. Any
/// non-2xx is a service error carrying the JSON `message`/`error` field or
/// the raw body.
pub fn interpret_response(status: u16, body: &str) -> Result<WebhookResponse, DeliveryError> {
    let trimmed = body.trim();
    let json = serde_json::from_str::<serde_json::Value>(trimmed).ok();

    if !(200..300).contains(&status) {
        let message = json
            .as_ref()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if trimmed.is_empty() {
                    format!("Request failed with status {status}")
                } else {
                    trimmed.to_string()
                }
            });
        return Err(DeliveryError::Http { status, message });
    }

    let Some(serde_json::Value::Object(map)) = json else {
        // Plain text (or empty) 2xx body
        return Ok(WebhookResponse {
            success: true,
            message: (!trimmed.is_empty()).then(|| trimmed.to_string()),
        });
    };

    let message = map
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string);

    match map.get("success") {
        None => Ok(WebhookResponse {
            success: true,
            message,
        }),
        Some(serde_json::Value::Bool(true)) => Ok(WebhookResponse {
            success: true,
            message,
        }),
        Some(serde_json::Value::Bool(false)) => Err(DeliveryError::Rejected {
            message: message.unwrap_or_else(|| "Ticket was not accepted".to_string()),
        }),
        Some(other) => Err(DeliveryError::InvalidResponse(format!(
            "'success' must be a boolean, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_json() {
        let resp = interpret_response(200, r#"{"success":true,"message":"Created"}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.message.as_deref(), Some("Created"));
    }

    #[test]
    fn test_2xx_without_success_field() {
        let resp = interpret_response(201, r#"{"message":"Workflow was started"}"#).unwrap();
        assert!(resp.success);
    }

    #[test]
    fn test_plain_text_2xx() {
        let resp = interpret_response(200, "Accepted").unwrap();
        assert!(resp.success);
        assert_eq!(resp.message.as_deref(), Some("Accepted"));

        let resp = interpret_response(204, "").unwrap();
        assert!(resp.success);
        assert_eq!(resp.message, None);
    }

    #[test]
    fn test_success_false_is_rejected() {
        let err =
            interpret_response(200, r#"{"success":false,"message":"Duplicate ticket"}"#).unwrap_err();
        assert_eq!(
            err,
            DeliveryError::Rejected {
                message: "Duplicate ticket".into()
            }
        );
        assert!(err.is_service_failure());
        assert_eq!(err.user_message(), "Duplicate ticket");
    }

    #[test]
    fn test_error_status_uses_json_message_or_body() {
        let err = interpret_response(500, r#"{"error":"Workflow inactive"}"#).unwrap_err();
        assert_eq!(
            err,
            DeliveryError::Http {
                status: 500,
                message: "Workflow inactive".into()
            }
        );
        assert!(err.is_service_failure());

        let err = interpret_response(404, "no such hook").unwrap_err();
        assert_eq!(err.user_message(), "no such hook");

        let err = interpret_response(502, "").unwrap_err();
        assert_eq!(err.user_message(), "Request failed with status 502");
    }

    #[test]
    fn test_non_bool_success_is_invalid() {
        let err = interpret_response(200, r#"{"success":"yes"}"#).unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidResponse(_)));
        assert!(!err.is_service_failure());
    }

    #[test]
    fn test_transport_is_not_service_failure() {
        let err = DeliveryError::Transport("connection refused".into());
        assert!(!err.is_service_failure());
        assert_eq!(err.user_message(), "connection refused");
    }
}
