//! HTTP delivery via reqwest

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;

use super::{interpret_response, DeliveryError, WebhookResponse, WebhookSender};
use crate::config::WebhookConfig;
use crate::types::Ticket;

/// Webhook authentication type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookAuth {
    None,
    Bearer { token: String },
    Basic { username: String, password: String },
}

impl WebhookAuth {
    /// Resolve credentials from the environment variables named in config
    pub fn from_config(config: &WebhookConfig) -> Self {
        match config.auth_type.as_deref() {
            Some("bearer") => {
                let token_env = config.token_env.as_deref().unwrap_or("");
                let token = std::env::var(token_env).unwrap_or_default();
                if token.is_empty() && !token_env.is_empty() {
                    tracing::warn!(
                        env_var = token_env,
                        "Bearer token environment variable is not set or empty"
                    );
                }
                WebhookAuth::Bearer { token }
            }
            Some("basic") => {
                let password_env = config.password_env.as_deref().unwrap_or("");
                let password = std::env::var(password_env).unwrap_or_default();
                if password.is_empty() && !password_env.is_empty() {
                    tracing::warn!(
                        env_var = password_env,
                        "Basic auth password environment variable is not set or empty"
                    );
                }
                WebhookAuth::Basic {
                    username: config.username.clone().unwrap_or_default(),
                    password,
                }
            }
            _ => WebhookAuth::None,
        }
    }
}

/// Posts tickets as JSON to the resolved webhook URL.
pub struct HttpWebhookSender {
    url: String,
    auth: WebhookAuth,
    client: Client,
}

impl HttpWebhookSender {
    /// Create a sender from config. The client carries the request timeout.
    pub fn new(config: &WebhookConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            url: config.resolved_url(),
            auth: WebhookAuth::from_config(config),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl WebhookSender for HttpWebhookSender {
    fn name(&self) -> &str {
        &self.url
    }

    async fn send(&self, ticket: &Ticket) -> Result<WebhookResponse, DeliveryError> {
        let mut request = self
            .client
            .post(&self.url)
            .header(ACCEPT, "application/json")
            .json(ticket);

        request = match &self.auth {
            WebhookAuth::Bearer { token } => request.bearer_auth(token),
            WebhookAuth::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            WebhookAuth::None => request,
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    url = %self.url,
                    ticket_id = %ticket.ticket_id,
                    error = %e,
                    "Webhook delivery failed"
                );
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;
        let result = interpret_response(status.as_u16(), &body);

        match &result {
            Ok(_) => tracing::info!(
                url = %self.url,
                ticket_id = %ticket.ticket_id,
                status = %status,
                "Ticket delivered"
            ),
            Err(e) => tracing::warn!(
                url = %self.url,
                ticket_id = %ticket.ticket_id,
                status = %status,
                error = %e,
                "Webhook did not accept ticket"
            ),
        }
        result
    }
}
