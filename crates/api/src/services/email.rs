//! Outbound portal mail.
//!
//! Two providers: `console` logs the message for local development,
//! `mailgun` posts it to the Mailgun HTTP API.

use crate::config::EmailConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email service not configured")]
    NotConfigured,

    #[error("Failed to send email: {0}")]
    SendFailed(String),

    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// One rendered, ready-to-send email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// Compiled HTML body
    pub body_html: String,
}

/// Transport for transactional portal emails. Cheap to clone; the config
/// and the reqwest client are both shared.
#[derive(Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Sends one message. Exactly one attempt, no retry; a disabled service
    /// drops the message silently so callers never need to special-case it.
    pub async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if !self.config.enabled {
            debug!(to = %message.to, subject = %message.subject, "Email disabled, dropping");
            return Ok(());
        }

        match self.config.provider.as_str() {
            "console" => self.send_console(message),
            "mailgun" => self.send_mailgun(message).await,
            other => {
                error!(provider = %other, "Unknown email provider");
                Err(EmailError::NotConfigured)
            }
        }
    }

    fn send_console(&self, message: EmailMessage) -> Result<(), EmailError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body_bytes = message.body_html.len(),
            "Email (console provider)"
        );
        Ok(())
    }

    async fn send_mailgun(&self, message: EmailMessage) -> Result<(), EmailError> {
        let url = format!(
            "https://api.mailgun.net/v3/{}/messages",
            self.config.mailgun_domain
        );
        let from = format!("{} <{}>", self.config.sender_name, self.config.sender_email);

        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.config.mailgun_api_key))
            .form(&[
                ("from", from.as_str()),
                ("to", message.to.as_str()),
                ("subject", message.subject.as_str()),
                ("html", message.body_html.as_str()),
            ])
            .send()
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        if response.status().is_success() {
            debug!(to = %message.to, "Email sent via Mailgun");
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(EmailError::ProviderError(format!(
                "Mailgun returned {}: {}",
                status, body
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_service_skips_send() {
        let service = EmailService::new(EmailConfig::default());
        assert!(!service.is_enabled());

        let result = service
            .send(EmailMessage {
                to: "user@demo.com".to_string(),
                subject: "Test".to_string(),
                body_html: "<p>hi</p>".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_console_provider_succeeds() {
        let config = EmailConfig {
            enabled: true,
            provider: "console".to_string(),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);

        let result = service
            .send(EmailMessage {
                to: "user@demo.com".to_string(),
                subject: "Test".to_string(),
                body_html: "<p>hi</p>".to_string(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_provider_fails() {
        let config = EmailConfig {
            enabled: true,
            provider: "pigeon".to_string(),
            ..EmailConfig::default()
        };
        let service = EmailService::new(config);

        let result = service
            .send(EmailMessage {
                to: "user@demo.com".to_string(),
                subject: "Test".to_string(),
                body_html: String::new(),
            })
            .await;
        assert!(matches!(result, Err(EmailError::NotConfigured)));
    }
}
