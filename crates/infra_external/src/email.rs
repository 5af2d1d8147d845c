//! SMTP reviewer notifications
//!
//! Sends each [`ReviewNotification`] as one plain-text email. Delivery is
//! attempted once; failures are reported to the caller, which decides
//! whether they matter.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Deserialize;
use tracing::{debug, warn};

use core_kernel::{DomainPort, OperationMetadata, PortError};
use domain_claims::{NotificationPort, ReviewNotification};

use crate::error::ExternalError;

/// SMTP relay settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Use STARTTLS; disable only for local relays such as MailHog
    pub starttls: bool,
    pub timeout_secs: u64,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 587,
            username: None,
            password: None,
            starttls: true,
            timeout_secs: 10,
        }
    }
}

/// Notification port backed by an SMTP relay
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    relay: String,
}

impl SmtpNotifier {
    pub fn new(config: &SmtpConfig) -> Result<Self, ExternalError> {
        if config.host.trim().is_empty() {
            return Err(ExternalError::Configuration("smtp host must be set".to_string()));
        }

        let mut builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port)
        .timeout(Some(Duration::from_secs(config.timeout_secs)));

        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            relay: format!("{}:{}", config.host, config.port),
        })
    }

    pub fn relay(&self) -> &str {
        &self.relay
    }
}

/// Renders a notification as an RFC 5322 message
pub fn build_message(notification: &ReviewNotification) -> Result<Message, ExternalError> {
    let from: Mailbox = notification
        .sender
        .parse()
        .map_err(|e| ExternalError::invalid_address(&notification.sender, e))?;
    let to: Mailbox = notification
        .recipient
        .parse()
        .map_err(|e| ExternalError::invalid_address(&notification.recipient, e))?;

    Ok(Message::builder()
        .from(from)
        .to(to)
        .subject(&notification.subject)
        .header(ContentType::TEXT_PLAIN)
        .body(notification.body.clone())?)
}

impl DomainPort for SmtpNotifier {}

#[async_trait]
impl NotificationPort for SmtpNotifier {
    async fn send(
        &self,
        notification: &ReviewNotification,
        metadata: Option<OperationMetadata>,
    ) -> Result<(), PortError> {
        let submission_id = metadata.and_then(|m| m.submission_id);
        let message = build_message(notification)?;

        match self.transport.send(message).await {
            Ok(response) => {
                debug!(
                    submission_id = ?submission_id,
                    relay = %self.relay,
                    code = %response.code(),
                    subject = %notification.subject,
                    "Reviewer notification sent"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    submission_id = ?submission_id,
                    relay = %self.relay,
                    recipient = %notification.recipient,
                    error = %e,
                    "Email send failed"
                );
                Err(ExternalError::from(e).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(sender: &str) -> ReviewNotification {
        ReviewNotification {
            subject: "Claim Report for CLM999".to_string(),
            body: "Claim ID: CLM999\n".to_string(),
            sender: sender.to_string(),
            recipient: "review@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_message_sets_headers() {
        let message = build_message(&notification("intake@example.com")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Claim Report for CLM999"));
        assert!(raw.contains("From: intake@example.com"));
        assert!(raw.contains("To: review@example.com"));
        assert!(raw.contains("Claim ID: CLM999"));
    }

    #[test]
    fn test_build_message_rejects_bad_sender() {
        let err = build_message(&notification("not an address")).unwrap_err();
        assert!(matches!(err, ExternalError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_new_requires_host() {
        let config = SmtpConfig {
            host: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(SmtpNotifier::new(&config), Err(ExternalError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_unreachable_relay_fails_without_retry() {
        let notifier = SmtpNotifier::new(&SmtpConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            starttls: false,
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let result = notifier.send(&notification("intake@example.com"), None).await;
        assert!(result.is_err());
    }
}
