//! Email delivery

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clinic_core::config::{EmailConfig, EmailDeliveryMethod};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Email errors
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Send failed: {0}")]
    SendFailed(String),
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

pub type EmailResult<T> = Result<T, EmailError>;

/// Email address with optional name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub email: String,
    pub name: Option<String>,
}

impl EmailAddress {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Format as RFC 5322
    pub fn to_rfc5322(&self) -> String {
        match &self.name {
            Some(name) => format!("{} <{}>", name, self.email),
            None => self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    pub from: EmailAddress,
    pub to: Vec<EmailAddress>,
    pub cc: Vec<EmailAddress>,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl EmailMessage {
    pub fn new(
        from: EmailAddress,
        to: Vec<EmailAddress>,
        subject: impl Into<String>,
        text_body: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            to,
            cc: Vec::new(),
            subject: subject.into(),
            text_body: text_body.into(),
            html_body: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html_body = Some(html.into());
        self
    }

    pub fn cc(mut self, addresses: Vec<EmailAddress>) -> Self {
        self.cc = addresses;
        self
    }

    fn check_recipients(&self) -> EmailResult<()> {
        if self.to.is_empty() {
            return Err(EmailError::InvalidRecipient("no recipients".into()));
        }
        match self
            .to
            .iter()
            .chain(self.cc.iter())
            .find(|a| !a.email.contains('@'))
        {
            Some(bad) => Err(EmailError::InvalidRecipient(bad.email.clone())),
            None => Ok(()),
        }
    }
}

/// Email sender trait
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Send an email, returning the message id
    async fn send(&self, message: &EmailMessage) -> EmailResult<String>;

    /// Check if the sender is configured
    fn is_configured(&self) -> bool;
}

/// Writes outgoing mail to the log instead of a mail server
pub struct LogEmailSender {
    enabled: bool,
}

impl LogEmailSender {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// Accepts every message and drops it
    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for LogEmailSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult<String> {
        message.check_recipients()?;
        if !self.enabled {
            debug!(id = %message.id, "Email delivery disabled; message dropped");
            return Ok(message.id.clone());
        }

        let to = message
            .to
            .iter()
            .map(|a| a.to_rfc5322())
            .collect::<Vec<_>>()
            .join(", ");
        let cc = message
            .cc
            .iter()
            .map(|a| a.to_rfc5322())
            .collect::<Vec<_>>()
            .join(", ");
        info!(
            id = %message.id,
            from = %message.from.to_rfc5322(),
            to = %to,
            cc = %cc,
            subject = %message.subject,
            "Email sent"
        );
        debug!(id = %message.id, body = %message.text_body, "Email body");
        Ok(message.id.clone())
    }

    fn is_configured(&self) -> bool {
        self.enabled
    }
}

/// Keeps sent messages in memory
#[derive(Default)]
pub struct MemoryEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
    fail: bool,
}

impl MemoryEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send fails
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl EmailSender for MemoryEmailSender {
    async fn send(&self, message: &EmailMessage) -> EmailResult<String> {
        if self.fail {
            return Err(EmailError::SendFailed("mail server unavailable".into()));
        }
        message.check_recipients()?;
        self.sent.lock().push(message.clone());
        Ok(message.id.clone())
    }

    fn is_configured(&self) -> bool {
        true
    }
}

/// Sender matching the configured delivery method
pub fn sender_for(config: &EmailConfig) -> Arc<dyn EmailSender> {
    match config.delivery_method {
        EmailDeliveryMethod::Log => Arc::new(LogEmailSender::new()),
        EmailDeliveryMethod::Disabled => Arc::new(LogEmailSender::disabled()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(to: &str) -> EmailMessage {
        EmailMessage::new(
            EmailAddress::new("clinic@example.com").with_name("Clinic"),
            vec![EmailAddress::new(to)],
            "Hello",
            "Body",
        )
    }

    #[test]
    fn test_rfc5322() {
        let address = EmailAddress::new("a@example.com").with_name("Dr. A");
        assert_eq!(address.to_rfc5322(), "Dr. A <a@example.com>");
        assert_eq!(EmailAddress::new("a@example.com").to_rfc5322(), "a@example.com");
    }

    #[tokio::test]
    async fn test_memory_sender_captures() {
        let sender = MemoryEmailSender::new();
        sender.send(&message("p@example.com")).await.unwrap();
        assert_eq!(sender.sent().len(), 1);
        assert_eq!(sender.sent()[0].subject, "Hello");
    }

    #[tokio::test]
    async fn test_invalid_recipient_rejected() {
        let sender = LogEmailSender::new();
        let err = sender.send(&message("not-an-address")).await.unwrap_err();
        assert!(matches!(err, EmailError::InvalidRecipient(_)));
    }

    #[tokio::test]
    async fn test_disabled_sender_drops_messages() {
        let sender = LogEmailSender::disabled();
        assert!(!sender.is_configured());
        assert!(sender.send(&message("p@example.com")).await.is_ok());
    }
}
