//! SMTP notifier.
//!
//! Sends a plain-text alert from the configured account to itself over
//! implicit TLS (port 465 by default).

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use naomi_application::ports::adapter_error::AdapterError;
use naomi_application::ports::notification::{NotificationOutcome, NotificationPort};
use tracing::{debug, info};

/// Connection and account details for [`SmtpNotifier`].
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub sender: Option<String>,
    pub password: Option<String>,
    pub subject: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("subject", &self.subject)
            .finish()
    }
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 465,
            sender: None,
            password: None,
            subject: "Receptionist Alert".to_string(),
        }
    }
}

impl SmtpSettings {
    /// Both the account and its password are present and non-blank.
    pub fn is_configured(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.sender) && present(&self.password)
    }
}

/// [`NotificationPort`] that emails the configured account.
pub struct SmtpNotifier {
    settings: SmtpSettings,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SmtpSettings {
        &self.settings
    }

    fn build_message(&self, sender: &str, body: &str) -> Result<Message, AdapterError> {
        let mailbox: lettre::message::Mailbox = sender
            .parse()
            .map_err(|e| AdapterError::Other(format!("Invalid sender address '{}': {}", sender, e)))?;

        Message::builder()
            .from(mailbox.clone())
            .to(mailbox)
            .subject(self.settings.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AdapterError::Other(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl NotificationPort for SmtpNotifier {
    async fn send(&self, message: &str) -> Result<NotificationOutcome, AdapterError> {
        let (Some(sender), Some(password)) = (&self.settings.sender, &self.settings.password)
        else {
            debug!("Email notifier not configured, skipping send");
            return Ok(NotificationOutcome::NotConfigured);
        };
        if sender.trim().is_empty() || password.trim().is_empty() {
            debug!("Email credentials are blank, skipping send");
            return Ok(NotificationOutcome::NotConfigured);
        }

        let email = self.build_message(sender, message)?;

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.host)
                .map_err(|e| AdapterError::Network(e.to_string()))?
                .port(self.settings.port)
                .credentials(Credentials::new(sender.clone(), password.clone()))
                .build();

        mailer.send(email).await.map_err(|e| {
            if e.is_permanent() {
                AdapterError::Unauthorized(e.to_string())
            } else {
                AdapterError::Network(e.to_string())
            }
        })?;

        info!(host = %self.settings.host, "Sent notification email");
        Ok(NotificationOutcome::Sent)
    }
}
