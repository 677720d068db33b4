//! Email configuration from TOML (`[email]` section)

use crate::email::SmtpSettings;
use serde::{Deserialize, Serialize};

/// Raw email configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Environment variable holding the sending (and receiving) address
    pub sender_env: String,
    /// Environment variable holding the SMTP password
    pub password_env: String,
    pub subject: String,
}

impl Default for FileEmailConfig {
    fn default() -> Self {
        let smtp = SmtpSettings::default();
        Self {
            smtp_host: smtp.host,
            smtp_port: smtp.port,
            sender_env: "EMAIL_SENDER".to_string(),
            password_env: "EMAIL_PASSWORD".to_string(),
            subject: smtp.subject,
        }
    }
}

impl FileEmailConfig {
    pub fn to_smtp_settings(&self, env: impl Fn(&str) -> Option<String>) -> SmtpSettings {
        SmtpSettings {
            host: self.smtp_host.clone(),
            port: self.smtp_port,
            sender: env(&self.sender_env),
            password: env(&self.password_env),
            subject: self.subject.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_env() {
        let config = FileEmailConfig::default();
        let settings = config.to_smtp_settings(|name| match name {
            "EMAIL_SENDER" => Some("me@example.com".to_string()),
            _ => None,
        });
        assert_eq!(settings.host, "smtp.gmail.com");
        assert_eq!(settings.port, 465);
        assert_eq!(settings.sender.as_deref(), Some("me@example.com"));
        assert!(!settings.is_configured());
    }
}
