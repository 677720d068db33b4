//! Structured configuration problems.
//!
//! Loading never fails on a questionable value; it records an issue and
//! falls back. Callers decide what to do with errors versus warnings.

use std::fmt;

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the assistant cannot start.
    Error,
    /// Non-fatal: a fallback was applied.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// Timezone is not a known IANA name; the default is used.
    UnknownTimezone,
    /// No API key could be found for the model provider.
    EmptyCredentialPool,
    /// Calendar backend is neither `google` nor `memory`.
    UnknownCalendarBackend,
    /// Google backend selected without an access token; offline mode is used.
    MissingAccessToken,
    /// Retry ceiling of zero would never call the model.
    ZeroAttempts,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let issue = ConfigIssue::warning(ConfigIssueCode::UnknownTimezone, "bad zone");
        assert_eq!(issue.to_string(), "warning: bad zone");
        assert!(!issue.is_error());
        assert!(ConfigIssue::error(ConfigIssueCode::EmptyCredentialPool, "x").is_error());
    }
}
