//! Email notification adapter.

mod smtp;

pub use smtp::{SmtpNotifier, SmtpSettings};
