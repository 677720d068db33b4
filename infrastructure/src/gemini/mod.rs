//! Google Gemini adapter.
//!
//! Talks to the `generateContent` REST endpoint with native function
//! calling. Tools are declared to the model but never executed by it; the
//! orchestrator runs them and sends the results back.
//!
//! The API key travels in the `key` query parameter and is read from the
//! shared [`CredentialPool`](naomi_domain::CredentialPool) on every request,
//! so a rotation by the orchestrator takes effect on the next call.

pub mod error;
mod gateway;
mod session;
mod types;

pub use gateway::{DEFAULT_GEMINI_MODEL, GEMINI_BASE_URL, GeminiGateway};
pub use session::GeminiSession;
