//! LLM Gateway port
//!
//! Defines the interface for communicating with LLM providers.
//!
//! Sessions are used for exactly one turn: the orchestrator opens a
//! session with the system prompt and prior history, sends the user's
//! message with the tool schemas, and (when tools ran) sends the results
//! back once. Providers must never execute tools themselves.

use async_trait::async_trait;
use naomi_domain::{ConversationTurn, LlmResponse, ToolResult};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timeout")]
    Timeout,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether another attempt (possibly with another credential) may
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited(_)
                | GatewayError::Timeout
                | GatewayError::Unavailable(_)
                | GatewayError::Authentication(_)
        )
    }

    /// Whether a retry only makes sense with a different credential.
    pub fn needs_rotation(&self) -> bool {
        matches!(
            self,
            GatewayError::RateLimited(_) | GatewayError::Authentication(_)
        )
    }

    /// Short identifier for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::RateLimited(_) => "rate_limited",
            GatewayError::Timeout => "timeout",
            GatewayError::Unavailable(_) => "unavailable",
            GatewayError::Authentication(_) => "authentication",
            GatewayError::MalformedResponse(_) => "malformed_response",
            GatewayError::RequestFailed(_) => "request_failed",
            GatewayError::Other(_) => "other",
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer communicates with LLM providers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Open a session primed with a system prompt and prior turns.
    async fn create_session(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Model identifier used for new sessions.
    fn model_name(&self) -> &str;
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Send a user message together with tool schemas.
    ///
    /// The response may contain text, tool use requests, or both.
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError>;

    /// Send the results of the tool calls from the previous response, all
    /// in one message.
    async fn send_tool_results(&self, results: &[ToolResult]) -> Result<LlmResponse, GatewayError>;
}
