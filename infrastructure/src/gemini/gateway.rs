//! Gemini LLM Gateway implementation

use super::error::{classify_status, classify_transport};
use super::session::GeminiSession;
use super::types::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;
use naomi_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use naomi_domain::{ConversationTurn, CredentialPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Upper bound for the HTTP request itself; the orchestrator applies its
/// own, usually shorter, per-call timeout on top.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection shared by the gateway and its sessions.
pub(crate) struct GeminiEndpoint {
    http: reqwest::Client,
    base_url: String,
    model: String,
    credentials: Arc<CredentialPool>,
}

impl GeminiEndpoint {
    /// POST `models/{model}:generateContent` with the currently active key.
    pub(crate) async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, GatewayError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let key = self.credentials.active();

        debug!(
            model = %self.model,
            contents = request.contents.len(),
            key_index = self.credentials.index(),
            "Sending generateContent request"
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(|e| classify_transport(&e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| classify_transport(&e))?;
        if !status.is_success() {
            return Err(classify_status(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }

    pub(crate) fn model(&self) -> &str {
        &self.model
    }
}

/// LLM Gateway implementation for Google Gemini
pub struct GeminiGateway {
    endpoint: Arc<GeminiEndpoint>,
}

impl GeminiGateway {
    pub fn new(
        model: impl Into<String>,
        credentials: Arc<CredentialPool>,
    ) -> Result<Self, GatewayError> {
        Self::with_base_url(GEMINI_BASE_URL, model, credentials)
    }

    /// Create a gateway against a custom endpoint (proxies, tests).
    pub fn with_base_url(
        base_url: impl Into<String>,
        model: impl Into<String>,
        credentials: Arc<CredentialPool>,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = GeminiEndpoint {
            http,
            base_url: base_url.into(),
            model: model.into(),
            credentials,
        };
        info!(
            model = %endpoint.model,
            keys = endpoint.credentials.len(),
            "GeminiGateway initialized"
        );

        Ok(Self {
            endpoint: Arc::new(endpoint),
        })
    }
}

#[async_trait]
impl LlmGateway for GeminiGateway {
    async fn create_session(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(GeminiSession::new(
            Arc::clone(&self.endpoint),
            system_prompt,
            history,
        )))
    }

    fn model_name(&self) -> &str {
        self.endpoint.model()
    }
}
