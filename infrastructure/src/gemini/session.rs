//! Gemini session
//!
//! Keeps the running `contents` array for one turn. The model's reply is
//! appended verbatim (including any `functionCall` parts) so the follow-up
//! request carrying `functionResponse` parts lines up with it.

use super::gateway::GeminiEndpoint;
use super::types::{
    Content, GenerateRequest, Part, ToolDeclarations, function_declaration, to_llm_response,
};
use async_trait::async_trait;
use naomi_application::ports::llm_gateway::{GatewayError, LlmSession};
use naomi_domain::{ConversationTurn, LlmResponse, ToolResult};
use std::sync::{Arc, Mutex};
use tracing::debug;

#[derive(Default)]
struct SessionState {
    contents: Vec<Content>,
    tools: Vec<ToolDeclarations>,
}

/// A Gemini conversation primed with a system prompt and prior history.
pub struct GeminiSession {
    endpoint: Arc<GeminiEndpoint>,
    system_instruction: Content,
    state: Mutex<SessionState>,
}

impl GeminiSession {
    pub(crate) fn new(
        endpoint: Arc<GeminiEndpoint>,
        system_prompt: &str,
        history: &[ConversationTurn],
    ) -> Self {
        Self {
            endpoint,
            system_instruction: Content::system(system_prompt),
            state: Mutex::new(SessionState {
                contents: history.iter().map(Content::from_turn).collect(),
                tools: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Send `next` after the current contents. On success both `next` and
    /// the model's reply are committed to the session.
    async fn exchange(&self, next: Content) -> Result<LlmResponse, GatewayError> {
        let request = {
            let state = self.lock();
            let mut contents = state.contents.clone();
            contents.push(next.clone());
            GenerateRequest {
                contents,
                system_instruction: Some(self.system_instruction.clone()),
                tools: state.tools.clone(),
            }
        };

        let response = self.endpoint.generate(&request).await?;

        let Some(candidate) = response.candidates.into_iter().next() else {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .map(|r| format!("prompt blocked ({})", r))
                .unwrap_or_else(|| "no candidates".to_string());
            return Err(GatewayError::MalformedResponse(reason));
        };

        let content = candidate.content.unwrap_or(Content {
            role: Some("model".to_string()),
            parts: Vec::new(),
        });
        let llm_response = to_llm_response(
            &content,
            candidate.finish_reason.as_deref(),
            response.model_version,
        );

        let mut state = self.lock();
        state.contents.push(next);
        state.contents.push(content);
        Ok(llm_response)
    }

    /// One `functionResponse` per `functionCall` of the last model reply,
    /// matched by name. Duplicate calls that were collapsed before
    /// execution reuse the result of their twin.
    fn response_parts(&self, results: &[ToolResult]) -> Vec<Part> {
        let state = self.lock();
        let calls: Vec<String> = state
            .contents
            .iter()
            .rev()
            .find(|c| c.role.as_deref() == Some("model"))
            .map(|c| c.function_calls().map(|f| f.name.clone()).collect())
            .unwrap_or_default();

        if calls.is_empty() {
            return results
                .iter()
                .map(|r| Part::function_response(&r.tool_name, r.to_prompt_text()))
                .collect();
        }

        let mut used = vec![false; results.len()];
        calls
            .iter()
            .map(|name| {
                let matching: Vec<usize> = (0..results.len())
                    .filter(|&i| results[i].tool_name == *name)
                    .collect();
                let index = matching
                    .iter()
                    .copied()
                    .find(|&i| !used[i])
                    .or_else(|| matching.last().copied());
                match index {
                    Some(i) => {
                        used[i] = true;
                        Part::function_response(name, results[i].to_prompt_text())
                    }
                    None => Part::function_response(name, "Error: tool was not executed"),
                }
            })
            .collect()
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError> {
        {
            let mut state = self.lock();
            state.tools = if tools.is_empty() {
                Vec::new()
            } else {
                vec![ToolDeclarations {
                    function_declarations: tools.iter().map(function_declaration).collect(),
                }]
            };
        }
        self.exchange(Content::user_text(content)).await
    }

    async fn send_tool_results(&self, results: &[ToolResult]) -> Result<LlmResponse, GatewayError> {
        let parts = self.response_parts(results);
        debug!(
            results = results.len(),
            parts = parts.len(),
            "Sending function responses"
        );
        self.exchange(Content {
            role: Some("user".to_string()),
            parts,
        })
        .await
    }
}
