//! Respond use case.
//!
//! Runs one conversation turn: the model thinks, tools run, the model
//! summarizes.
//!
//! ```text
//! AwaitingLlm ──(text only)──────────────────────────────▶ Done
//!     │  ▲
//!     │  └─(retryable error, rotate credential, attempts < max)
//!     ▼
//! ExecutingTools ──▶ AwaitingSummary ──(text | fallback)──▶ Done
//! ```
//!
//! Only the thinking phase is retried. Once a tool has run, failures are
//! reported rather than retried, so a calendar write is never repeated.

use crate::config::OrchestratorParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use crate::ports::progress::{NoTurnProgress, TurnProgressNotifier};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::tool_helpers::tool_args_preview;
use naomi_domain::util::one_line_preview;
use naomi_domain::{
    AssistantPromptTemplate, ControlWord, ConversationTurn, CredentialPool, LlmResponse,
    TimeResolver, ToolCall, ToolResult, TurnPhase, TurnState, dedup_tool_calls_by,
};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why the thinking phase gave up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RespondError {
    /// Every attempt hit a transient failure.
    #[error("Gave up after {attempts} attempt(s): {last}")]
    Exhausted { attempts: usize, last: GatewayError },

    /// A failure retrying cannot fix.
    #[error("{0}")]
    Terminal(GatewayError),
}

/// Input for the [`RespondUseCase`].
#[derive(Debug, Clone, Copy)]
pub struct RespondInput<'a> {
    /// The user's message for this turn.
    pub user_text: &'a str,
    /// Prior turns, owned by the caller.
    pub history: &'a [ConversationTurn],
}

impl<'a> RespondInput<'a> {
    pub fn new(user_text: &'a str, history: &'a [ConversationTurn]) -> Self {
        Self { user_text, history }
    }
}

/// Everything a turn produced.
#[derive(Debug, Clone)]
pub struct RespondOutput {
    /// Reply for the user. Never empty.
    pub reply: String,
    /// Results of executed tools, in execution order.
    pub tool_results: Vec<ToolResult>,
    /// LLM attempts made in the thinking phase.
    pub attempts: usize,
    /// Set when the turn was a control word.
    pub control: Option<ControlWord>,
    /// Set when the thinking phase failed.
    pub error: Option<RespondError>,
    /// True when the reply was assembled from raw tool results.
    pub used_fallback: bool,
}

impl RespondOutput {
    fn reply(reply: impl Into<String>, attempts: usize) -> Self {
        Self {
            reply: reply.into(),
            tool_results: Vec::new(),
            attempts,
            control: None,
            error: None,
            used_fallback: false,
        }
    }
}

/// Use case for answering one user turn (the conversation orchestrator).
///
/// Stateless across turns apart from the shared [`CredentialPool`].
pub struct RespondUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    credentials: Arc<CredentialPool>,
    resolver: TimeResolver,
    params: OrchestratorParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for RespondUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            credentials: self.credentials.clone(),
            resolver: self.resolver.clone(),
            params: self.params.clone(),
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl RespondUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
        credentials: Arc<CredentialPool>,
        resolver: TimeResolver,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            credentials,
            resolver,
            params: OrchestratorParams::default(),
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_params(mut self, params: OrchestratorParams) -> Self {
        self.params = params;
        self
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &OrchestratorParams {
        &self.params
    }

    /// Answer one turn and return only the reply text.
    pub async fn respond(&self, user_text: &str, history: &[ConversationTurn]) -> String {
        self.execute(RespondInput::new(user_text, history), &NoTurnProgress)
            .await
            .reply
    }

    /// Answer one turn with progress callbacks.
    pub async fn execute(
        &self,
        input: RespondInput<'_>,
        progress: &dyn TurnProgressNotifier,
    ) -> RespondOutput {
        if let Some(word) = ControlWord::parse(input.user_text) {
            info!(control = %word, "Control word received, skipping model");
            self.log_reply(word.acknowledgement(), 0);
            progress.on_phase(TurnPhase::Done);
            let mut output = RespondOutput::reply(word.acknowledgement(), 0);
            output.control = Some(word);
            return output;
        }

        info!("Starting turn: {}", one_line_preview(input.user_text, 100));
        self.conversation_logger.log(ConversationEvent::new(
            "user_turn",
            json!({
                "text": input.user_text,
                "history_len": input.history.len(),
            }),
        ));

        let mut state = TurnState::new();

        // ==================== Thinking ====================

        let (session, response) = match self.think(&input, &mut state, progress).await {
            Ok(pair) => pair,
            Err(error) => {
                let reply = match &error {
                    RespondError::Exhausted { .. } => {
                        AssistantPromptTemplate::service_busy().to_string()
                    }
                    RespondError::Terminal(e) => {
                        AssistantPromptTemplate::service_error(&e.to_string())
                    }
                };
                warn!(error = %error, "Turn failed during thinking phase");
                self.finish(&mut state, progress);
                self.log_reply(&reply, state.attempts());
                let mut output = RespondOutput::reply(reply, state.attempts());
                output.error = Some(error);
                return output;
            }
        };

        let requested = response.tool_calls();
        let (calls, survivor_of) =
            dedup_tool_calls_by(&requested, |call| self.tool_executor.normalize(call));
        if calls.len() < requested.len() {
            debug!(
                requested = requested.len(),
                unique = calls.len(),
                "Dropped duplicate tool calls"
            );
        }
        if calls.is_empty() {
            let text = response.text_content();
            let reply = if text.trim().is_empty() {
                warn!("Model returned neither text nor tool calls");
                AssistantPromptTemplate::empty_reply().to_string()
            } else {
                text.trim().to_string()
            };
            self.finish(&mut state, progress);
            self.log_reply(&reply, state.attempts());
            return RespondOutput::reply(reply, state.attempts());
        }

        // ==================== Acting ====================

        self.transition(&mut state, TurnPhase::ExecutingTools, progress);
        let results = self.run_tools(&calls, progress).await;

        // ==================== Summarizing ====================

        self.transition(&mut state, TurnPhase::AwaitingSummary, progress);
        let answers = answer_each_call(&requested, &survivor_of, &results);
        let summary = self
            .with_timeout(session.send_tool_results(&answers))
            .await;

        let (reply, used_fallback) = match summary {
            Ok(summary) => {
                if summary.has_tool_calls() {
                    warn!("Model requested more tools while summarizing; ignoring them");
                }
                let text = summary.text_content();
                if text.trim().is_empty() {
                    warn!("Summary was empty, falling back to raw tool results");
                    (fallback_reply(&results), true)
                } else {
                    (text.trim().to_string(), false)
                }
            }
            Err(e) => {
                // Not retried: the tools have already run.
                warn!(error = %e, "Summary call failed, falling back to raw tool results");
                (fallback_reply(&results), true)
            }
        };

        self.finish(&mut state, progress);
        self.log_reply(&reply, state.attempts());

        RespondOutput {
            reply,
            tool_results: results,
            attempts: state.attempts(),
            control: None,
            error: None,
            used_fallback,
        }
    }

    /// Retry loop around session creation and the first model call.
    async fn think(
        &self,
        input: &RespondInput<'_>,
        state: &mut TurnState,
        progress: &dyn TurnProgressNotifier,
    ) -> Result<(Box<dyn LlmSession>, LlmResponse), RespondError> {
        let spec = self.tool_executor.tool_spec();
        let system_prompt = AssistantPromptTemplate::system(
            &self.params.assistant_name,
            spec,
            self.params.speech_output,
        );
        let tools = self.tool_schema.all_tools_schema(spec);
        let max_attempts = self.params.max_attempts.max(1);
        let mut rotations = 0usize;

        loop {
            let attempt = state
                .begin_attempt()
                .map_err(|e| RespondError::Terminal(GatewayError::Other(e.to_string())))?;
            progress.on_phase(TurnPhase::AwaitingLlm);

            // Rebuilt per attempt so a slow retry still carries the right time.
            let message =
                AssistantPromptTemplate::user_message(input.user_text, &self.resolver.context_line());

            debug!(
                attempt,
                credential = self.credentials.index(),
                tools = tools.len(),
                "Calling model"
            );

            let error = match self
                .attempt(&system_prompt, input.history, &message, &tools)
                .await
            {
                Ok(pair) => return Ok(pair),
                Err(e) => e,
            };

            warn!(attempt, kind = error.kind(), error = %error, "Model call failed");
            progress.on_attempt_failed(attempt, &error);
            self.conversation_logger.log(ConversationEvent::new(
                "llm_attempt_failed",
                json!({
                    "attempt": attempt,
                    "kind": error.kind(),
                    "error": error.to_string(),
                    "credential_index": self.credentials.index(),
                }),
            ));

            if !error.is_retryable() {
                return Err(RespondError::Terminal(error));
            }

            if !state.may_retry(max_attempts) {
                return Err(give_up(attempt, error));
            }

            if error.needs_rotation() {
                // Each key is tried at most once per turn.
                if rotations + 1 >= self.credentials.len() || !self.credentials.rotate() {
                    return Err(give_up(attempt, error));
                }
                rotations += 1;
                let index = self.credentials.index();
                info!(index, rotations, "Rotated to next credential");
                progress.on_credential_rotated(index);
                self.conversation_logger.log(ConversationEvent::new(
                    "credential_rotated",
                    json!({ "index": index }),
                ));
            }
        }
    }

    async fn attempt(
        &self,
        system_prompt: &str,
        history: &[ConversationTurn],
        message: &str,
        tools: &[serde_json::Value],
    ) -> Result<(Box<dyn LlmSession>, LlmResponse), GatewayError> {
        let session = self
            .with_timeout(self.gateway.create_session(system_prompt, history))
            .await?;
        let response = self
            .with_timeout(session.send_with_tools(message, tools))
            .await?;
        Ok((session, response))
    }

    /// Execute tool calls sequentially, in the order the model listed them.
    async fn run_tools(
        &self,
        calls: &[ToolCall],
        progress: &dyn TurnProgressNotifier,
    ) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            info!(
                tool = %call.tool_name,
                args = %tool_args_preview(call),
                "Executing tool"
            );
            progress.on_tool_start(call);
            self.conversation_logger.log(ConversationEvent::new(
                "tool_call",
                json!({
                    "tool": call.tool_name,
                    "arguments": call.arguments,
                }),
            ));

            let result = self.tool_executor.execute(call).await;

            debug!(
                tool = %call.tool_name,
                success = result.is_success(),
                duration_ms = ?result.metadata.duration_ms,
                "Tool finished"
            );
            progress.on_tool_complete(&result);
            self.conversation_logger.log(ConversationEvent::new(
                "tool_result",
                json!({
                    "tool": result.tool_name,
                    "success": result.is_success(),
                    "text": result.to_prompt_text(),
                    "duration_ms": result.metadata.duration_ms,
                }),
            ));
            results.push(result);
        }
        results
    }

    async fn with_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T, GatewayError>>,
    ) -> Result<T, GatewayError> {
        match tokio::time::timeout(self.params.llm_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout),
        }
    }

    fn transition(
        &self,
        state: &mut TurnState,
        next: TurnPhase,
        progress: &dyn TurnProgressNotifier,
    ) {
        if let Err(e) = state.advance(next) {
            warn!(error = %e, "Unexpected turn transition");
            return;
        }
        progress.on_phase(next);
    }

    fn finish(&self, state: &mut TurnState, progress: &dyn TurnProgressNotifier) {
        self.transition(state, TurnPhase::Done, progress);
    }

    fn log_reply(&self, reply: &str, attempts: usize) {
        self.conversation_logger.log(ConversationEvent::new(
            "assistant_reply",
            json!({ "text": reply, "attempts": attempts }),
        ));
    }
}

/// One result per requested call, in request order. A dropped duplicate is
/// answered with its survivor's result under the name the model used.
fn answer_each_call(
    requested: &[ToolCall],
    survivor_of: &[usize],
    results: &[ToolResult],
) -> Vec<ToolResult> {
    requested
        .iter()
        .zip(survivor_of)
        .filter_map(|(call, &index)| {
            results.get(index).map(|result| {
                let mut answer = result.clone();
                answer.tool_name = call.tool_name.clone();
                answer
            })
        })
        .collect()
}

/// Outcome once no further attempt will be made. An authentication failure
/// is never reported as a busy service.
fn give_up(attempts: usize, last: GatewayError) -> RespondError {
    match last {
        GatewayError::Authentication(_) => RespondError::Terminal(last),
        _ => RespondError::Exhausted { attempts, last },
    }
}

/// Deterministic reply built from raw tool results.
fn fallback_reply(results: &[ToolResult]) -> String {
    let text = results
        .iter()
        .map(|r| r.to_prompt_text())
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    if text.trim().is_empty() {
        "Done.".to_string()
    } else {
        text
    }
}
