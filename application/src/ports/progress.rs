//! Progress notification port
//!
//! Defines the interface for reporting progress during a turn.

use super::llm_gateway::GatewayError;
use naomi_domain::{ToolCall, ToolResult, TurnPhase};

/// Callback for progress updates during a turn
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinner, voice UI state, etc.)
pub trait TurnProgressNotifier: Send + Sync {
    /// Called whenever the turn state machine changes phase
    fn on_phase(&self, phase: TurnPhase);

    /// Called when an LLM attempt fails during the thinking phase
    fn on_attempt_failed(&self, _attempt: usize, _error: &GatewayError) {}

    /// Called after switching to another credential
    fn on_credential_rotated(&self, _index: usize) {}

    /// Called before a tool runs
    fn on_tool_start(&self, _call: &ToolCall) {}

    /// Called after a tool finishes
    fn on_tool_complete(&self, _result: &ToolResult) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {
    fn on_phase(&self, _phase: TurnPhase) {}
}
