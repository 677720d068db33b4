//! Turn state machine.
//!
//! A turn moves from *thinking* (LLM call, retryable) to *acting* (tool
//! execution, never retried) and finally to summarizing. Once a turn has
//! left [`TurnPhase::AwaitingLlm`] it can never return there, which is what
//! keeps side-effecting tools from being re-run by a retry.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of a single conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Waiting on the model to answer or propose tool calls.
    AwaitingLlm,
    /// Running the proposed tool calls.
    ExecutingTools,
    /// Waiting on the model to summarize tool results.
    AwaitingSummary,
    /// A reply is ready.
    Done,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::AwaitingLlm => "awaiting_llm",
            TurnPhase::ExecutingTools => "executing_tools",
            TurnPhase::AwaitingSummary => "awaiting_summary",
            TurnPhase::Done => "done",
        }
    }

    /// Whether `next` is a legal successor of `self`.
    ///
    /// `AwaitingLlm -> AwaitingLlm` is the retry edge; no other phase may
    /// loop back.
    pub fn can_transition_to(&self, next: TurnPhase) -> bool {
        use TurnPhase::*;
        matches!(
            (self, next),
            (AwaitingLlm, AwaitingLlm)
                | (AwaitingLlm, ExecutingTools)
                | (AwaitingLlm, Done)
                | (ExecutingTools, AwaitingSummary)
                | (AwaitingSummary, Done)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Done)
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable progress of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnState {
    phase: TurnPhase,
    attempts: usize,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            phase: TurnPhase::AwaitingLlm,
            attempts: 0,
        }
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// LLM attempts made during the thinking phase.
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Record the start of an LLM attempt. Only valid while thinking.
    pub fn begin_attempt(&mut self) -> Result<usize, DomainError> {
        if self.phase != TurnPhase::AwaitingLlm {
            return Err(self.invalid(TurnPhase::AwaitingLlm));
        }
        self.attempts += 1;
        Ok(self.attempts)
    }

    /// Retries are only allowed before any tool has run.
    pub fn may_retry(&self, max_attempts: usize) -> bool {
        self.phase == TurnPhase::AwaitingLlm && self.attempts < max_attempts
    }

    pub fn advance(&mut self, next: TurnPhase) -> Result<(), DomainError> {
        if !self.phase.can_transition_to(next) {
            return Err(self.invalid(next));
        }
        self.phase = next;
        Ok(())
    }

    fn invalid(&self, to: TurnPhase) -> DomainError {
        DomainError::InvalidTransition {
            from: self.phase.to_string(),
            to: to.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_path() {
        let mut state = TurnState::new();
        assert_eq!(state.begin_attempt().unwrap(), 1);
        state.advance(TurnPhase::ExecutingTools).unwrap();
        state.advance(TurnPhase::AwaitingSummary).unwrap();
        state.advance(TurnPhase::Done).unwrap();
        assert!(state.phase().is_terminal());
    }

    #[test]
    fn test_no_retry_after_tools_started() {
        let mut state = TurnState::new();
        state.begin_attempt().unwrap();
        assert!(state.may_retry(3));

        state.advance(TurnPhase::ExecutingTools).unwrap();
        assert!(!state.may_retry(3));
        assert!(state.begin_attempt().is_err());
        assert!(state.advance(TurnPhase::AwaitingLlm).is_err());
    }

    #[test]
    fn test_retry_ceiling() {
        let mut state = TurnState::new();
        for _ in 0..3 {
            state.begin_attempt().unwrap();
        }
        assert!(!state.may_retry(3));
    }

    #[test]
    fn test_done_is_terminal() {
        let mut state = TurnState::new();
        state.advance(TurnPhase::Done).unwrap();
        for next in [
            TurnPhase::AwaitingLlm,
            TurnPhase::ExecutingTools,
            TurnPhase::AwaitingSummary,
            TurnPhase::Done,
        ] {
            assert!(state.advance(next).is_err());
        }
    }

    #[test]
    fn test_invalid_transition_error() {
        let mut state = TurnState::new();
        let err = state.advance(TurnPhase::AwaitingSummary).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid transition from awaiting_llm to awaiting_summary"
        );
    }
}
