//! Orchestrator parameters for the turn loop.
//!
//! [`OrchestratorParams`] groups the static parameters that control
//! [`RespondUseCase`](crate::use_cases::respond::RespondUseCase).

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorParams {
    /// Name the assistant introduces itself with.
    pub assistant_name: String,
    /// Ask the model for speakable, markdown-free replies.
    pub speech_output: bool,
    /// Ceiling on LLM attempts during the thinking phase.
    pub max_attempts: usize,
    /// Wall-clock limit for each LLM call.
    pub llm_timeout: Duration,
}

impl Default for OrchestratorParams {
    fn default() -> Self {
        Self {
            assistant_name: "N.A.O.M.I.".to_string(),
            speech_output: true,
            max_attempts: 3,
            llm_timeout: Duration::from_secs(30),
        }
    }
}

impl OrchestratorParams {
    // ==================== Builder Methods ====================

    pub fn with_assistant_name(mut self, name: impl Into<String>) -> Self {
        self.assistant_name = name.into();
        self
    }

    pub fn with_speech_output(mut self, enabled: bool) -> Self {
        self.speech_output = enabled;
        self
    }

    /// Zero is raised to one; a turn always tries at least once.
    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    pub fn with_llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = OrchestratorParams::default();
        assert_eq!(params.max_attempts, 3);
        assert!(params.speech_output);
        assert_eq!(params.llm_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_builder() {
        let params = OrchestratorParams::default()
            .with_max_attempts(0)
            .with_assistant_name("Naomi")
            .with_llm_timeout(Duration::from_millis(50));

        assert_eq!(params.max_attempts, 1);
        assert_eq!(params.assistant_name, "Naomi");
        assert_eq!(params.llm_timeout, Duration::from_millis(50));
    }
}
