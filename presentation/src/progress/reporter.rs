//! Progress reporting for assistant turns

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use naomi_application::{GatewayError, TurnProgressNotifier};
use naomi_domain::{ToolCall, ToolResult, TurnPhase};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner that follows the turn phases
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Status line shown while a phase is in progress
    pub fn phase_message(phase: TurnPhase) -> Option<&'static str> {
        match phase {
            TurnPhase::AwaitingLlm => Some("Thinking..."),
            TurnPhase::ExecutingTools => Some("Working on it..."),
            TurnPhase::AwaitingSummary => Some("Summarizing..."),
            TurnPhase::Done => None,
        }
    }

    fn with_spinner(&self, f: impl FnOnce(&ProgressBar)) {
        if let Some(pb) = self.spinner.lock().unwrap_or_else(|e| e.into_inner()).as_ref() {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_phase(&self, phase: TurnPhase) {
        let mut slot = self.spinner.lock().unwrap_or_else(|e| e.into_inner());
        match Self::phase_message(phase) {
            Some(message) => {
                let pb = slot.get_or_insert_with(|| {
                    let pb = ProgressBar::new_spinner();
                    pb.set_style(Self::spinner_style());
                    pb.enable_steady_tick(Duration::from_millis(100));
                    pb
                });
                pb.set_message(message);
            }
            None => {
                if let Some(pb) = slot.take() {
                    pb.finish_and_clear();
                }
            }
        }
    }

    fn on_attempt_failed(&self, attempt: usize, error: &GatewayError) {
        self.with_spinner(|pb| {
            pb.println(format!("  {} attempt {}: {}", "!".yellow(), attempt, error));
        });
    }

    fn on_credential_rotated(&self, index: usize) {
        self.with_spinner(|pb| {
            pb.println(format!("  {} switched to API key #{}", "->".cyan(), index + 1));
        });
    }

    fn on_tool_start(&self, call: &ToolCall) {
        self.with_spinner(|pb| pb.set_message(format!("Running {}...", call.tool_name)));
    }

    fn on_tool_complete(&self, result: &ToolResult) {
        self.with_spinner(|pb| {
            let mark = if result.is_success() {
                "v".green()
            } else {
                "x".red()
            };
            pb.println(format!("  {} {}", mark, result.tool_name));
        });
    }
}

/// Plain progress lines on stderr (no spinner)
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_phase(&self, phase: TurnPhase) {
        if let Some(message) = ProgressReporter::phase_message(phase) {
            eprintln!("{} {}", "->".cyan(), message);
        }
    }

    fn on_attempt_failed(&self, attempt: usize, error: &GatewayError) {
        eprintln!("  {} attempt {}: {}", "!".yellow(), attempt, error);
    }

    fn on_tool_complete(&self, result: &ToolResult) {
        if result.is_success() {
            eprintln!("  {} {}", "v".green(), result.tool_name);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), result.tool_name);
        }
    }
}
