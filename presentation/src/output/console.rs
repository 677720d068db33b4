//! Console output formatter for assistant turns

use colored::Colorize;
use naomi_application::{RespondError, RespondOutput};
use naomi_domain::{ConversationTurn, Role, ToolResult};
use serde_json::json;

/// Formats turn results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// The reply alone, prefixed with the assistant's name
    pub fn format_reply(name: &str, output: &RespondOutput) -> String {
        let label = format!("{}:", name);
        let label = if output.error.is_some() {
            label.red().bold()
        } else {
            label.green().bold()
        };
        format!("{} {}", label, output.reply)
    }

    /// Reply followed by every tool that ran and any thinking-phase error
    pub fn format_full(name: &str, output: &RespondOutput) -> String {
        let mut text = Self::format_reply(name, output);

        if !output.tool_results.is_empty() {
            text.push_str(&Self::section_header("Tools"));
            for result in &output.tool_results {
                text.push_str(&Self::format_tool_result(result));
                text.push('\n');
            }
        }

        if let Some(error) = &output.error {
            text.push_str(&Self::section_header("Error"));
            text.push_str(&Self::format_error(error));
            text.push('\n');
        }

        if output.used_fallback {
            text.push_str(&format!(
                "\n{}\n",
                "(summary unavailable, showing raw tool results)".dimmed()
            ));
        }
        text
    }

    /// One line per tool: status mark, name, then its prose output indented
    pub fn format_tool_result(result: &ToolResult) -> String {
        let mark = if result.is_success() {
            "v".green()
        } else {
            "x".red()
        };
        let name = match &result.metadata.resolved_name {
            Some(canonical) => format!("{} ({})", result.tool_name, canonical),
            None => result.tool_name.clone(),
        };
        let timing = result
            .metadata
            .duration_ms
            .map(|ms| format!(" {}ms", ms).dimmed().to_string())
            .unwrap_or_default();

        format!(
            "{} {}{}\n{}",
            mark,
            name.bold(),
            timing,
            Self::indent(&result.to_prompt_text(), "    ")
        )
    }

    fn format_error(error: &RespondError) -> String {
        match error {
            RespondError::Exhausted { attempts, last } => format!(
                "{} after {} attempt(s): {}",
                "Gave up".yellow(),
                attempts,
                last
            ),
            RespondError::Terminal(e) => format!("{} {}", "Failed:".red(), e),
        }
    }

    /// Machine-readable rendering of a turn
    pub fn format_json(output: &RespondOutput) -> String {
        let value = json!({
            "reply": output.reply,
            "tool_results": output.tool_results,
            "attempts": output.attempts,
            "control": output.control.map(|c| c.as_str()),
            "error": output.error.as_ref().map(|e| e.to_string()),
            "used_fallback": output.used_fallback,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
    }

    /// Conversation history for the `/history` command
    pub fn format_history(name: &str, history: &[ConversationTurn]) -> String {
        if history.is_empty() {
            return "No conversation yet.".dimmed().to_string();
        }

        let mut text = Self::header("Conversation");
        text.push('\n');
        for turn in history {
            let who = match turn.role {
                Role::User => "You:".cyan().bold(),
                Role::Assistant => format!("{}:", name).green().bold(),
            };
            text.push_str(&format!("{} {}\n", who, turn.content));
        }
        text
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use naomi_application::GatewayError;
    use naomi_domain::ToolError;

    fn output(reply: &str) -> RespondOutput {
        RespondOutput {
            reply: reply.to_string(),
            tool_results: vec![
                ToolResult::success("add_event", "Added 'Gym' on Monday")
                    .with_resolved_name("add_to_schedule"),
                ToolResult::failure("launch_rocket", ToolError::tool_not_found("launch_rocket")),
            ],
            attempts: 1,
            control: None,
            error: None,
            used_fallback: false,
        }
    }

    #[test]
    fn test_full_lists_tools() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_full("N.A.O.M.I.", &output("Done."));
        assert!(text.starts_with("N.A.O.M.I.: Done."));
        assert!(text.contains("v add_event (add_to_schedule)"));
        assert!(text.contains("    Added 'Gym' on Monday"));
        assert!(text.contains("x launch_rocket"));
    }

    #[test]
    fn test_json_shape() {
        let mut out = output("Busy.");
        out.error = Some(RespondError::Exhausted {
            attempts: 3,
            last: GatewayError::RateLimited("quota".to_string()),
        });
        let value: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_json(&out)).unwrap();
        assert_eq!(value["reply"], "Busy.");
        assert_eq!(value["attempts"], 3);
        assert_eq!(value["tool_results"].as_array().unwrap().len(), 2);
        assert!(value["error"].as_str().unwrap().contains("3 attempt(s)"));
        assert!(value["control"].is_null());
    }

    #[test]
    fn test_history() {
        colored::control::set_override(false);
        let history = vec![
            ConversationTurn::user("Add gym"),
            ConversationTurn::assistant("Added."),
        ];
        let text = ConsoleFormatter::format_history("Naomi", &history);
        assert!(text.contains("You: Add gym\n"));
        assert!(text.contains("Naomi: Added.\n"));
        assert_eq!(
            ConsoleFormatter::format_history("Naomi", &[]),
            "No conversation yet."
        );
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
