//! Prompt templates for the assistant turn.

use crate::schedule::{Category, ItemType};
use crate::tool::entities::ToolSpec;

/// Templates for the system instruction, the per-turn user message and the
/// fixed replies used when the model cannot be reached.
pub struct AssistantPromptTemplate;

impl AssistantPromptTemplate {
    /// System instruction listing the tools and the classification
    /// vocabularies. With `speech_output` the model is told to avoid
    /// markdown because the reply is read aloud.
    pub fn system(assistant_name: &str, tool_spec: &ToolSpec, speech_output: bool) -> String {
        let mut tools: Vec<_> = tool_spec.all().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));

        let tool_descriptions = tools
            .iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        let formatting = if speech_output {
            "Your replies are spoken aloud. Use plain sentences only: no markdown, no bullet points, no emoji, no tables."
        } else {
            "Keep replies short and plain. Avoid heavy markdown."
        };

        format!(
            r#"You are {assistant_name}, a receptionist who manages the user's calendar and task list.

Available tools:
{tool_descriptions}

Classify every new item with one item_type from: {item_types}.
Classify every new item with one category from: {categories}.

Rules:
1. Use a tool whenever the user asks to add, check, move, rename or remove something on the schedule.
2. Pass dates as "today", "tomorrow" or YYYY-MM-DD and times as written by the user, for example "3pm".
3. Never invent events. Report tool results faithfully, including failures.
4. {formatting}"#,
            item_types = ItemType::names().join(", "),
            categories = Category::names().join(", "),
        )
    }

    /// The user's text prefixed with the absolute current time.
    pub fn user_message(user_text: &str, time_context: &str) -> String {
        format!("[Current time: {}]\n{}", time_context, user_text.trim())
    }

    /// Reply when every attempt hit a transient provider failure.
    pub fn service_busy() -> &'static str {
        "Sorry, the assistant service is busy right now. Please try again in a moment."
    }

    /// Reply for failures retrying cannot fix.
    pub fn service_error(detail: &str) -> String {
        format!("Sorry, I couldn't process that request: {}", detail)
    }

    /// Reply when the model returned neither text nor tool calls.
    pub fn empty_reply() -> &'static str {
        "Sorry, I didn't catch that. Could you say it again?"
    }
}
