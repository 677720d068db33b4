//! Shared helpers for tool use cases.

use naomi_domain::tool::entities::ToolCall;

/// Extract a short preview string from tool call arguments.
///
/// Looks for well-known keys (`summary`, `keyword`, `message`, `date`)
/// first, then falls back to the first string value found.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["summary", "keyword", "message", "date"];
    for key in &keys {
        if let Some(serde_json::Value::String(s)) = call.arguments.get(*key) {
            return truncate_preview(s, 50);
        }
    }
    // Fallback: first string value, in key order for stable logs
    let mut keys: Vec<_> = call.arguments.keys().collect();
    keys.sort();
    for key in keys {
        if let Some(s) = call.arguments.get(key).and_then(|v| v.as_str()) {
            return truncate_preview(s, 50);
        }
    }
    String::new()
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
