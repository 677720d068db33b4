//! Wire types for `models/{model}:generateContent`.

use naomi_domain::{ContentBlock, ConversationTurn, LlmResponse, Role, StopReason};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclarations>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclarations {
    pub function_declarations: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part::text(text)],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    pub fn from_turn(turn: &ConversationTurn) -> Self {
        let role = match turn.role {
            Role::User => "user",
            Role::Assistant => "model",
        };
        Self {
            role: Some(role.to_string()),
            parts: vec![Part::text(turn.content.clone())],
        }
    }

    /// Function calls in this content, in order.
    pub fn function_calls(&self) -> impl Iterator<Item = &FunctionCall> {
        self.parts.iter().filter_map(|p| p.function_call.as_ref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    /// Opaque signature some models attach to calls; echoed back verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_response(name: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            function_response: Some(FunctionResponse {
                name: name.into(),
                response: serde_json::json!({ "result": result.into() }),
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Convert a provider-neutral tool schema (`name`, `description`,
/// `input_schema`) into a Gemini function declaration.
pub fn function_declaration(schema: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "name": schema["name"],
        "description": schema["description"],
        "parameters": schema["input_schema"],
    })
}

/// Translate a candidate into an [`LlmResponse`].
pub fn to_llm_response(content: &Content, finish_reason: Option<&str>, model: Option<String>) -> LlmResponse {
    let mut blocks = Vec::new();
    for part in &content.parts {
        if let Some(text) = &part.text {
            blocks.push(ContentBlock::Text(text.clone()));
        }
        if let Some(call) = &part.function_call {
            let input: HashMap<String, serde_json::Value> = match &call.args {
                serde_json::Value::Object(map) => {
                    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
                }
                _ => HashMap::new(),
            };
            blocks.push(ContentBlock::ToolUse {
                name: call.name.clone(),
                input,
            });
        }
    }

    let has_calls = content.function_calls().next().is_some();
    let stop_reason = match finish_reason {
        _ if has_calls => Some(StopReason::ToolUse),
        Some("STOP") => Some(StopReason::EndTurn),
        Some("MAX_TOKENS") => Some(StopReason::MaxTokens),
        Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
            Some(StopReason::Safety)
        }
        Some(other) => Some(StopReason::Other(other.to_lowercase())),
        None => None,
    };

    LlmResponse {
        content: blocks,
        stop_reason,
        model,
    }
}
