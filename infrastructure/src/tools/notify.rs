//! Notification tool: send_notification

use super::ScheduleServices;
use naomi_application::ports::notification::NotificationOutcome;
use naomi_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

pub const SEND_NOTIFICATION: &str = "send_notification";

/// Get the tool definition for send_notification
pub fn send_notification_definition() -> ToolDefinition {
    ToolDefinition::new(
        SEND_NOTIFICATION,
        "Send a short alert message to the user by email",
    )
    .with_parameter(ToolParameter::new("message", "Text of the alert", true))
}

/// Execute the send_notification tool
pub async fn execute_send_notification(
    services: &ScheduleServices,
    call: &ToolCall,
) -> Result<String, ToolError> {
    let message = call.require_string("message").map_err(ToolError::invalid_argument)?;

    match services.notifier.send(message).await {
        Ok(NotificationOutcome::Sent) => Ok("Email sent.".to_string()),
        Ok(NotificationOutcome::NotConfigured) => Ok("Email not configured.".to_string()),
        Err(e) => Err(ToolError::execution_failed(format!("Email failed: {}", e))),
    }
}
