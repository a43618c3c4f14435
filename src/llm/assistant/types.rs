// src/llm/assistant/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message role in a thread
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Request type for creating an assistant
#[derive(Serialize, Debug, Clone)]
pub struct CreateAssistantRequest {
    pub model: String,
    pub name: Option<String>,
    pub instructions: Option<String>,
    pub tools: Vec<AssistantTool>,
}

/// A tool declared on an assistant
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum AssistantTool {
    #[serde(rename = "function")]
    Function { function: FunctionDefinition },
}

/// Name, description and JSON schema of a callable function
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AssistantObject {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThreadObject {
    pub id: String,
}

/// Request to create a message in a thread
#[derive(Serialize, Debug, Clone)]
pub struct CreateMessageRequest {
    pub role: MessageRole,
    pub content: String,
}

/// A message in a thread
#[derive(Deserialize, Debug, Clone)]
pub struct MessageObject {
    pub id: String,
    pub role: MessageRole,
    pub content: Vec<MessageContent>,
}

impl MessageObject {
    /// First text block of the message, if any
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find_map(|c| c.text.as_ref().map(|t| t.value.as_str()))
    }
}

/// Content within a message
#[derive(Deserialize, Debug, Clone)]
pub struct MessageContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: Option<TextContent>,
}

/// Text content details
#[derive(Deserialize, Debug, Clone)]
pub struct TextContent {
    pub value: String,
    #[serde(default)]
    pub annotations: Vec<serde_json::Value>,
}

/// List messages response
#[derive(Deserialize, Debug)]
pub struct ListMessagesResponse {
    pub data: Vec<MessageObject>,
    #[serde(default)]
    pub has_more: bool,
}

/// Request to create a run
#[derive(Serialize, Debug, Clone)]
pub struct CreateRunRequest {
    pub assistant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Run status values
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Queued => "queued",
            RunStatus::InProgress => "in_progress",
            RunStatus::RequiresAction => "requires_action",
            RunStatus::Cancelling => "cancelling",
            RunStatus::Cancelled => "cancelled",
            RunStatus::Failed => "failed",
            RunStatus::Completed => "completed",
            RunStatus::Incomplete => "incomplete",
            RunStatus::Expired => "expired",
            RunStatus::Unknown => "unknown",
        }
    }

    /// Terminal statuses other than `completed`
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            RunStatus::Cancelled | RunStatus::Failed | RunStatus::Incomplete | RunStatus::Expired
        )
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A run as returned by create/retrieve/submit
#[derive(Deserialize, Debug, Clone)]
pub struct RunObject {
    pub id: String,
    pub thread_id: String,
    #[serde(default)]
    pub assistant_id: Option<String>,
    pub status: RunStatus,
    #[serde(default)]
    pub required_action: Option<RequiredAction>,
    #[serde(default)]
    pub last_error: Option<RunError>,
}

impl RunObject {
    /// Tool calls pending in this run's `requires_action` payload
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.required_action
            .as_ref()
            .map(|a| a.submit_tool_outputs.tool_calls.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RunError {
    pub code: String,
    pub message: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RequiredAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubmitToolOutputs {
    pub tool_calls: Vec<ToolCall>,
}

/// Tool call requested by a run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_tool_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

fn default_tool_type() -> String {
    "function".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    /// JSON string of arguments
    pub arguments: String,
}

/// Output answering one tool call
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub tool_call_id: String,
    pub output: String,
}

#[derive(Serialize, Debug)]
pub struct SubmitToolOutputsRequest<'a> {
    pub tool_outputs: &'a [ToolOutput],
}

/// One recorded step of a run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStep {
    pub id: String,
    #[serde(rename = "type")]
    pub step_type: String,
    pub status: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub step_details: serde_json::Value,
}

#[derive(Deserialize, Debug)]
pub struct ListRunStepsResponse {
    pub data: Vec<RunStep>,
    #[serde(default)]
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requires_action_run_decodes_tool_calls() {
        let run: RunObject = serde_json::from_value(json!({
            "id": "run_1",
            "object": "thread.run",
            "thread_id": "thread_1",
            "assistant_id": "asst_1",
            "status": "requires_action",
            "required_action": {
                "type": "submit_tool_outputs",
                "submit_tool_outputs": {
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "get_news", "arguments": "{\"topic\":\"bitcoin\"}" }
                    }]
                }
            },
            "last_error": null
        }))
        .unwrap();

        assert_eq!(run.status, RunStatus::RequiresAction);
        assert_eq!(run.pending_tool_calls().len(), 1);
        assert_eq!(run.pending_tool_calls()[0].function.name, "get_news");
    }

    #[test]
    fn test_unrecognised_status_decodes_as_unknown() {
        let status: RunStatus = serde_json::from_value(json!("paused_for_review")).unwrap();
        assert_eq!(status, RunStatus::Unknown);
    }

    #[test]
    fn test_failure_statuses() {
        assert!(RunStatus::Failed.is_failure());
        assert!(RunStatus::Expired.is_failure());
        assert!(RunStatus::Incomplete.is_failure());
        assert!(!RunStatus::Completed.is_failure());
        assert!(!RunStatus::Cancelling.is_failure());
    }

    #[test]
    fn test_message_text_skips_non_text_blocks() {
        let message: MessageObject = serde_json::from_value(json!({
            "id": "msg_1",
            "role": "assistant",
            "content": [
                { "type": "image_file", "image_file": { "file_id": "f" } },
                { "type": "text", "text": { "value": "Bitcoin rallied.", "annotations": [] } }
            ]
        }))
        .unwrap();
        assert_eq!(message.text(), Some("Bitcoin rallied."));
    }

    #[test]
    fn test_function_tool_serializes_with_type_tag() {
        let tool = AssistantTool::Function {
            function: FunctionDefinition {
                name: "get_news".to_string(),
                description: "news".to_string(),
                parameters: json!({ "type": "object" }),
            },
        };
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "get_news");
    }
}
