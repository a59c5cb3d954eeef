mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use webgpt_shared::{Message, Role, Tool, ToolCall};

use crate::error::CompletionError;

pub use openai::OpenAiClient;

#[derive(Serialize, Clone, Debug)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f64,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
}

/// The single choice a completion returns: either text, or a request to run
/// tools (possibly with some text alongside).
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct CompletionChoice {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl CompletionChoice {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: None,
        }
    }

    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls: Some(calls),
        }
    }

    /// Requested tool calls; empty when the choice is a plain answer.
    pub fn requested_tools(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }

    /// The choice as the assistant message to fold back into a conversation,
    /// tool-call metadata included.
    pub fn into_message(self) -> Message {
        Message {
            role: Role::Assistant,
            content: self.content,
            tool_calls: self.tool_calls,
            tool_call_id: None,
        }
    }
}

/// A chat-completions backend.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionChoice, CompletionError>;
}
