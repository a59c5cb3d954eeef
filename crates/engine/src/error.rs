use thiserror::Error;
use webgpt_shared::ToolError;

/// Transport or service-side failure of a completion request.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("completion service returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("completion response contained no choices")]
    EmptyResponse,

    #[error("completion service error: {0}")]
    Service(String),
}

/// Everything that can end a turn without an answer. Nothing here is retried
/// or recovered; the caller decides what the user sees.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    CompletionService(#[from] CompletionError),

    #[error("model requested unknown tool '{0}'")]
    UnknownTool(String),

    #[error("arguments for tool '{tool}' (call {call_id}) are not a JSON object: {source}")]
    ArgumentParse {
        tool: String,
        call_id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("tool '{tool}' failed: {source}")]
    ToolExecution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },

    /// Tool calls whose ids cannot be correlated with their results.
    #[error("tool-call protocol violation: {0}")]
    ProtocolViolation(String),

    #[error(transparent)]
    Registry(ToolError),
}

impl From<ToolError> for TurnError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::UnknownTool(name) => TurnError::UnknownTool(name),
            ToolError::Execution { tool, source } => TurnError::ToolExecution { tool, source },
            other => TurnError::Registry(other),
        }
    }
}
