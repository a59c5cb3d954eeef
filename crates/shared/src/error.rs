use thiserror::Error;

/// Failures raised while building or using a [`ToolRegistry`](crate::ToolRegistry).
#[derive(Debug, Error)]
pub enum ToolError {
    /// The callable exposes no parameter list to derive a schema from.
    #[error("tool '{0}' exposes no introspectable parameter list")]
    SchemaDerivation(String),

    #[error("tool '{tool}' declares parameter '{parameter}' more than once")]
    DuplicateParameter { tool: String, parameter: String },

    #[error("tool '{0}' is registered more than once")]
    DuplicateTool(String),

    #[error("tool '{0}' not found")]
    UnknownTool(String),

    /// The callable itself failed; `source` is whatever it raised.
    #[error("tool '{tool}' failed: {source}")]
    Execution {
        tool: String,
        #[source]
        source: anyhow::Error,
    },
}
