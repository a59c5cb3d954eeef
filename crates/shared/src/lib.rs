pub mod error;
pub mod macros;
pub mod messages;
pub mod registry;
pub mod schemas;
pub mod toolbelts;
pub mod tools;

#[doc(hidden)]
pub use {anyhow, async_trait, paste, serde_json};

pub use error::ToolError;
pub use messages::{FunctionCall, Message, Role, ToolCall};
pub use registry::ToolRegistry;
pub use schemas::{derive_schema, Annotated, ParamType, ParameterSchema, Tool, ToolSchema};
pub use toolbelts::{SearchResult, WebSearch};
pub use tools::{Callable, Parameter, Toolbelt};
