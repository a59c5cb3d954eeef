use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ToolError;
use crate::schemas::{Tool, ToolSchema, derive_schema};
use crate::tools::Callable;

/// The fixed set of callables offered to the model during a conversation.
///
/// Schemas are derived once, when the registry is built, and the name map is
/// never touched afterwards, so one registry can be shared by any number of
/// concurrent turns.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Callable>>,
    index: HashMap<String, usize>,
    schemas: Vec<ToolSchema>,
}

impl ToolRegistry {
    pub fn new(tools: impl IntoIterator<Item = Arc<dyn Callable>>) -> Result<Self, ToolError> {
        let tools: Vec<Arc<dyn Callable>> = tools.into_iter().collect();
        let mut index = HashMap::with_capacity(tools.len());
        let mut schemas = Vec::with_capacity(tools.len());

        for (position, tool) in tools.iter().enumerate() {
            let schema = derive_schema(tool.as_ref())?;
            if index.insert(schema.name.clone(), position).is_some() {
                return Err(ToolError::DuplicateTool(schema.name));
            }
            debug!(tool = %schema.name, parameters = schema.parameters.fields.len(), "registered tool");
            schemas.push(schema);
        }

        Ok(Self { tools, index, schemas })
    }

    /// Derived schemas, in registration order.
    pub fn list_schemas(&self) -> &[ToolSchema] {
        &self.schemas
    }

    /// The catalogue in the chat-completions `tools` wire format.
    pub fn get_tools(&self) -> Vec<Tool> {
        self.schemas.iter().map(|s| s.to_tool()).collect()
    }

    pub fn get_tool_schema(&self, name: &str) -> Option<&ToolSchema> {
        self.index.get(name).map(|&position| &self.schemas[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Runs the named tool with `arguments` as keyword arguments.
    ///
    /// The arguments are not checked against the tool's schema; whatever the
    /// model sent reaches the callable.
    pub async fn invoke(&self, name: &str, arguments: Map<String, Value>) -> Result<Value, ToolError> {
        let position = self
            .index
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        self.tools[*position]
            .call(arguments)
            .await
            .map_err(|source| ToolError::Execution {
                tool: name.to_string(),
                source,
            })
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.schemas.iter().map(|s| &s.name).collect::<Vec<_>>())
            .finish()
    }
}
