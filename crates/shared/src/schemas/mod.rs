// crates/shared/src/schemas
mod annotated;
mod derive;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

pub use annotated::Annotated;
pub use derive::{NO_DESCRIPTION, derive_schema};

/// JSON-schema type of a tool argument.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ParameterSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParamType,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ParametersSchema {
    /// In declaration order.
    pub fields: Vec<ParameterSchema>,
    pub all_required: bool,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: ParametersSchema,
    pub strict: bool,
}

/// A tool in the chat-completions `tools` wire format.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    pub strict: bool,
}

impl ToolSchema {
    pub fn to_tool(&self) -> Tool {
        let mut properties = Map::new();
        let mut required = vec![];

        for field in &self.parameters.fields {
            properties.insert(field.name.clone(), json!({ "type": field.param_type.as_str() }));
            if self.parameters.all_required {
                required.push(field.name.clone());
            }
        }

        Tool {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": !self.strict
                }),
                strict: self.strict,
            },
        }
    }
}
