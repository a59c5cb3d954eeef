use std::collections::HashSet;

use crate::error::ToolError;
use crate::tools::Callable;

use super::{ParamType, ParameterSchema, ParametersSchema, ToolSchema};

pub const NO_DESCRIPTION: &str = "No description provided.";

/// Builds the schema the model sees for `callable`.
///
/// Parameters keep their declared order, every one is required and the
/// schema is strict. Types come from [`ParamType::from_annotation`]; nothing
/// about defaults, optionality or nested structure is carried over.
pub fn derive_schema(callable: &dyn Callable) -> Result<ToolSchema, ToolError> {
    let name = callable.name();
    let parameters = callable
        .parameters()
        .ok_or_else(|| ToolError::SchemaDerivation(name.to_string()))?;

    let mut seen = HashSet::new();
    let mut fields = Vec::with_capacity(parameters.len());
    for parameter in parameters {
        if !seen.insert(parameter.name.clone()) {
            return Err(ToolError::DuplicateParameter {
                tool: name.to_string(),
                parameter: parameter.name,
            });
        }
        fields.push(ParameterSchema {
            param_type: ParamType::from_annotation(parameter.annotation.as_deref()),
            name: parameter.name,
        });
    }

    let description = callable
        .doc()
        .map(str::trim)
        .filter(|doc| !doc.is_empty())
        .unwrap_or(NO_DESCRIPTION);

    Ok(ToolSchema {
        name: name.to_string(),
        description: description.to_string(),
        parameters: ParametersSchema {
            fields,
            all_required: true,
        },
        strict: true,
    })
}

impl ParamType {
    /// Maps an annotation by case-insensitive substring, first hit wins:
    /// `str`, then `int`/`float`, `bool`, `list`, `dict`; anything else,
    /// or no annotation at all, is a string.
    ///
    /// The match runs against the outermost type constructor once any
    /// `Optional[..]` wrapper is peeled off, so `List[str]` is an array and
    /// `Optional[int]` a number. When the constructor matches nothing the
    /// whole annotation is tried.
    pub fn from_annotation(annotation: Option<&str>) -> Self {
        let Some(annotation) = annotation else {
            return ParamType::String;
        };

        let lowered = annotation.to_lowercase();
        let constructor = outer_constructor(&lowered);
        match_substring(constructor)
            .or_else(|| match_substring(&lowered))
            .unwrap_or(ParamType::String)
    }
}

fn match_substring(annotation: &str) -> Option<ParamType> {
    if annotation.contains("str") {
        Some(ParamType::String)
    } else if annotation.contains("int") || annotation.contains("float") {
        Some(ParamType::Number)
    } else if annotation.contains("bool") {
        Some(ParamType::Boolean)
    } else if annotation.contains("list") {
        Some(ParamType::Array)
    } else if annotation.contains("dict") {
        Some(ParamType::Object)
    } else {
        None
    }
}

fn outer_constructor(annotation: &str) -> &str {
    let mut current = strip_module(annotation.trim());
    while let Some(inner) = unwrap_optional(current) {
        current = strip_module(inner.trim());
    }

    match current.find(['[', '<']) {
        Some(0) | None => current,
        Some(index) => &current[..index],
    }
}

fn strip_module(annotation: &str) -> &str {
    annotation.strip_prefix("typing.").unwrap_or(annotation)
}

fn unwrap_optional(annotation: &str) -> Option<&str> {
    annotation
        .strip_prefix("optional[")
        .and_then(|rest| rest.strip_suffix(']'))
        .or_else(|| {
            annotation
                .strip_prefix("option<")
                .and_then(|rest| rest.strip_suffix('>'))
        })
}
