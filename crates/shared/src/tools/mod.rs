use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A declared parameter of a callable: its name and the text of its type
/// annotation, if it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub annotation: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, annotation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation.into()),
        }
    }

    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
        }
    }
}

/// A function the model may ask to run.
///
/// `parameters` returns `None` when the callable cannot describe its own
/// signature; such a callable cannot be registered.
#[async_trait]
pub trait Callable: Send + Sync {
    fn name(&self) -> &str;

    fn doc(&self) -> Option<&str> {
        None
    }

    fn parameters(&self) -> Option<Vec<Parameter>>;

    /// Runs the callable with keyword-style arguments. Arguments are passed
    /// through as received; nothing checks them against the declared
    /// parameters first.
    async fn call(&self, arguments: Map<String, Value>) -> Result<Value>;
}

/// A group of callables sharing one piece of state, usually generated by
/// [`register_toolbelt!`](crate::register_toolbelt).
pub trait Toolbelt: Send + Sync + 'static {
    fn tools(self: Arc<Self>) -> Vec<Arc<dyn Callable>>;
}

/// Pulls one keyword argument out of the map. A missing key decodes as
/// `null`, so `Option` parameters may be omitted.
///
/// Integer parameters are advertised as `number`, so a whole float such as
/// `5.0` is accepted where an integer is expected.
#[doc(hidden)]
pub fn decode_argument<T: DeserializeOwned>(arguments: &Map<String, Value>, name: &str) -> Result<T> {
    let value = arguments.get(name).cloned().unwrap_or(Value::Null);
    let decoded = serde_json::from_value(value.clone()).or_else(|err| match whole_floats_as_integers(value) {
        Some(narrowed) => serde_json::from_value(narrowed),
        None => Err(err),
    });
    decoded.with_context(|| format!("invalid argument '{name}'"))
}

/// Rewrites every float without a fractional part as an integer. `None` when
/// nothing changed.
fn whole_floats_as_integers(value: Value) -> Option<Value> {
    fn narrow(value: Value, changed: &mut bool) -> Value {
        match value {
            Value::Number(n) if n.is_f64() => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    *changed = true;
                    Value::from(f as i64)
                }
                _ => Value::Number(n),
            },
            Value::Array(items) => Value::Array(items.into_iter().map(|v| narrow(v, changed)).collect()),
            Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, narrow(v, changed))).collect()),
            other => other,
        }
    }

    let mut changed = false;
    let narrowed = narrow(value, &mut changed);
    changed.then_some(narrowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn arguments(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn missing_optional_argument_decodes_to_none() {
        let args = arguments(json!({ "query": "rust" }));
        let max: Option<i64> = decode_argument(&args, "max_results").unwrap();
        assert_eq!(max, None);
    }

    #[test]
    fn whole_floats_decode_as_integers() {
        let args = arguments(json!({ "max_results": 5.0, "pages": [1.0, 2.0] }));

        let max: Option<i64> = decode_argument(&args, "max_results").unwrap();
        assert_eq!(max, Some(5));
        let pages: Vec<u32> = decode_argument(&args, "pages").unwrap();
        assert_eq!(pages, [1, 2]);
        let exact: f64 = decode_argument(&args, "max_results").unwrap();
        assert_eq!(exact, 5.0);
    }

    #[test]
    fn fractional_floats_are_still_rejected_for_integers() {
        let args = arguments(json!({ "max_results": 5.5 }));
        let err = decode_argument::<Option<i64>>(&args, "max_results").unwrap_err();
        assert!(err.to_string().contains("'max_results'"));
    }

    #[test]
    fn mistyped_argument_names_the_parameter() {
        let args = arguments(json!({ "query": 42 }));
        let err = decode_argument::<String>(&args, "query").unwrap_err();
        assert!(err.to_string().contains("'query'"));
    }
}
