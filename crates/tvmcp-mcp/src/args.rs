//! Tool argument validation
//!
//! Arguments are checked against the tool's definition before its handler
//! runs: every required argument must be present, then every present
//! argument must parse as its declared kind. A failure becomes a text result
//! and the handler is never called.

use serde_json::{Map, Value};
use thiserror::Error;
use tvmcp_core::{ArgumentKind, ToolDefinition, ToolResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("The '{0}' parameter is required.")]
    Missing(String),

    #[error("The '{0}' parameter is required and must be an integer.")]
    NotInteger(String),

    #[error("The '{0}' parameter must be a string.")]
    NotString(String),
}

impl ArgumentError {
    pub fn into_result(self) -> ToolResult {
        ToolResult::error(self.to_string())
    }
}

/// Arguments of one invocation, already checked against the tool's schema
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    pub fn validate(definition: &ToolDefinition, values: Map<String, Value>) -> Result<Self, ArgumentError> {
        for arg in definition.arguments().iter().filter(|a| a.required) {
            if primitive_present(values.get(&arg.name)).is_none() {
                return Err(ArgumentError::Missing(arg.name.clone()));
            }
        }

        let args = Self { values };
        for arg in definition.arguments() {
            if args.values.get(&arg.name).map_or(true, Value::is_null) {
                continue;
            }
            match arg.kind {
                ArgumentKind::String => {
                    args.string(&arg.name)?;
                }
                ArgumentKind::Integer => {
                    args.integer(&arg.name)?;
                }
            }
        }
        Ok(args)
    }

    /// Textual content of a primitive argument; numbers and booleans are accepted
    pub fn string(&self, name: &str) -> Result<String, ArgumentError> {
        match primitive_present(self.values.get(name)) {
            None => Err(ArgumentError::Missing(name.to_string())),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            Some(Value::Bool(b)) => Ok(b.to_string()),
            Some(_) => Err(ArgumentError::NotString(name.to_string())),
        }
    }

    /// Integer argument, either a JSON integer or a numeric string
    pub fn integer(&self, name: &str) -> Result<i64, ArgumentError> {
        match primitive_present(self.values.get(name)) {
            None => Err(ArgumentError::NotInteger(name.to_string())),
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| ArgumentError::NotInteger(name.to_string())),
            Some(Value::String(s)) => {
                s.trim().parse::<i64>().map_err(|_| ArgumentError::NotInteger(name.to_string()))
            }
            Some(_) => Err(ArgumentError::NotInteger(name.to_string())),
        }
    }
}

fn primitive_present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tvmcp_core::ArgumentSpec;

    fn tap_definition() -> ToolDefinition {
        ToolDefinition::new("tap_screen", "Tap")
            .with_argument(ArgumentSpec::required("x", ArgumentKind::Integer, "x"))
            .with_argument(ArgumentSpec::required("y", ArgumentKind::Integer, "y"))
    }

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_numeric_strings_coerce_to_integers() {
        let args = ToolArgs::validate(&tap_definition(), map(json!({"x": "10", "y": 20}))).unwrap();
        assert_eq!(args.integer("x").unwrap(), 10);
        assert_eq!(args.integer("y").unwrap(), 20);
    }

    #[test]
    fn test_presence_is_checked_before_type() {
        // x is malformed and y is missing: the missing field is reported
        let err = ToolArgs::validate(&tap_definition(), map(json!({"x": "abc"}))).unwrap_err();
        assert_eq!(err, ArgumentError::Missing("y".into()));
    }

    #[test]
    fn test_non_integer_reports_type_error() {
        let err =
            ToolArgs::validate(&tap_definition(), map(json!({"x": "abc", "y": 1}))).unwrap_err();
        assert_eq!(err.to_string(), "The 'x' parameter is required and must be an integer.");

        let err = ToolArgs::validate(&tap_definition(), map(json!({"x": 1.5, "y": 1}))).unwrap_err();
        assert_eq!(err, ArgumentError::NotInteger("x".into()));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let def = ToolDefinition::new("type_text", "Type")
            .with_argument(ArgumentSpec::required("text", ArgumentKind::String, "text"));
        let err = ToolArgs::validate(&def, map(json!({"text": null}))).unwrap_err();
        assert_eq!(err.to_string(), "The 'text' parameter is required.");
    }

    #[test]
    fn test_string_accepts_primitive_content() {
        let def = ToolDefinition::new("send_key_event", "Key")
            .with_argument(ArgumentSpec::required("key_code", ArgumentKind::String, "code"));
        let args = ToolArgs::validate(&def, map(json!({"key_code": 66}))).unwrap();
        assert_eq!(args.string("key_code").unwrap(), "66");

        let err = ToolArgs::validate(&def, map(json!({"key_code": ["a"]}))).unwrap_err();
        assert_eq!(err, ArgumentError::NotString("key_code".into()));
    }
}
