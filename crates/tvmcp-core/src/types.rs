//! Tool catalog and invocation types

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashSet;

use crate::error::{CoreError, CoreResult};

/// Primitive type of a tool argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    String,
    Integer,
}

impl ArgumentKind {
    /// JSON Schema type name
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentKind::String => "string",
            ArgumentKind::Integer => "integer",
        }
    }
}

/// A single named argument in a tool's schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    pub kind: ArgumentKind,
    pub description: String,
    pub required: bool,
}

impl ArgumentSpec {
    pub fn required(name: impl Into<String>, kind: ArgumentKind, description: impl Into<String>) -> Self {
        Self { name: name.into(), kind, description: description.into(), required: true }
    }

    pub fn optional(name: impl Into<String>, kind: ArgumentKind, description: impl Into<String>) -> Self {
        Self { name: name.into(), kind, description: description.into(), required: false }
    }
}

/// Name, description and argument schema of one tool.
///
/// Built once at configuration time and never mutated after it is handed to
/// a registry; only read accessors are exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    name: String,
    description: String,
    arguments: Vec<ArgumentSpec>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { name: name.into(), description: description.into(), arguments: Vec::new() }
    }

    pub fn with_argument(mut self, spec: ArgumentSpec) -> Self {
        self.arguments.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Check the definition is well formed: a non-empty name and no repeated argument names
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidDefinition("tool name must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for arg in &self.arguments {
            if !seen.insert(arg.name.as_str()) {
                return Err(CoreError::InvalidDefinition(format!(
                    "tool '{}' declares argument '{}' twice",
                    self.name, arg.name
                )));
            }
        }
        Ok(())
    }

    /// JSON Schema object describing the tool's arguments
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        for arg in &self.arguments {
            properties.insert(
                arg.name.clone(),
                json!({"type": arg.kind.as_str(), "description": arg.description}),
            );
        }
        let required: Vec<&str> =
            self.arguments.iter().filter(|a| a.required).map(|a| a.name.as_str()).collect();

        let mut schema = json!({"type": "object", "properties": Value::Object(properties)});
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

/// One client call: the tool to run and its raw arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self { tool_name: tool_name.into(), arguments: Map::new() }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(name.into(), value.into());
        self
    }
}

/// A single piece of tool output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentItem {
    Text(String),
    Image { data: Vec<u8>, mime_type: String },
}

/// Structured payload returned for every invocation.
///
/// Always holds at least one content item; failures are reported as a text
/// item with `is_error` set rather than as a protocol fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    content: Vec<ContentItem>,
    is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self { content: vec![ContentItem::Text(text.into())], is_error: false }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { content: vec![ContentItem::Text(message.into())], is_error: true }
    }

    pub fn image(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Image { data, mime_type: mime_type.into() }],
            is_error: false,
        }
    }

    pub fn content(&self) -> &[ContentItem] {
        &self.content
    }

    pub fn into_content(self) -> Vec<ContentItem> {
        self.content
    }

    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Text of the first text item, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|item| match item {
            ContentItem::Text(text) => Some(text.as_str()),
            ContentItem::Image { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_schema_lists_required_arguments() {
        let def = ToolDefinition::new("tap_screen", "Tap")
            .with_argument(ArgumentSpec::required("x", ArgumentKind::Integer, "x"))
            .with_argument(ArgumentSpec::required("y", ArgumentKind::Integer, "y"));

        let schema = def.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["x"]["type"], "integer");
        assert_eq!(schema["required"], json!(["x", "y"]));
    }

    #[test]
    fn test_input_schema_without_arguments_omits_required() {
        let schema = ToolDefinition::new("take_screenshot", "Capture").input_schema();
        assert_eq!(schema["properties"], json!({}));
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_validate_rejects_repeated_argument() {
        let def = ToolDefinition::new("dup", "dup")
            .with_argument(ArgumentSpec::required("a", ArgumentKind::String, ""))
            .with_argument(ArgumentSpec::optional("a", ArgumentKind::Integer, ""));
        assert!(matches!(def.validate(), Err(CoreError::InvalidDefinition(_))));
        assert!(ToolDefinition::new(" ", "blank").validate().is_err());
    }

    #[test]
    fn test_result_constructors_never_empty() {
        assert_eq!(ToolResult::text("ok").content().len(), 1);
        let err = ToolResult::error("boom");
        assert!(err.is_error());
        assert_eq!(err.first_text(), Some("boom"));
        let img = ToolResult::image(vec![1, 2, 3], "image/png");
        assert!(img.first_text().is_none());
        assert!(!img.is_error());
    }
}
