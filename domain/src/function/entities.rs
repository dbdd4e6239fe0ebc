//! Function domain entities

use serde::{Deserialize, Serialize};

use super::arguments::Arguments;
use super::value_objects::FunctionError;

/// Role attached to every normalized function result message.
pub const FUNCTION_ROLE: &str = "function";

/// Definition of a function that handlers expose to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Unique name of the function (e.g., "calculate")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<FunctionParameter>,
}

/// Parameter specification for a function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint ("string", "number", "integer", "boolean", "array", "object")
    pub param_type: String,
    /// Allowed values, if the parameter is an enumeration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl FunctionDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: FunctionParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &FunctionParameter> {
        self.parameters.iter().filter(|p| p.required)
    }
}

impl FunctionParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            allowed_values: Vec::new(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }
}

fn default_call_type() -> String {
    "function".to_string()
}

/// The function half of a tool call: a name plus JSON-encoded arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function to invoke
    pub name: String,
    /// Raw JSON object text, exactly as the model produced it
    pub arguments: String,
}

/// A model-issued request to invoke a named function.
///
/// Mirrors the chat-completion wire shape:
///
/// ```json
/// { "id": "call_1", "type": "function",
///   "function": { "name": "get_weather", "arguments": "{\"location\":\"SF\"}" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation identifier echoed back in the result message
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl ToolCall {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            call_type: default_call_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    /// Build a tool call whose argument payload is the JSON form of `arguments`.
    pub fn with_arguments(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: &Arguments,
    ) -> Self {
        Self::new(id, name, arguments.to_json_string())
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Decode the argument payload.
    ///
    /// Blank payloads are treated as `{}`; anything that is not a JSON
    /// object is an [`FunctionError::ArgumentParse`].
    pub fn parse_arguments(&self) -> Result<Arguments, FunctionError> {
        Arguments::from_json_str(&self.function.arguments)
    }
}

/// Normalized message fed back into the chat history.
///
/// Success and failure share this shape; only `content` differs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResultMessage {
    pub role: String,
    pub name: String,
    pub tool_call_id: String,
    /// JSON text: the handler output, or `{"error": true, "message": "..."}`
    pub content: String,
}

impl FunctionResultMessage {
    pub fn success(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        output: &str,
    ) -> Self {
        Self {
            role: FUNCTION_ROLE.to_string(),
            name: name.into(),
            tool_call_id: tool_call_id.into(),
            content: normalize_output(output),
        }
    }

    pub fn failure(
        name: impl Into<String>,
        tool_call_id: impl Into<String>,
        error: &FunctionError,
    ) -> Self {
        Self {
            role: FUNCTION_ROLE.to_string(),
            name: name.into(),
            tool_call_id: tool_call_id.into(),
            content: error.to_payload().to_string(),
        }
    }

    /// Whether `content` is an error payload.
    pub fn is_error(&self) -> bool {
        serde_json::from_str::<serde_json::Value>(&self.content)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_bool()))
            .unwrap_or(false)
    }
}

/// Handler output that already is JSON passes through untouched; plain text
/// is wrapped as a JSON string so `content` is always parseable.
pub fn normalize_output(output: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(output) {
        Ok(_) => output.to_string(),
        Err(_) => serde_json::Value::String(output.to_string()).to_string(),
    }
}
