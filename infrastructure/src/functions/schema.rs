//! JSON Schema function converter.
//!
//! Renders [`FunctionDefinition`]s in the chat-completion `tools` shape:
//!
//! ```json
//! { "type": "function",
//!   "function": { "name": "...", "description": "...",
//!                 "parameters": { "type": "object", "properties": {...}, "required": [...] } } }
//! ```

use callkit_application::FunctionRegistry;
use callkit_domain::FunctionDefinition;
use serde_json::{Map, Value, json};

/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - `"array"` → `"array"` of numbers
/// - `"object"` → `"object"`
/// - anything else → `"string"`
pub struct FunctionSchemaConverter;

impl FunctionSchemaConverter {
    pub fn function_to_schema(&self, function: &FunctionDefinition) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &function.parameters {
            let schema_type = match param.param_type.as_str() {
                "string" | "path" => "string",
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                "array" => "array",
                "object" => "object",
                _ => "string",
            };

            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(schema_type));
            prop.insert("description".to_string(), json!(param.description));
            if schema_type == "array" {
                prop.insert("items".to_string(), json!({ "type": "number" }));
            }
            if !param.allowed_values.is_empty() {
                prop.insert("enum".to_string(), json!(param.allowed_values));
            }
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "function",
            "function": {
                "name": function.name,
                "description": function.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }

    /// Every registered function, sorted by name
    pub fn registry_schema(&self, registry: &FunctionRegistry) -> Vec<Value> {
        registry
            .definitions()
            .iter()
            .map(|f| self.function_to_schema(f))
            .collect()
    }
}
