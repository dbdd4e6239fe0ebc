//! Function domain value objects — the error taxonomy.
//!
//! Every failure a tool call can hit is a [`FunctionError`]. None of them
//! cross the tool-call boundary as a panic: the executor renders them with
//! [`FunctionError::to_payload`] and hands them back to the model as an
//! ordinary function result.
//!
//! | Variant | Code | Raised by |
//! |---------|------|-----------|
//! | `ArgumentParse` | `ARGUMENT_PARSE` | malformed JSON / non-object payload |
//! | `UnknownFunction` | `UNKNOWN_FUNCTION` | no handler registered |
//! | `MissingParameter` | `MISSING_PARAMETER` | required argument absent |
//! | `InvalidParameterType` | `INVALID_PARAMETER_TYPE` | argument has the wrong shape |
//! | `Execution` | `EXECUTION_FAILED` | handler-specific failure |
//! | `Cancelled` | `CANCELLED` | caller cancelled the invocation |

use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FunctionError {
    #[error("Invalid arguments: {0}")]
    ArgumentParse(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid type for parameter '{name}': expected {expected}, got {actual}")]
    InvalidParameterType {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("{0}")]
    Execution(String),

    #[error("Execution cancelled")]
    Cancelled,
}

impl FunctionError {
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ArgumentParse(_) => "ARGUMENT_PARSE",
            Self::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            Self::MissingParameter(_) => "MISSING_PARAMETER",
            Self::InvalidParameterType { .. } => "INVALID_PARAMETER_TYPE",
            Self::Execution(_) => "EXECUTION_FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// `{"error": true, "message": "..."}`
    pub fn to_payload(&self) -> serde_json::Value {
        json!({
            "error": true,
            "message": self.to_string(),
        })
    }
}
