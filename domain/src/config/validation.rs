//! Structured configuration issues.
//!
//! Configuration loaders report problems as [`ConfigIssue`] values instead of
//! failing outright, so a bad value can fall back to its default with a warning.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: a default is used instead.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A numeric field must be greater than zero.
    ZeroValue { field: String },
    /// A string field holds a value outside its accepted set.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn zero_value(field: &str) -> Self {
        Self {
            severity: Severity::Warning,
            code: ConfigIssueCode::ZeroValue {
                field: field.to_string(),
            },
            message: format!("{field}: must be greater than zero, falling back to the default"),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
