//! Execution audit records.
//!
//! Every function executor invocation produces exactly one [`ExecutionEntry`],
//! whichever way it ends:
//!
//! ```text
//! Received ──> ParsingArguments ──> ParseFailed ───────────────┐
//!                     │                                        │
//!                     └──> Dispatching ──> HandlerNotFound ────┤
//!                               │                              ├──> Logged
//!                               └──> Invoking ──> Succeeded ───┤
//!                                         │ ├──> Failed ───────┤
//!                                         │ └──> Cancelled ────┘
//! ```
//!
//! Entries are immutable once built; [`ExecutionStats`] is derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::function::{Arguments, FunctionError};

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Succeeded { result: String },
    Failed { code: String, message: String },
    Cancelled,
}

impl ExecutionOutcome {
    pub fn from_result(result: &Result<String, FunctionError>) -> Self {
        match result {
            Ok(output) => Self::Succeeded {
                result: output.clone(),
            },
            Err(FunctionError::Cancelled) => Self::Cancelled,
            Err(e) => Self::Failed {
                code: e.code().to_string(),
                message: e.to_string(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Immutable audit record of one function-call attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEntry {
    pub timestamp: DateTime<Utc>,
    pub function_name: String,
    /// Correlation id, when the call came in as a tool call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Empty when the payload failed to parse
    pub arguments: Arguments,
    pub outcome: ExecutionOutcome,
    pub duration_ms: u64,
}

impl ExecutionEntry {
    pub fn new(
        function_name: impl Into<String>,
        tool_call_id: Option<String>,
        arguments: Arguments,
        outcome: ExecutionOutcome,
        duration_ms: u64,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            function_name: function_name.into(),
            tool_call_id,
            arguments,
            outcome,
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

/// Totals derived from a slice of execution entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: usize,
    pub average_duration_ms: f64,
}

impl ExecutionStats {
    pub fn from_entries(entries: &[ExecutionEntry]) -> Self {
        let mut stats = Self {
            total: entries.len(),
            ..Default::default()
        };
        let mut total_ms = 0u64;
        for entry in entries {
            total_ms = total_ms.saturating_add(entry.duration_ms);
            match entry.outcome {
                ExecutionOutcome::Succeeded { .. } => stats.succeeded += 1,
                ExecutionOutcome::Failed { .. } => stats.failed += 1,
                ExecutionOutcome::Cancelled => stats.cancelled += 1,
            }
        }
        if !entries.is_empty() {
            stats.average_duration_ms = total_ms as f64 / entries.len() as f64;
        }
        stats
    }

    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64
        }
    }
}
