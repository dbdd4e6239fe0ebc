//! Port for persisting execution audit records.
//!
//! The in-memory execution log forwards every appended
//! [`ExecutionEntry`] to an [`ExecutionSink`]. This is separate from
//! `tracing`-based diagnostics: tracing carries human-readable operation
//! logs, the sink captures the full audit trail in a machine-readable form
//! (JSONL in the infrastructure adapter).

use callkit_domain::ExecutionEntry;

/// Sink for execution entries.
///
/// `record` is synchronous and non-fallible so an audit failure can never
/// disturb a function call; implementations swallow their own errors.
pub trait ExecutionSink: Send + Sync {
    fn record(&self, entry: &ExecutionEntry);
}

/// No-op sink for tests and when auditing is disabled.
pub struct NoExecutionSink;

impl ExecutionSink for NoExecutionSink {
    fn record(&self, _entry: &ExecutionEntry) {}
}
