//! Execute Function use case.
//!
//! Turns a [`ToolCall`] into a [`FunctionResultMessage`]:
//!
//! 1. Decode the argument payload. Failure → `ArgumentParse`, no handler runs.
//! 2. Resolve the handler by name. Absent → `UnknownFunction`.
//! 3. Invoke the handler. Errors (missing/mistyped parameters, handler
//!    failures, panics, cancellation) become error results.
//! 4. Append exactly one [`ExecutionEntry`] with the elapsed time.
//!
//! The returned message always has `role = "function"`, the original name
//! and correlation id, and JSON content, so callers can feed it straight
//! back into a chat history.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use callkit_domain::{
    Arguments, ExecutionEntry, ExecutionOutcome, FunctionError, FunctionResultMessage, ToolCall,
    util::preview,
};
use futures::FutureExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::execution_log::ExecutionLog;
use crate::registry::FunctionRegistry;

pub struct FunctionExecutor {
    registry: Arc<FunctionRegistry>,
    log: Arc<ExecutionLog>,
}

impl FunctionExecutor {
    pub fn new(registry: Arc<FunctionRegistry>, log: Arc<ExecutionLog>) -> Self {
        Self { registry, log }
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    pub fn log(&self) -> &Arc<ExecutionLog> {
        &self.log
    }

    /// Execute a tool call. Never fails: errors come back as error payloads.
    pub async fn execute(&self, call: &ToolCall) -> FunctionResultMessage {
        self.execute_tool_call(call, None).await
    }

    /// Execute a tool call that `token` may cancel mid-flight.
    ///
    /// A cancelled call is logged with outcome `Cancelled`.
    pub async fn execute_with_cancellation(
        &self,
        call: &ToolCall,
        token: &CancellationToken,
    ) -> FunctionResultMessage {
        self.execute_tool_call(call, Some(token)).await
    }

    /// Invoke a function with already-decoded arguments.
    pub async fn invoke(&self, name: &str, args: &Arguments) -> Result<String, FunctionError> {
        self.run(name, None, args, None).await
    }

    /// Resolve, invoke and log one call.
    ///
    /// This is the single place an [`ExecutionEntry`] is appended for a
    /// decoded call, so every path through it logs exactly once.
    pub async fn run(
        &self,
        name: &str,
        tool_call_id: Option<&str>,
        args: &Arguments,
        token: Option<&CancellationToken>,
    ) -> Result<String, FunctionError> {
        let started = Instant::now();
        let result = self.dispatch(name, args, token).await;
        self.record(name, tool_call_id, args.clone(), &result, started);
        result
    }

    async fn execute_tool_call(
        &self,
        call: &ToolCall,
        token: Option<&CancellationToken>,
    ) -> FunctionResultMessage {
        let started = Instant::now();
        let name = call.name();

        let result = match call.parse_arguments() {
            Ok(args) => {
                let result = self.dispatch(name, &args, token).await;
                self.record(name, Some(&call.id), args, &result, started);
                result
            }
            Err(e) => {
                let result = Err(e);
                self.record(name, Some(&call.id), Arguments::new(), &result, started);
                result
            }
        };

        match result {
            Ok(output) => FunctionResultMessage::success(name, &call.id, &output),
            Err(e) => FunctionResultMessage::failure(name, &call.id, &e),
        }
    }

    async fn dispatch(
        &self,
        name: &str,
        args: &Arguments,
        token: Option<&CancellationToken>,
    ) -> Result<String, FunctionError> {
        let Some(handler) = self.registry.resolve(name) else {
            return Err(FunctionError::UnknownFunction(name.to_string()));
        };

        debug!(function = %name, args = %preview(&args.to_json_string(), 200), "Invoking function");

        let invocation = AssertUnwindSafe(handler.call(args)).catch_unwind();
        let outcome = match token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(FunctionError::Cancelled),
                    outcome = invocation => outcome,
                }
            }
            None => invocation.await,
        };

        outcome.unwrap_or_else(|panic| {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(FunctionError::execution(format!(
                "Function '{name}' panicked: {message}"
            )))
        })
    }

    fn record(
        &self,
        name: &str,
        tool_call_id: Option<&str>,
        args: Arguments,
        result: &Result<String, FunctionError>,
        started: Instant,
    ) {
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(_) => info!(function = %name, duration_ms, "Function succeeded"),
            Err(FunctionError::Cancelled) => info!(function = %name, duration_ms, "Function cancelled"),
            Err(e) => warn!(function = %name, duration_ms, code = e.code(), error = %e, "Function failed"),
        }

        self.log.append(ExecutionEntry::new(
            name,
            tool_call_id.map(str::to_string),
            args,
            ExecutionOutcome::from_result(result),
            duration_ms,
        ));
    }
}
