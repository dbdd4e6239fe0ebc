//! Logging infrastructure — execution audit logging.
//!
//! Provides [`JsonlExecutionLogger`], a JSONL file writer that implements
//! the [`ExecutionSink`](callkit_application::ExecutionSink) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlExecutionLogger;
