//! Domain layer for callkit
//!
//! This crate contains the core types of the function-calling pipeline.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool call**: a model-issued request to invoke a named function with
//!   JSON arguments, answered by a normalized `role = "function"` message.
//! - **Cache key**: SHA-256 over the function name and sorted argument pairs,
//!   so logically identical calls always collide.
//! - **Execution entry**: immutable audit record, exactly one per invocation.

pub mod cache;
pub mod config;
pub mod execution;
pub mod function;
pub mod util;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheStatistics, generate_key};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use execution::{ExecutionEntry, ExecutionOutcome, ExecutionStats};
pub use function::{
    Arguments, FUNCTION_ROLE, FunctionCall, FunctionDefinition, FunctionError, FunctionHandler,
    FunctionParameter, FunctionResultMessage, ToolCall,
};
