//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod cached_execution;
pub mod execute_function;
