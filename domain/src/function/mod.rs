//! Function domain module
//!
//! Core abstractions for **function calling**: how a model-issued tool call
//! becomes a handler invocation and a normalized result message.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────────────┐
//! │ ToolCall     │───▶│ Arguments    │───▶│ FunctionHandler      │
//! │ (id, name,   │    │ (typed       │    │ (registered by name) │
//! │  JSON args)  │    │  accessors)  │    └──────────┬───────────┘
//! └──────────────┘    └──────────────┘               │
//!                                                    ▼
//!                                     ┌──────────────────────────┐
//!                                     │ FunctionResultMessage    │
//!                                     │ role = "function"        │
//!                                     │ content = JSON / error   │
//!                                     └──────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolCall`] — wire-shaped request (`id`, `function.name`, `function.arguments`)
//! - [`Arguments`] — decoded argument object with `require_*` / `get_*` accessors
//! - [`FunctionHandler`] — async trait implemented by every function
//! - [`FunctionError`] — error taxonomy, rendered as `{"error": true, "message": ...}`
//! - [`FunctionResultMessage`] — uniform output for success and failure
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application**: registry, executor and cached executor
//! - **Infrastructure**: built-in handlers

pub mod arguments;
pub mod entities;
pub mod handler;
pub mod value_objects;

pub use arguments::Arguments;
pub use entities::{
    FUNCTION_ROLE, FunctionCall, FunctionDefinition, FunctionParameter, FunctionResultMessage,
    ToolCall,
};
pub use handler::FunctionHandler;
pub use value_objects::FunctionError;
