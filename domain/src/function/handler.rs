//! Function handler abstraction
//!
//! A [`FunctionHandler`] implements one tool's behavior. Handlers are held by
//! the function registry for the lifetime of the process and keep no state
//! between invocations.
//!
//! # Example
//!
//! ```ignore
//! struct Echo;
//!
//! #[async_trait]
//! impl FunctionHandler for Echo {
//!     fn definition(&self) -> FunctionDefinition {
//!         FunctionDefinition::new("echo", "Echo the text back")
//!             .with_parameter(FunctionParameter::new("text", "Text to echo", true))
//!     }
//!
//!     async fn call(&self, args: &Arguments) -> Result<String, FunctionError> {
//!         Ok(args.require_str("text")?.to_string())
//!     }
//! }
//! ```

use async_trait::async_trait;

use super::arguments::Arguments;
use super::entities::FunctionDefinition;
use super::value_objects::FunctionError;

#[async_trait]
pub trait FunctionHandler: Send + Sync {
    /// Name, description and parameters of the function
    fn definition(&self) -> FunctionDefinition;

    /// Run the function. May suspend for I/O.
    async fn call(&self, args: &Arguments) -> Result<String, FunctionError>;
}
