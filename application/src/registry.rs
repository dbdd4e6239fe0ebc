//! Function Registry
//!
//! The [`FunctionRegistry`] maps function names to [`FunctionHandler`]s.
//! Built-in handlers are registered once at startup; callers may add or
//! replace handlers at runtime through a shared reference.
//!
//! # Usage
//!
//! ```ignore
//! let registry = FunctionRegistry::new()
//!     .with(Calculate)
//!     .with(TransformText);
//!
//! // Runtime extension (last registration wins)
//! registry.register(MyCustomFunction);
//!
//! let handler = registry.resolve("calculate").expect("registered");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use callkit_domain::{FunctionDefinition, FunctionHandler};
use parking_lot::RwLock;

/// Name → handler map with interior mutability.
#[derive(Default)]
pub struct FunctionRegistry {
    handlers: RwLock<HashMap<String, Arc<dyn FunctionHandler>>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler (builder pattern)
    pub fn with<H: FunctionHandler + 'static>(self, handler: H) -> Self {
        self.register(handler);
        self
    }

    /// Register a handler under its definition's name.
    ///
    /// Returns the handler it replaced, if any.
    pub fn register<H: FunctionHandler + 'static>(
        &self,
        handler: H,
    ) -> Option<Arc<dyn FunctionHandler>> {
        self.register_arc(Arc::new(handler))
    }

    /// Register a handler (Arc version)
    pub fn register_arc(&self, handler: Arc<dyn FunctionHandler>) -> Option<Arc<dyn FunctionHandler>> {
        let name = handler.definition().name;
        self.register_as(name, handler)
    }

    /// Register a handler under an explicit name, e.g. an alias.
    pub fn register_as(
        &self,
        name: impl Into<String>,
        handler: Arc<dyn FunctionHandler>,
    ) -> Option<Arc<dyn FunctionHandler>> {
        let name = name.into();
        let previous = self.handlers.write().insert(name.clone(), handler);
        if previous.is_some() {
            tracing::debug!(function = %name, "Replaced registered function");
        } else {
            tracing::debug!(function = %name, "Registered function");
        }
        previous
    }

    /// Remove a handler, returning it if it was registered
    pub fn unregister(&self, name: &str) -> Option<Arc<dyn FunctionHandler>> {
        self.handlers.write().remove(name)
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn FunctionHandler>> {
        self.handlers.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions of every registered handler, sorted by registered name.
    ///
    /// Handlers registered under an alias report the alias as their name.
    pub fn definitions(&self) -> Vec<FunctionDefinition> {
        let handlers = self.handlers.read();
        let mut definitions: Vec<FunctionDefinition> = handlers
            .iter()
            .map(|(name, handler)| {
                let mut definition = handler.definition();
                definition.name = name.clone();
                definition
            })
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use callkit_domain::{Arguments, FunctionError};

    struct Constant {
        name: &'static str,
        value: &'static str,
    }

    #[async_trait]
    impl FunctionHandler for Constant {
        fn definition(&self) -> FunctionDefinition {
            FunctionDefinition::new(self.name, "Returns a constant")
        }

        async fn call(&self, _args: &Arguments) -> Result<String, FunctionError> {
            Ok(self.value.to_string())
        }
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let registry = FunctionRegistry::new().with(Constant {
            name: "one",
            value: "1",
        });

        let handler = registry.resolve("one").unwrap();
        assert_eq!(handler.call(&Arguments::new()).await.unwrap(), "1");
        assert!(registry.resolve("two").is_none());
        assert!(registry.contains("one"));
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let registry = FunctionRegistry::new();
        assert!(
            registry
                .register(Constant {
                    name: "answer",
                    value: "41",
                })
                .is_none()
        );
        let replaced = registry.register(Constant {
            name: "answer",
            value: "42",
        });

        assert!(replaced.is_some());
        assert_eq!(registry.len(), 1);
        let handler = registry.resolve("answer").unwrap();
        assert_eq!(handler.call(&Arguments::new()).await.unwrap(), "42");
    }

    #[test]
    fn test_register_as_alias() {
        let registry = FunctionRegistry::new();
        registry.register_as(
            "calc",
            Arc::new(Constant {
                name: "calculate",
                value: "0",
            }),
        );

        assert!(registry.contains("calc"));
        assert!(!registry.contains("calculate"));
        assert_eq!(registry.definitions()[0].name, "calc");
    }

    #[test]
    fn test_names_and_definitions_sorted() {
        let registry = FunctionRegistry::new()
            .with(Constant {
                name: "zeta",
                value: "",
            })
            .with(Constant {
                name: "alpha",
                value: "",
            });

        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
        let defs: Vec<_> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(defs, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_unregister() {
        let registry = FunctionRegistry::new().with(Constant {
            name: "gone",
            value: "",
        });
        assert!(registry.unregister("gone").is_some());
        assert!(registry.is_empty());
        assert!(registry.unregister("gone").is_none());
    }
}
