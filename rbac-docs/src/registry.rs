//! # Handler documentation lookup
//!
//! Maps a route handler (`Controller@method`) to its documentation block.
//! Handlers register their doc block up front in a [`DocRegistry`]; no
//! runtime introspection is involved.

use std::collections::HashMap;
use thiserror::Error;

/// Documentation lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocError {
    /// No handler registered under this controller.
    #[error("Unknown controller: {0}")]
    UnknownController(String),

    /// Controller is registered but does not define the method.
    #[error("Unknown method {controller}@{method}")]
    UnknownMethod {
        /// Controller reference.
        controller: String,
        /// Method name.
        method: String,
    },

    /// Handler reference is not of the form `Controller@method`.
    #[error("Invalid handler reference: {0}")]
    InvalidHandler(String),
}

/// Result type for documentation lookups.
pub type DocResult<T> = Result<T, DocError>;

/// Resolves the documentation block of a route handler.
pub trait DocResolver: Send + Sync {
    /// Look up the raw doc block of `controller::method`.
    ///
    /// Returns `Ok(None)` when the handler exists but carries no
    /// documentation, and an error when the handler cannot be resolved.
    fn resolve(&self, controller: &str, method: &str) -> DocResult<Option<String>>;
}

/// Static documentation registry keyed by controller and method.
///
/// # Example
///
/// ```
/// use rbac_docs::{DocRegistry, DocResolver};
///
/// let mut registry = DocRegistry::new();
/// registry.register("UserController", "show", "/** @func Get User */");
/// registry.register_undocumented("UserController", "index");
///
/// assert!(registry.resolve("UserController", "show").unwrap().is_some());
/// assert!(registry.resolve("UserController", "index").unwrap().is_none());
/// assert!(registry.resolve("PostController", "show").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DocRegistry {
    controllers: HashMap<String, HashMap<String, Option<String>>>,
}

impl DocRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a documented handler.
    pub fn register(
        &mut self,
        controller: impl Into<String>,
        method: impl Into<String>,
        doc: impl Into<String>,
    ) -> &mut Self {
        self.insert(controller.into(), method.into(), Some(doc.into()))
    }

    /// Register a handler that has no doc block.
    pub fn register_undocumented(
        &mut self,
        controller: impl Into<String>,
        method: impl Into<String>,
    ) -> &mut Self {
        self.insert(controller.into(), method.into(), None)
    }

    /// Register a handler by its `Controller@method` reference.
    pub fn register_handler(&mut self, handler: &str, doc: Option<String>) -> DocResult<&mut Self> {
        let (controller, method) = handler
            .split_once('@')
            .filter(|(c, m)| !c.is_empty() && !m.is_empty())
            .ok_or_else(|| DocError::InvalidHandler(handler.to_string()))?;
        Ok(self.insert(controller.to_string(), method.to_string(), doc))
    }

    /// Build a registry from `Controller@method` → doc pairs.
    pub fn from_handlers<I>(handlers: I) -> DocResult<Self>
    where
        I: IntoIterator<Item = (String, Option<String>)>,
    {
        let mut registry = Self::new();
        for (handler, doc) in handlers {
            registry.register_handler(&handler, doc)?;
        }
        Ok(registry)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.controllers.values().map(HashMap::len).sum()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, controller: String, method: String, doc: Option<String>) -> &mut Self {
        self.controllers.entry(controller).or_default().insert(method, doc);
        self
    }
}

impl DocResolver for DocRegistry {
    fn resolve(&self, controller: &str, method: &str) -> DocResult<Option<String>> {
        let methods = self
            .controllers
            .get(controller)
            .ok_or_else(|| DocError::UnknownController(controller.to_string()))?;

        methods
            .get(method)
            .cloned()
            .ok_or_else(|| DocError::UnknownMethod {
                controller: controller.to_string(),
                method: method.to_string(),
            })
    }
}
