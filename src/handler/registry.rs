//! Registry of link-error handler factories keyed by dotted reference.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::link::{LinkError, LinkErrorHandler, LinkVerdict, StrictHandler, WarnHandler};
use super::reference::HandlerReference;
use super::HandlerError;

/// Builds a fresh handler instance.
pub type HandlerFactory = Box<dyn Fn() -> Arc<dyn LinkErrorHandler> + Send + Sync>;

/// Namespace of the handlers shipped with the tool.
pub const BUILTIN_NAMESPACE: &str = "bldconf.link";

/// Namespace → entry → factory.
#[derive(Default)]
pub struct HandlerRegistry {
    namespaces: IndexMap<String, IndexMap<String, HandlerFactory>>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in handlers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.insert(BUILTIN_NAMESPACE, "StrictHandler", Box::new(|| -> Arc<dyn LinkErrorHandler> {
            Arc::new(StrictHandler)
        }));
        registry.insert(BUILTIN_NAMESPACE, "WarnHandler", Box::new(|| -> Arc<dyn LinkErrorHandler> {
            Arc::new(WarnHandler)
        }));
        registry
    }

    /// Register a factory under a dotted reference, replacing any previous
    /// registration of the same reference.
    pub fn register<F>(&mut self, reference: &str, factory: F) -> Result<(), HandlerError>
    where
        F: Fn() -> Arc<dyn LinkErrorHandler> + Send + Sync + 'static,
    {
        let parsed = HandlerReference::parse(reference)?;
        self.insert(parsed.namespace(), parsed.entry(), Box::new(factory));
        Ok(())
    }

    /// Register a handler type constructed with [`Default`].
    pub fn register_default<H>(&mut self, reference: &str) -> Result<(), HandlerError>
    where
        H: LinkErrorHandler + Default + 'static,
    {
        self.register(reference, || Arc::new(H::default()))
    }

    fn insert(&mut self, namespace: &str, entry: &str, factory: HandlerFactory) {
        tracing::debug!(namespace, entry, "handler registered");
        self.namespaces
            .entry(namespace.to_string())
            .or_default()
            .insert(entry.to_string(), factory);
    }

    /// Locate the namespace, then the entry, and instantiate the handler.
    pub fn resolve(&self, reference: &HandlerReference) -> Result<LoadedHandler, HandlerError> {
        let entries = self
            .namespaces
            .get(reference.namespace())
            .ok_or_else(|| HandlerError::NamespaceNotFound {
                namespace: reference.namespace().to_string(),
            })?;
        let factory = entries
            .get(reference.entry())
            .ok_or_else(|| HandlerError::EntryNotFound {
                namespace: reference.namespace().to_string(),
                entry: reference.entry().to_string(),
            })?;
        Ok(LoadedHandler {
            reference: reference.clone(),
            handler: factory(),
        })
    }

    /// Parse and resolve in one step.
    pub fn load(&self, reference: &str) -> Result<LoadedHandler, HandlerError> {
        self.resolve(&HandlerReference::parse(reference)?)
    }

    /// Every registered reference, in registration order.
    pub fn references(&self) -> Vec<String> {
        self.namespaces
            .iter()
            .flat_map(|(namespace, entries)| {
                entries.keys().map(move |entry| format!("{namespace}.{entry}"))
            })
            .collect()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("references", &self.references())
            .finish()
    }
}

/// A resolved, ready-to-invoke handler.
#[derive(Clone)]
pub struct LoadedHandler {
    reference: HandlerReference,
    handler: Arc<dyn LinkErrorHandler>,
}

impl LoadedHandler {
    /// The reference this handler was resolved from.
    pub fn reference(&self) -> &HandlerReference {
        &self.reference
    }

    pub fn handle(&self, errors: &[LinkError], ignore: bool) -> LinkVerdict {
        self.handler.handle(errors, ignore)
    }
}

impl fmt::Debug for LoadedHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedHandler")
            .field("reference", &self.reference.to_string())
            .finish_non_exhaustive()
    }
}
