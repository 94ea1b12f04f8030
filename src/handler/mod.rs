//! Pluggable link-error handlers.
//!
//! Operators select a handler with a dotted reference such as
//! `bldconf.link.StrictHandler`. References are resolved against a
//! [`HandlerRegistry`] populated by explicit registration at startup, so
//! custom handlers can be swapped in without changing the tool itself.

pub mod link;
pub mod reference;
pub mod registry;

use thiserror::Error;

pub use link::{LinkError, LinkErrorHandler, LinkVerdict, StrictHandler, WarnHandler};
pub use reference::HandlerReference;
pub use registry::{HandlerFactory, HandlerRegistry, LoadedHandler};

/// Errors while parsing or resolving a handler reference.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum HandlerError {
    #[error("handler reference {reference:?} must contain a '.' separating namespace and entry")]
    MissingSeparator { reference: String },

    #[error("handler reference {reference:?} has an empty namespace or entry")]
    EmptyPart { reference: String },

    #[error("handler namespace `{namespace}` is not registered")]
    NamespaceNotFound { namespace: String },

    #[error("handler `{entry}` not found in namespace `{namespace}`")]
    EntryNotFound { namespace: String, entry: String },
}
