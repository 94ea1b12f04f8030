//! Link-error handler interface and the built-in handlers.

use std::fmt;
use std::path::PathBuf;

/// A linking problem reported by the build for one binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkError {
    pub binary: PathBuf,
    pub message: String,
}

impl LinkError {
    pub fn new(binary: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.binary.display(), self.message)
    }
}

/// What the build should do after a handler has seen the link errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkVerdict {
    Proceed,
    Abort { reason: String },
}

/// Strategy invoked by build logic whenever a linking step reports errors.
pub trait LinkErrorHandler: Send + Sync {
    /// Decide how to continue. `ignore` carries the resolved
    /// `ignore_link_errors` setting.
    fn handle(&self, errors: &[LinkError], ignore: bool) -> LinkVerdict;
}

/// Default handler: any link error aborts unless errors are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictHandler;

impl LinkErrorHandler for StrictHandler {
    fn handle(&self, errors: &[LinkError], ignore: bool) -> LinkVerdict {
        if errors.is_empty() {
            return LinkVerdict::Proceed;
        }
        if ignore {
            for error in errors {
                tracing::warn!(binary = %error.binary.display(), "ignoring link error: {}", error.message);
            }
            return LinkVerdict::Proceed;
        }
        LinkVerdict::Abort {
            reason: format!(
                "{} link error(s), first: {}",
                errors.len(),
                errors[0]
            ),
        }
    }
}

/// Reports every link error and always lets the build continue.
#[derive(Debug, Default, Clone, Copy)]
pub struct WarnHandler;

impl LinkErrorHandler for WarnHandler {
    fn handle(&self, errors: &[LinkError], _ignore: bool) -> LinkVerdict {
        for error in errors {
            tracing::warn!(binary = %error.binary.display(), "link error: {}", error.message);
        }
        LinkVerdict::Proceed
    }
}
