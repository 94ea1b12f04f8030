//! Layered settings resolution.
//!
//! Every setting is derived by walking a fixed precedence chain and taking
//! the first layer that supplies a value:
//!
//! 1. Explicit override (CLI flags)
//! 2. Environment variable
//! 3. Persistent store
//! 4. Computed default
//!
//! The winning layer is recorded on the [`Setting`] as its provenance.

pub mod coerce;

use std::fmt;

use strum::{Display, EnumString};
use thiserror::Error;

use crate::store::StoreError;

pub use coerce::{coerce_flag, coerce_version, expand_path};

/// Errors during resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid version for `{setting}` from {layer}: {value:?} (expected digits, optionally dotted)")]
    InvalidVersion {
        setting: &'static str,
        layer: Layer,
        value: String,
    },

    #[error("invalid flag for `{setting}` from {layer}: {value:?} (expected true/false, 1/0, yes/no, on/off)")]
    InvalidFlag {
        setting: &'static str,
        layer: Layer,
        value: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A settings source, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Layer {
    Override,
    Env,
    Store,
    Default,
}

/// A resolved value and the layer that supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Setting<T> {
    pub name: &'static str,
    pub value: T,
    pub provenance: Layer,
}

impl<T> Setting<T> {
    /// Transform the value, keeping name and provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Setting<U> {
        Setting {
            name: self.name,
            value: f(self.value),
            provenance: self.provenance,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {} ({})", self.name, self.value, self.provenance)
    }
}

/// Precedence chain builder.
///
/// Layers are offered in precedence order. Once one supplies a value the
/// remaining layers are never evaluated, so a malformed value in a shadowed
/// layer cannot fail resolution.
#[derive(Debug)]
pub struct Chain<T> {
    name: &'static str,
    winner: Option<(T, Layer)>,
}

impl<T> Chain<T> {
    pub fn new(name: &'static str) -> Self {
        Self { name, winner: None }
    }

    /// Offer an already-computed candidate.
    pub fn layer(self, layer: Layer, value: Option<T>) -> Self {
        match self.winner {
            Some(_) => self,
            None => Self {
                name: self.name,
                winner: value.map(|v| (v, layer)),
            },
        }
    }

    /// Offer a candidate that is computed (and may fail) only when every
    /// earlier layer was absent.
    pub fn try_layer<E>(
        self,
        layer: Layer,
        candidate: impl FnOnce() -> Result<Option<T>, E>,
    ) -> Result<Self, E> {
        if self.winner.is_some() {
            return Ok(self);
        }
        let winner = candidate()?.map(|v| (v, layer));
        Ok(Self {
            name: self.name,
            winner,
        })
    }

    /// Close the chain with a default supplied by `layer`.
    ///
    /// Usually [`Layer::Default`]; a default that was itself read from the
    /// store reports [`Layer::Store`].
    pub fn or_else(self, layer: Layer, default: impl FnOnce() -> T) -> Setting<T> {
        let (value, provenance) = self.winner.unwrap_or_else(|| (default(), layer));
        tracing::debug!(setting = self.name, layer = %provenance, "resolved");
        Setting {
            name: self.name,
            value,
            provenance,
        }
    }

    /// Close the chain with a computed default.
    pub fn or_default(self, default: T) -> Setting<T> {
        self.or_else(Layer::Default, || default)
    }
}
