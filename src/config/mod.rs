//! Build configuration: layering every source into one immutable record.
//!
//! Handles store loading, environment variable resolution, CLI override
//! merging and handler loading with proper priority ordering.

pub mod loader;

pub use loader::{Advisory, BuildConfig, ConfigError, Overrides, Sources};
