//! bldconf — layered build-tool configuration (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod env;
pub mod handler;
pub mod logger;
pub mod platform;
pub mod settings;
pub mod store;
