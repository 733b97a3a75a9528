//! Configuration model for muxguard.
//!
//! This module defines the Config struct that represents `muxguard.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use operations::DEFAULT_CONFIG_FILE;
