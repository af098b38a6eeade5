//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment: defaults, project YAML files,
//! then `RAGLINE_` environment overrides.

pub mod loader;

pub use loader::{ConfigError, ConfigLoader};
