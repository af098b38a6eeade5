//! Domain layer for the ragline pipeline
//!
//! Pure data models, errors and the port traits that external services
//! implement. Nothing in here performs I/O.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
