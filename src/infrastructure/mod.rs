//! Infrastructure layer module
//!
//! Concrete building blocks the adapters and services stand on:
//! - Configuration management
//! - Logging infrastructure
//! - Shared HTTP plumbing for the remote services
//! - Chunking and the in-memory vector index

pub mod config;
pub mod http;
pub mod logging;
pub mod vector;
