//! Endpoint provisioning adapters.
//!
//! - `control_plane`: creates, polls and deletes endpoints over HTTP
//! - `fixed`: uses a pre-existing endpoint URL as-is

pub mod control_plane;
pub mod fixed;

use std::sync::Arc;

pub use control_plane::{ControlPlaneConfig, ControlPlaneProvisioner};
pub use fixed::FixedEndpointProvisioner;

use crate::domain::errors::DomainResult;
use crate::domain::models::RerankerConfig;
use crate::domain::ports::EndpointProvisioner;

/// Control plane provisioner when one is configured, fixed URL otherwise
pub fn create_provisioner(config: &RerankerConfig) -> DomainResult<Arc<dyn EndpointProvisioner>> {
    match config.control_plane_url.as_deref() {
        Some(url) => Ok(Arc::new(ControlPlaneProvisioner::new(
            ControlPlaneConfig::from_reranker(url, config),
        )?)),
        None => Ok(Arc::new(FixedEndpointProvisioner::new(config.endpoint_url.clone()))),
    }
}
