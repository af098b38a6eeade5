//! Provisioner for an endpoint that already exists at a known URL.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EndpointHandle, EndpointSpec, EndpointStatus};
use crate::domain::ports::EndpointProvisioner;

/// Hands out handles to a fixed URL; nothing is created or torn down
#[derive(Debug, Clone)]
pub struct FixedEndpointProvisioner {
    url: String,
}

impl FixedEndpointProvisioner {
    /// Provisioner that always hands out `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl EndpointProvisioner for FixedEndpointProvisioner {
    async fn ensure_endpoint(&self, spec: &EndpointSpec) -> DomainResult<EndpointHandle> {
        Ok(EndpointHandle::new(
            spec.name.clone(),
            self.url.clone(),
            EndpointStatus::InService,
            false,
        ))
    }

    async fn find_endpoint(&self, name: &str) -> DomainResult<Option<EndpointHandle>> {
        Ok(Some(EndpointHandle::new(
            name.to_string(),
            self.url.clone(),
            EndpointStatus::InService,
            false,
        )))
    }

    async fn release(&self, handle: EndpointHandle) -> DomainResult<()> {
        debug!(endpoint = %handle.name, "fixed endpoint left running");
        Ok(())
    }
}
