//! Endpoint provisioning port.
//!
//! Replaces ad hoc create-or-connect branching with an idempotent
//! `ensure_endpoint` and an explicit `release`.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{EndpointHandle, EndpointSpec};

/// Lifecycle management for a managed scoring endpoint.
#[async_trait]
pub trait EndpointProvisioner: Send + Sync {
    /// Return a handle to the endpoint described by `spec`, creating it if it
    /// does not exist yet. Calling this repeatedly yields the same endpoint.
    async fn ensure_endpoint(&self, spec: &EndpointSpec) -> DomainResult<EndpointHandle>;

    /// Look up an existing endpoint by name without creating anything.
    async fn find_endpoint(&self, name: &str) -> DomainResult<Option<EndpointHandle>>;

    /// Tear the endpoint down. The handle is consumed so it cannot be used
    /// for scoring afterwards.
    async fn release(&self, handle: EndpointHandle) -> DomainResult<()>;
}
