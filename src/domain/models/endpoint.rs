//! Managed scoring endpoint models
//!
//! The reranking service runs on a provisioned endpoint with an explicit
//! lifecycle. A handle is only obtained through a provisioner and is consumed
//! when the endpoint is released.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What to provision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Endpoint name, unique within the control plane
    pub name: String,

    /// Model the endpoint serves
    pub model: String,

    /// Hardware class requested for the endpoint
    pub instance_type: String,
}

/// Lifecycle state reported by the control plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    /// Being provisioned
    Creating,
    /// Serving requests
    InService,
    /// Being reconfigured
    Updating,
    /// Being torn down
    Deleting,
    /// Provisioning failed
    Failed,
}

impl EndpointStatus {
    /// Returns true once the endpoint can serve requests
    pub fn is_live(&self) -> bool {
        matches!(self, Self::InService)
    }

    /// Returns true if waiting longer cannot make the endpoint live
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Deleting)
    }
}

impl std::fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Creating => "creating",
            Self::InService => "in_service",
            Self::Updating => "updating",
            Self::Deleting => "deleting",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Proof that an endpoint exists, returned by `ensure_endpoint`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointHandle {
    /// Endpoint name
    pub name: String,

    /// Base URL requests are sent to
    pub url: String,

    /// Status at the time the handle was issued
    pub status: EndpointStatus,

    /// True if this call created the endpoint, false if it already existed
    pub newly_created: bool,

    /// When the handle was issued
    pub acquired_at: DateTime<Utc>,
}

impl EndpointHandle {
    /// Issue a handle; normally called by a provisioner
    pub fn new(name: String, url: String, status: EndpointStatus, newly_created: bool) -> Self {
        Self {
            name,
            url,
            status,
            newly_created,
            acquired_at: Utc::now(),
        }
    }

    /// Returns true if the endpoint was serving when the handle was issued
    pub fn is_live(&self) -> bool {
        self.status.is_live()
    }
}
