//! HTTP control-plane endpoint provisioner.
//!
//! `ensure_endpoint` looks the endpoint up by name, creates it when the
//! control plane reports it absent, then polls until it is in service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EndpointHandle, EndpointSpec, EndpointStatus, RerankerConfig};
use crate::domain::ports::EndpointProvisioner;
use crate::infrastructure::http::client::{
    build_client, check_status, header_value, send_json, trim_base_url,
};
use crate::infrastructure::http::ApiError;

const SERVICE: &str = "endpoint control plane";

/// Settings for [`ControlPlaneProvisioner`]
#[derive(Debug, Clone)]
pub struct ControlPlaneConfig {
    /// Control plane root, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Bearer token, if the control plane needs one
    pub api_key: Option<String>,
    /// Delay between status checks
    pub poll_interval: Duration,
    /// Give up if the endpoint is not live after this long
    pub max_wait: Duration,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl ControlPlaneConfig {
    /// Settings for the control plane at `base_url`, taking the rest from `config`
    pub fn from_reranker(base_url: &str, config: &RerankerConfig) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: config.api_key.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_wait: Duration::from_secs(config.max_wait_secs),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// Provisioner backed by a REST control plane
pub struct ControlPlaneProvisioner {
    client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    max_wait: Duration,
}

impl ControlPlaneProvisioner {
    /// Build a provisioner for the control plane in `config`
    pub fn new(config: ControlPlaneConfig) -> DomainResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(key) = config.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            headers.insert(header::AUTHORIZATION, header_value(&format!("Bearer {key}"))?);
        }

        Ok(Self {
            client: build_client(config.timeout_secs, headers)?,
            base_url: trim_base_url(&config.base_url),
            poll_interval: config.poll_interval,
            max_wait: config.max_wait,
        })
    }

    fn endpoint_url(&self, name: &str) -> String {
        format!("{}/endpoints/{name}", self.base_url)
    }

    /// Current description, or `None` if the control plane does not know the name
    async fn describe(&self, name: &str) -> DomainResult<Option<EndpointDescription>> {
        match send_json(self.client.get(self.endpoint_url(name))).await {
            Ok(description) => Ok(Some(description)),
            Err(ApiError::NotFound) => Ok(None),
            Err(e) => Err(e.into_domain(SERVICE)),
        }
    }

    async fn create(&self, spec: &EndpointSpec) -> DomainResult<EndpointDescription> {
        let request = CreateEndpointRequest {
            name: &spec.name,
            model: &spec.model,
            instance_type: &spec.instance_type,
        };

        send_json(
            self.client
                .post(format!("{}/endpoints", self.base_url))
                .json(&request),
        )
        .await
        .map_err(|e| e.into_domain(SERVICE))
    }

    async fn wait_until_live(
        &self,
        mut description: EndpointDescription,
    ) -> DomainResult<EndpointDescription> {
        let deadline = Instant::now() + self.max_wait;

        loop {
            if description.status.is_live() {
                return Ok(description);
            }

            if description.status.is_terminal() {
                return Err(DomainError::EndpointUnavailable(format!(
                    "endpoint '{}' is {}",
                    description.name, description.status
                )));
            }

            if Instant::now() >= deadline {
                return Err(DomainError::EndpointUnavailable(format!(
                    "endpoint '{}' still {} after {}s",
                    description.name,
                    description.status,
                    self.max_wait.as_secs()
                )));
            }

            debug!(endpoint = %description.name, status = %description.status, "waiting for endpoint");
            tokio::time::sleep(self.poll_interval).await;

            description = self.describe(&description.name).await?.ok_or_else(|| {
                DomainError::EndpointUnavailable(format!(
                    "endpoint '{}' disappeared while starting",
                    description.name
                ))
            })?;
        }
    }
}

#[async_trait]
impl EndpointProvisioner for ControlPlaneProvisioner {
    #[instrument(skip(self, spec), fields(endpoint = %spec.name))]
    async fn ensure_endpoint(&self, spec: &EndpointSpec) -> DomainResult<EndpointHandle> {
        let (description, newly_created) = match self.describe(&spec.name).await? {
            Some(existing) => {
                info!(status = %existing.status, "endpoint already exists");
                (existing, false)
            }
            None => {
                info!(model = %spec.model, instance_type = %spec.instance_type, "creating endpoint");
                (self.create(spec).await?, true)
            }
        };

        let live = self.wait_until_live(description).await?;
        info!(url = %live.url, "endpoint in service");

        Ok(EndpointHandle::new(live.name, live.url, live.status, newly_created))
    }

    async fn find_endpoint(&self, name: &str) -> DomainResult<Option<EndpointHandle>> {
        Ok(self
            .describe(name)
            .await?
            .map(|d| EndpointHandle::new(d.name, d.url, d.status, false)))
    }

    #[instrument(skip(self, handle), fields(endpoint = %handle.name))]
    async fn release(&self, handle: EndpointHandle) -> DomainResult<()> {
        let response = self
            .client
            .delete(self.endpoint_url(&handle.name))
            .send()
            .await
            .map_err(|e| ApiError::from(e).into_domain(SERVICE))?;

        match check_status(response).await {
            Ok(_) => {
                info!("endpoint released");
                Ok(())
            }
            Err(ApiError::NotFound) => {
                warn!("endpoint was already gone");
                Ok(())
            }
            Err(e) => Err(e.into_domain(SERVICE)),
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateEndpointRequest<'a> {
    name: &'a str,
    model: &'a str,
    instance_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct EndpointDescription {
    name: String,
    url: String,
    status: EndpointStatus,
}
