//! `endpoint`: ensure, release or inspect the reranking endpoint

use anyhow::{Context, Result};
use serde::Serialize;

use crate::adapters::endpoints::create_provisioner;
use crate::cli::output::{create_spinner, output, CommandOutput};
use crate::cli::types::EndpointCommands;
use crate::domain::models::{Config, EndpointHandle};

/// Result of an `endpoint` subcommand
#[derive(Debug, Serialize)]
pub struct EndpointOutput {
    /// "ensure", "release" or "status"
    pub action: &'static str,
    /// Endpoint name the action targeted
    pub name: String,
    /// The endpoint, or `None` if it does not exist
    pub endpoint: Option<EndpointHandle>,
}

impl CommandOutput for EndpointOutput {
    fn to_human(&self) -> String {
        match (&self.endpoint, self.action) {
            (None, _) => format!("Endpoint '{}' not found.", self.name),
            (Some(handle), "ensure") => format!(
                "Endpoint '{}' {} at {} ({})",
                handle.name,
                if handle.newly_created { "created" } else { "ready" },
                handle.url,
                handle.status
            ),
            (Some(handle), "release") => format!("Endpoint '{}' released.", handle.name),
            (Some(handle), _) => format!("Endpoint '{}' is {} at {}", handle.name, handle.status, handle.url),
        }
    }
}

/// Run an `endpoint` subcommand
pub async fn execute(command: EndpointCommands, config: &Config, json: bool) -> Result<()> {
    let mut reranker = config.reranker.clone();

    let out = match command {
        EndpointCommands::Ensure {
            name,
            model,
            instance_type,
        } => {
            if let Some(name) = name {
                reranker.endpoint_name = name;
            }
            if let Some(model) = model {
                reranker.model = model;
            }
            if let Some(instance_type) = instance_type {
                reranker.instance_type = instance_type;
            }

            let provisioner = create_provisioner(&reranker)?;
            let spinner = create_spinner(format!("Ensuring endpoint {}...", reranker.endpoint_name), json);
            let handle = provisioner.ensure_endpoint(&reranker.endpoint_spec()).await;
            spinner.finish_and_clear();

            EndpointOutput {
                action: "ensure",
                name: reranker.endpoint_name,
                endpoint: Some(handle.context("Failed to ensure endpoint")?),
            }
        }
        EndpointCommands::Release { name } => {
            let name = name.unwrap_or_else(|| reranker.endpoint_name.clone());
            let provisioner = create_provisioner(&reranker)?;

            let found = provisioner
                .find_endpoint(&name)
                .await
                .context("Failed to look up endpoint")?;
            if let Some(handle) = found.clone() {
                provisioner
                    .release(handle)
                    .await
                    .context("Failed to release endpoint")?;
            }

            EndpointOutput {
                action: "release",
                name,
                endpoint: found,
            }
        }
        EndpointCommands::Status { name } => {
            let name = name.unwrap_or_else(|| reranker.endpoint_name.clone());
            let provisioner = create_provisioner(&reranker)?;

            EndpointOutput {
                action: "status",
                endpoint: provisioner
                    .find_endpoint(&name)
                    .await
                    .context("Failed to look up endpoint")?,
                name,
            }
        }
    };

    output(&out, json);
    Ok(())
}
