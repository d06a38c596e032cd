//! Block explorer service, including its admin API client.
//!
//! The explorer needs seeded state before its values are final: its hook
//! seeds an admin account inside the pod, then mints access credentials
//! through the admin API once per node, collecting them into an ordered
//! `keys` list. Any failure aborts the unit's resolution; there is no
//! silently partial credential list.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::{
    catalog::EXPLORER_API_PORT,
    manifest::Manifest,
    resource::{HookCtx, SetValues},
    values::ValueSet,
};

/// Name of the explorer container inside its pod.
const EXPLORER_CONTAINER: &str = "explorer";
/// Seeded admin account. Test-only values.
const ADMIN_USERNAME: &str = "username";
const ADMIN_PASSWORD: &str = "password";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Access credentials minted for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeCredentials {
    pub id: String,
    pub access_key: String,
    pub secret: String,
}

/// Explorer admin API, consumed as an interface so resolution is testable
/// without a live explorer.
pub trait ExplorerAdmin: Send + Sync {
    /// Register a node with the explorer, minting access credentials.
    fn post_admin_nodes<'a>(
        &'a self,
        base_url: &'a Url,
        node_label: &'a str,
    ) -> BoxFuture<'a, Result<NodeCredentials>>;
}

/// HTTP client for the explorer admin surface.
pub struct HttpExplorerAdmin {
    client: reqwest::Client,
}

impl HttpExplorerAdmin {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

impl ExplorerAdmin for HttpExplorerAdmin {
    fn post_admin_nodes<'a>(
        &'a self,
        base_url: &'a Url,
        node_label: &'a str,
    ) -> BoxFuture<'a, Result<NodeCredentials>> {
        Box::pin(async move {
            let url = base_url
                .join("api/v1/admin/nodes")
                .context("Failed to build admin nodes URL")?;
            let credentials = self
                .client
                .post(url)
                .json(&serde_json::json!({ "name": node_label }))
                .send()
                .await
                .with_context(|| format!("Failed to register node '{node_label}'"))?
                .error_for_status()
                .context("Admin node registration returned an error status")?
                .json::<NodeCredentials>()
                .await
                .context("Failed to parse node credentials")?;
            Ok(credentials)
        })
    }
}

/// The manifest that deploys the explorer and mints access keys for
/// `node_count` nodes during resolution.
pub fn manifest(node_count: usize, admin: Arc<dyn ExplorerAdmin>) -> Manifest {
    Manifest::new("explorer", "templates/explorer-deployment.yml")
        .service_file("templates/explorer-service.yml")
        .hook(SeedAndMintKeys { node_count, admin })
}

struct SeedAndMintKeys {
    node_count: usize,
    admin: Arc<dyn ExplorerAdmin>,
}

impl SetValues for SeedAndMintKeys {
    fn set_values<'a>(
        &'a mut self,
        values: &'a mut ValueSet,
        ctx: HookCtx<'a>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            values.insert(
                "clusterURL",
                format!("ws://{}:{}", ctx.facts.cluster_ip, EXPLORER_API_PORT),
            );
            let local_url = Url::parse(&format!("https://127.0.0.1:{EXPLORER_API_PORT}"))
                .context("Failed to build explorer local URL")?;
            values.insert("localURL", local_url.as_str());

            let pod = ctx
                .facts
                .pod_names
                .iter()
                .find(|name| name.contains("explorer"))
                .ok_or_else(|| anyhow::anyhow!("no explorer pod found"))?;

            let seed_cmd: Vec<String> = [
                "yarn",
                "--cwd",
                "apps/explorer",
                "admin:seed",
                ADMIN_USERNAME,
                ADMIN_PASSWORD,
            ]
            .into_iter()
            .map(String::from)
            .collect();
            ctx.orchestrator
                .exec_in_pod(pod, EXPLORER_CONTAINER, &seed_cmd)
                .await
                .context("seeding explorer admin account")?;

            let mut keys = Vec::with_capacity(self.node_count);
            for index in 0..self.node_count {
                let label = format!("node-{index}");
                let credentials = self
                    .admin
                    .post_admin_nodes(&local_url, &label)
                    .await
                    .with_context(|| format!("minting credentials for '{label}'"))?;
                keys.push(serde_json::to_value(credentials)?);
            }
            values.insert("keys", Value::Array(keys));
            Ok(())
        })
    }
}
