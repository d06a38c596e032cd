//! Interface boundary to the external cluster orchestrator.
//!
//! The engine never talks to a cluster directly. It hands a
//! [`DeployDescriptor`] to an [`Orchestrator`] implementation and receives
//! back the [`RuntimeFacts`] observed once the resource is live. Retry,
//! backoff and cancellation policy all live behind this boundary; errors are
//! surfaced as returned.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Result;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::values::ValueSet;

/// Runtime facts observed by the orchestrator once a resource is live.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeFacts {
    /// Cluster-internal IP (or DNS name) of the resource's service.
    pub cluster_ip: String,
    /// Service ports as assigned in the cluster, in declaration order.
    pub assigned_ports: Vec<u16>,
    /// Locally forwarded ports, one per assigned port.
    pub local_ports: Vec<u16>,
    /// Names of the pods backing the resource.
    pub pod_names: Vec<String>,
}

impl RuntimeFacts {
    /// The assigned cluster port at `index`.
    pub fn assigned_port(&self, index: usize) -> Result<u16> {
        self.assigned_ports.get(index).copied().ok_or_else(|| {
            anyhow::anyhow!("no assigned port at index {index} (have {})", self.assigned_ports.len())
        })
    }

    /// The locally forwarded port at `index`.
    pub fn local_port(&self, index: usize) -> Result<u16> {
        self.local_ports.get(index).copied().ok_or_else(|| {
            anyhow::anyhow!("no forwarded local port at index {index} (have {})", self.local_ports.len())
        })
    }
}

/// Output of a one-shot command executed inside a pod.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Cluster-internal and locally forwarded endpoint pair for one exposed port.
#[derive(Debug, Clone)]
pub struct ServiceDetail {
    pub remote_url: Url,
    pub local_url: Url,
}

/// Opaque secret data deployed alongside a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretSpec {
    /// Prefix used to generate the secret's name.
    pub name_prefix: String,
    pub data: BTreeMap<String, String>,
}

/// Everything the orchestrator needs to apply one deployable resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployDescriptor {
    pub id: String,
    /// Snapshot of the resource's static values, available for template
    /// rendering. Template contents are not interpreted by this crate.
    pub values: ValueSet,
    pub kind: DeployKind,
}

/// The two deployable kinds the orchestrator understands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DeployKind {
    Manifest {
        deployment_file: PathBuf,
        #[serde(skip_serializing_if = "Option::is_none")]
        service_file: Option<PathBuf>,
        #[serde(skip_serializing_if = "Option::is_none")]
        config_map_file: Option<PathBuf>,
        #[serde(skip_serializing_if = "Option::is_none")]
        secret: Option<SecretSpec>,
    },
    Helm {
        chart_path: PathBuf,
        release_name: String,
    },
}

/// External cluster orchestrator.
///
/// `deploy` applies a resource and blocks until it is ready (or fails with
/// the driver's own readiness/apply error). `exec_in_pod` and
/// `service_details` are available to post-deploy hooks.
pub trait Orchestrator: Send + Sync {
    fn deploy<'a>(&'a self, descriptor: DeployDescriptor) -> BoxFuture<'a, Result<RuntimeFacts>>;

    fn exec_in_pod<'a>(
        &'a self,
        pod_name: &'a str,
        container: &'a str,
        command: &'a [String],
    ) -> BoxFuture<'a, Result<ExecOutput>>;

    /// Endpoint pairs for every exposed port of a helm release, used by
    /// helm-based resources to self-discover their connection endpoints.
    fn service_details<'a>(&'a self, release_name: &'a str)
    -> BoxFuture<'a, Result<Vec<ServiceDetail>>>;
}
