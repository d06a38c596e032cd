//! Cluster composition recipes.
//!
//! Each recipe assembles catalog units into an [`EnvironmentSpec`] builder.
//! The dependency group always contains exactly one adapter and one database
//! per node, plus at most one chain simulator chosen by the configured
//! network name; the node group holds the chainlink units. Dependency group
//! first, since declaration order is the only dependency signal.

use std::sync::Arc;

use anyhow::Context;
use serde_json::Value;

use crate::{
    catalog::{self, ExplorerAdmin},
    config::{NetworkConfig, SimulatedChain},
    group::ResourceGroup,
    registry::{ReleaseRegistry, version_from_tag},
    resource::{EnvResource, ResolvedValues},
    spec::{EnvironmentSpec, SpecInit},
    values::ValueSet,
};

/// Default image for chainlink nodes pinned to a past version.
pub const DEFAULT_NODE_IMAGE: &str = "public.ecr.aws/chainlink/chainlink";

const RELEASE_OWNER: &str = "smartcontractkit";
const RELEASE_REPO: &str = "chainlink";

/// A basic environment: a chainlink cluster backed by one database per node,
/// an external adapter and the configured chain simulator.
pub fn chainlink_cluster(node_count: usize) -> SpecInit {
    let nodes = node_group(node_count);
    let mut dependencies = basic_dependency_group();
    add_postgres_dbs(&mut dependencies, node_count);
    with_network("basic-chainlink", dependencies, nodes)
}

/// A chainlink cluster with the services required for testing alerts: the
/// basic environment plus a block explorer that mints access keys for every
/// node.
pub fn chainlink_cluster_for_alerts_testing(
    node_count: usize,
    admin: Arc<dyn ExplorerAdmin>,
) -> SpecInit {
    let nodes = node_group(node_count);
    let mut dependencies = basic_dependency_group();
    add_postgres_dbs(&mut dependencies, node_count);
    dependencies.push(catalog::explorer::manifest(node_count, admin));
    with_network("basic-chainlink", dependencies, nodes)
}

/// Mixes the latest chainlink build with `past_versions_count` past stable
/// versions, assigning (image, version) pins round-robin over the node index.
/// Index 0 of the cycle is the default/latest build.
///
/// A registry failure is non-fatal: the cluster degrades to the default
/// image and version for every node.
pub async fn mixed_version_chainlink_cluster(
    node_count: usize,
    past_versions_count: usize,
    registry: &dyn ReleaseRegistry,
) -> SpecInit {
    let recommended = past_versions_count + 1;
    if node_count < recommended {
        tracing::warn!(
            node_count,
            recommended,
            "fewer nodes than recommended for a mixed-version deployment"
        );
    }

    let pins = version_pins(past_versions_count, registry).await;

    let mut nodes = ResourceGroup::new("chainlinkCluster");
    for index in 0..node_count {
        let mut manifest = catalog::chainlink::manifest().indexed(index);
        if let Some((image, version)) = &pins[index % pins.len()] {
            manifest = manifest
                .value("image", image.as_str())
                .value("version", version.as_str());
        }
        nodes.push(manifest);
    }

    let mut dependencies = basic_dependency_group();
    add_postgres_dbs(&mut dependencies, node_count);
    with_network("mixed-version-chainlink", dependencies, nodes)
}

/// The cycling (image, version) list: index 0 is `None` (default build),
/// followed by the most recent `past` registry tags.
async fn version_pins(
    past: usize,
    registry: &dyn ReleaseRegistry,
) -> Vec<Option<(String, String)>> {
    let mut pins: Vec<Option<(String, String)>> = vec![None];
    match registry.list_releases(RELEASE_OWNER, RELEASE_REPO).await {
        Ok(releases) => {
            for release in releases.iter().take(past) {
                pins.push(Some((
                    DEFAULT_NODE_IMAGE.to_string(),
                    version_from_tag(&release.tag_name).to_string(),
                )));
            }
        }
        Err(error) => {
            tracing::warn!(
                error = %error,
                "failed to fetch past release versions, defaulting all nodes to the latest build"
            );
        }
    }
    pins
}

/// The group of chainlink node units, `chainlink-0..N`.
fn node_group(node_count: usize) -> ResourceGroup {
    let mut group = ResourceGroup::new("chainlinkCluster");
    for index in 0..node_count {
        group.push(catalog::chainlink::manifest().indexed(index));
    }
    group
}

/// The dependency group every environment starts from: one adapter, plus a
/// group hook that aggregates every database member's cluster URL into the
/// ordered `dbURLs` list.
fn basic_dependency_group() -> ResourceGroup {
    ResourceGroup::new("DependencyGroup")
        .member(catalog::adapter::manifest())
        .hook(|members: &ResolvedValues<'_>, values: &mut ValueSet| {
            let urls = members
                .with_id_prefix("postgres")
                .map(|(id, member_values)| {
                    member_values
                        .get("clusterURL")
                        .cloned()
                        .with_context(|| format!("'{id}' resolved without a clusterURL"))
                })
                .collect::<anyhow::Result<Vec<Value>>>()?;
            values.insert("dbURLs", Value::Array(urls));
            Ok(())
        })
}

/// One database unit per node, `postgres-0..N`.
fn add_postgres_dbs(group: &mut ResourceGroup, count: usize) {
    for index in 0..count {
        group.push(catalog::postgres::manifest().indexed(index));
    }
}

/// Appends the simulator matching the configured network name to the
/// dependency group and assembles the final spec. Called last when building
/// a recipe.
fn with_network(
    env_name: &'static str,
    mut dependency_group: ResourceGroup,
    node_group: ResourceGroup,
) -> SpecInit {
    Box::new(move |network: &NetworkConfig| {
        match SimulatedChain::from_network_name(&network.name) {
            Some(SimulatedChain::GethReorg) => {
                dependency_group.push(catalog::geth_reorg::helm_chart())
            }
            Some(SimulatedChain::GethDev) => dependency_group.push(catalog::geth::manifest()),
            Some(SimulatedChain::Hardhat) => dependency_group.push(catalog::hardhat::manifest()),
            Some(SimulatedChain::Ganache) => dependency_group.push(catalog::ganache::manifest()),
            None => {
                tracing::debug!(network = %network.name, "no simulated chain for this network");
            }
        }

        let include_nodes = !node_group.is_empty();
        let mut spec = EnvironmentSpec::new(env_name).group(dependency_group);
        if include_nodes {
            spec = spec.group(node_group);
        }
        spec.freeze()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cluster_counts() {
        let network = NetworkConfig::named("Ethereum Hardhat");
        let spec = chainlink_cluster(3)(&network);

        assert_eq!(spec.groups().len(), 2);
        let deps = &spec.groups()[0];
        assert_eq!(deps.id(), "DependencyGroup");
        // 1 adapter + 3 postgres + 1 simulator
        assert_eq!(deps.len(), 5);
        let nodes = &spec.groups()[1];
        assert_eq!(nodes.id(), "chainlinkCluster");
        assert_eq!(nodes.len(), 3);
        for (index, member) in nodes.members().iter().enumerate() {
            assert_eq!(member.id(), format!("chainlink-{index}"));
        }
    }

    #[test]
    fn test_zero_nodes_yields_dependency_group_only() {
        let network = NetworkConfig::named("Ethereum Ganache");
        let spec = chainlink_cluster(0)(&network);

        assert_eq!(spec.groups().len(), 1);
        // 1 adapter + 0 postgres + 1 simulator
        assert_eq!(spec.groups()[0].len(), 2);
    }

    #[test]
    fn test_unrecognized_network_gets_no_simulator() {
        let network = NetworkConfig::named("Ethereum Mainnet");
        let spec = chainlink_cluster(2)(&network);

        let deps = &spec.groups()[0];
        // 1 adapter + 2 postgres, no simulator
        assert_eq!(deps.len(), 3);
        assert!(deps.members().iter().all(|m| m.id() != "evm"));
    }
}
