//! Geth dev-mode chain simulator.

use crate::{
    catalog::EVM_RPC_PORT,
    manifest::Manifest,
    orchestrator::RuntimeFacts,
    resource::FactValues,
    values::ValueSet,
};

/// The manifest that deploys a single geth node in dev mode.
pub fn manifest() -> Manifest {
    Manifest::new("evm", "templates/geth-deployment.yml")
        .service_file("templates/geth-service.yml")
        .config_map_file("templates/geth-config-map.yml")
        .value("rpcPort", EVM_RPC_PORT)
        .hook(FactValues(ws_endpoints))
}

/// Websocket cluster/local endpoints from the assigned RPC port. Shared by
/// the single-node EVM simulators.
pub(crate) fn ws_endpoints(facts: &RuntimeFacts, values: &mut ValueSet) -> anyhow::Result<()> {
    values.insert(
        "clusterURL",
        format!("ws://{}:{}", facts.cluster_ip, facts.assigned_port(0)?),
    );
    values.insert(
        "localURL",
        format!("ws://127.0.0.1:{}", facts.local_port(0)?),
    );
    Ok(())
}
