//! Hardhat chain simulator.

use crate::{catalog::EVM_RPC_PORT, catalog::geth::ws_endpoints, manifest::Manifest, resource::FactValues};

/// The manifest that deploys a hardhat node to an environment.
pub fn manifest() -> Manifest {
    Manifest::new("evm", "templates/hardhat-deployment.yml")
        .service_file("templates/hardhat-service.yml")
        .config_map_file("templates/hardhat-config-map.yml")
        .value("rpcPort", EVM_RPC_PORT)
        .hook(FactValues(ws_endpoints))
}
