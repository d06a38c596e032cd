//! Ganache chain simulator.

use crate::{catalog::EVM_RPC_PORT, catalog::geth::ws_endpoints, manifest::Manifest, resource::FactValues};

/// The manifest that deploys a ganache node to an environment.
pub fn manifest() -> Manifest {
    Manifest::new("evm", "templates/ganache-deployment.yml")
        .service_file("templates/ganache-service.yml")
        .value("rpcPort", EVM_RPC_PORT)
        .hook(FactValues(ws_endpoints))
}
