//! Chainlink node service.

use std::collections::BTreeMap;

use crate::{
    catalog::{CHAINLINK_P2P_PORT, CHAINLINK_WEB_PORT},
    manifest::Manifest,
    orchestrator::SecretSpec,
};

/// API credentials baked into the node secret. Test-only values.
const API_CREDENTIALS: &str = "notreal@fakeemail.ch\ntwochains";
const NODE_PASSWORD: &str = "T.tLHkcmwePT/p,]sYuntjwHKAsrhm#4eRs4LuKHwvHejWYAC2JP4M8HimwgmbaZ";

/// The manifest that deploys a chainlink node to an environment.
///
/// Connection values (database URL, adapter URL) come from the dependency
/// group at template-rendering time, so this unit carries no hook of its own.
pub fn manifest() -> Manifest {
    Manifest::new("chainlink", "templates/chainlink/chainlink-deployment.yml")
        .service_file("templates/chainlink/chainlink-service.yml")
        .value("webPort", CHAINLINK_WEB_PORT)
        .value("p2pPort", CHAINLINK_P2P_PORT)
        .secret(SecretSpec {
            name_prefix: "chainlink-".to_string(),
            data: BTreeMap::from([
                ("apicredentials".to_string(), API_CREDENTIALS.to_string()),
                ("node-password".to_string(), NODE_PASSWORD.to_string()),
            ]),
        })
}
