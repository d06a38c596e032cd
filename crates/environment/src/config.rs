//! External network configuration handed to environment spec builders.

use serde::{Deserialize, Serialize};

/// Network/chain configuration, passed explicitly into recipes rather than
/// read from process-wide state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Display name of the network. Drives the simulated-chain selection.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// RPC endpoint for non-simulated networks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl NetworkConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            chain_id: None,
            url: None,
        }
    }
}

/// The chain simulators an environment can include, chosen by network name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SimulatedChain {
    /// Multi-node geth network capable of chain reorgs (helm chart).
    GethReorg,
    /// Single geth node in dev mode.
    GethDev,
    Hardhat,
    Ganache,
}

impl SimulatedChain {
    /// Map a configured network name to a simulator. Unrecognized names get
    /// no simulator.
    pub fn from_network_name(name: &str) -> Option<Self> {
        match name {
            "Ethereum Geth reorg" => Some(Self::GethReorg),
            "Ethereum Geth dev" => Some(Self::GethDev),
            "Ethereum Hardhat" => Some(Self::Hardhat),
            "Ethereum Ganache" => Some(Self::Ganache),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_network_names() {
        assert_eq!(
            SimulatedChain::from_network_name("Ethereum Geth reorg"),
            Some(SimulatedChain::GethReorg)
        );
        assert_eq!(
            SimulatedChain::from_network_name("Ethereum Hardhat"),
            Some(SimulatedChain::Hardhat)
        );
        assert_eq!(SimulatedChain::from_network_name("Ethereum Mainnet"), None);
        assert_eq!(SimulatedChain::from_network_name(""), None);
    }
}
