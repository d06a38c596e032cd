//! Catalog of per-service unit constructors.
//!
//! Each constructor is a pure factory: given static parameters it returns a
//! unit pre-populated with static values and, where runtime values are
//! required, a post-deploy hook that derives them from the live resource's
//! connection descriptor.

pub mod adapter;
pub mod chainlink;
pub mod explorer;
pub mod ganache;
pub mod geth;
pub mod geth_reorg;
pub mod hardhat;
pub mod postgres;

pub use explorer::{ExplorerAdmin, HttpExplorerAdmin, NodeCredentials};

/// Ports for common services.
pub const ADAPTER_API_PORT: u16 = 6060;
pub const CHAINLINK_WEB_PORT: u16 = 6688;
pub const CHAINLINK_P2P_PORT: u16 = 6690;
pub const EVM_RPC_PORT: u16 = 8545;
pub const EXPLORER_API_PORT: u16 = 8080;
