use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;

/// The recipe used to assemble the environment spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Recipe {
    /// Chainlink cluster with one database per node and an adapter.
    Basic,
    /// Basic cluster plus a block explorer for alerts testing.
    Alerts,
    /// Cluster mixing the latest build with past release versions.
    MixedVersion,
}

/// Output format for the rendered plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Format {
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "testrig")]
#[command(
    author,
    version,
    about = "Render composite deployment plans for ephemeral multi-service test environments"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "TESTRIG_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The recipe to assemble.
    #[arg(short, long, env = "TESTRIG_RECIPE", default_value_t = Recipe::Basic)]
    pub recipe: Recipe,

    /// Number of chainlink nodes in the cluster.
    #[arg(short, long, env = "TESTRIG_NODES", default_value_t = 3)]
    pub nodes: usize,

    /// Number of past release versions to mix in (mixed-version recipe only).
    #[arg(long, env = "TESTRIG_PAST_VERSIONS", default_value_t = 2)]
    pub past_versions: usize,

    /// Path to a TOML network configuration file.
    #[arg(short, long, env = "TESTRIG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Network name override (e.g. "Ethereum Hardhat"). Takes precedence
    /// over the configuration file.
    #[arg(long, env = "TESTRIG_NETWORK")]
    pub network: Option<String>,

    /// Output format for the rendered plan.
    #[arg(short, long, env = "TESTRIG_FORMAT", default_value_t = Format::Table)]
    pub format: Format,
}
