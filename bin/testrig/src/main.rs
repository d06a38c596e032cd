//! testrig is a CLI tool to render composite deployment plans for ephemeral
//! multi-service test environments.

mod cli;
mod plan;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};

use cli::{Cli, Format, Recipe};
use testrig_environment::{
    GithubReleases, NetworkConfig,
    catalog::HttpExplorerAdmin,
    recipes::{
        chainlink_cluster, chainlink_cluster_for_alerts_testing, mixed_version_chainlink_cluster,
    },
};

/// Network used when neither a config file nor an override is provided.
const DEFAULT_NETWORK_NAME: &str = "Ethereum Hardhat";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let network = load_network(&cli)?;

    tracing::info!(
        recipe = %cli.recipe,
        nodes = cli.nodes,
        network = %network.name,
        "Assembling environment spec..."
    );

    let init = match cli.recipe {
        Recipe::Basic => chainlink_cluster(cli.nodes),
        Recipe::Alerts => {
            let admin = Arc::new(HttpExplorerAdmin::new()?);
            chainlink_cluster_for_alerts_testing(cli.nodes, admin)
        }
        Recipe::MixedVersion => {
            let registry = GithubReleases::new()?;
            mixed_version_chainlink_cluster(cli.nodes, cli.past_versions, &registry).await
        }
    };

    let spec = init(&network);
    let summary = spec.describe();

    match cli.format {
        Format::Table => println!("{}", plan::render_table(&summary)),
        Format::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize plan")?
        ),
    }

    Ok(())
}

/// Load the network configuration: defaults, then the TOML file, then
/// `TESTRIG_NET_*` environment overrides, then the `--network` flag.
fn load_network(cli: &Cli) -> Result<NetworkConfig> {
    let mut figment = Figment::from(Serialized::defaults(NetworkConfig::named(
        DEFAULT_NETWORK_NAME,
    )));
    if let Some(path) = &cli.config {
        figment = figment.merge(Toml::file(path));
    }
    figment = figment.merge(Env::prefixed("TESTRIG_NET_"));

    let mut network: NetworkConfig = figment
        .extract()
        .context("Failed to load network configuration")?;
    if let Some(name) = &cli.network {
        network.name = name.clone();
    }
    Ok(network)
}
