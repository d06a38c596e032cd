//! Multi-node geth network capable of chain reorgs, deployed as a helm chart.

use anyhow::{Context, Result};
use futures::future::BoxFuture;

use crate::{
    catalog::EVM_RPC_PORT,
    helm::HelmRelease,
    resource::{HookCtx, SetValues},
    values::ValueSet,
};

const RELEASE_NAME: &str = "reorg-1";

/// The helm chart that deploys a multi-node geth network.
pub fn helm_chart() -> HelmRelease {
    HelmRelease::new("evm", "charts/geth-reorg", RELEASE_NAME).hook(ReorgEndpoints {
        release_name: RELEASE_NAME.to_string(),
    })
}

/// Self-discovers the websocket endpoints of the reorg network through the
/// orchestrator's service details, since a helm release does not know its
/// ports up front.
struct ReorgEndpoints {
    release_name: String,
}

impl SetValues for ReorgEndpoints {
    fn set_values<'a>(
        &'a mut self,
        values: &'a mut ValueSet,
        ctx: HookCtx<'a>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            let details = ctx
                .orchestrator
                .service_details(&self.release_name)
                .await
                .with_context(|| {
                    format!("fetching service details for release '{}'", self.release_name)
                })?;
            for detail in &details {
                if detail.remote_url.port() == Some(EVM_RPC_PORT) {
                    values.insert(
                        "clusterURL",
                        detail.remote_url.as_str().replacen("http", "ws", 1),
                    );
                    values.insert(
                        "localURL",
                        detail.local_url.as_str().replacen("http", "ws", 1),
                    );
                }
            }
            values.insert("rpcPort", EVM_RPC_PORT);
            Ok(())
        })
    }
}
