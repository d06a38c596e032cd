//! External adapter service.

use crate::{
    catalog::ADAPTER_API_PORT,
    manifest::Manifest,
    orchestrator::RuntimeFacts,
    resource::FactValues,
    values::ValueSet,
};

/// The manifest that deploys an external adapter to an environment.
pub fn manifest() -> Manifest {
    Manifest::new("adapter", "templates/adapter-deployment.yml")
        .service_file("templates/adapter-service.yml")
        .value("apiPort", ADAPTER_API_PORT)
        .hook(FactValues(
            |facts: &RuntimeFacts, values: &mut ValueSet| {
                values.insert(
                    "clusterURL",
                    format!("http://{}:{}", facts.cluster_ip, facts.assigned_port(0)?),
                );
                values.insert(
                    "localURL",
                    format!("http://127.0.0.1:{}", facts.local_port(0)?),
                );
                Ok(())
            },
        ))
}
