//! A single-manifest deployable unit.

use std::path::PathBuf;

use futures::future::BoxFuture;

use crate::{
    error::EnvironmentError,
    orchestrator::{DeployDescriptor, DeployKind, Orchestrator, RuntimeFacts, SecretSpec},
    resource::{
        EnvResource, HookCtx, ResolveCtx, ResourceKind, ResourceState, ResourceSummary, SetValues,
    },
    values::ValueSet,
};

/// One addressable cluster resource described by template files.
///
/// Built by a catalog constructor with its static values pre-populated and,
/// where runtime values are required, a post-deploy hook that derives them
/// from the live resource's connection descriptor.
pub struct Manifest {
    id: String,
    deployment_file: PathBuf,
    service_file: Option<PathBuf>,
    config_map_file: Option<PathBuf>,
    secret: Option<SecretSpec>,
    values: ValueSet,
    hook: Option<Box<dyn SetValues>>,
    facts: Option<RuntimeFacts>,
    state: ResourceState,
}

impl Manifest {
    pub fn new(id: impl Into<String>, deployment_file: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            deployment_file: deployment_file.into(),
            service_file: None,
            config_map_file: None,
            secret: None,
            values: ValueSet::new(),
            hook: None,
            facts: None,
            state: ResourceState::Defined,
        }
    }

    pub fn service_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.service_file = Some(path.into());
        self
    }

    pub fn config_map_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_map_file = Some(path.into());
        self
    }

    pub fn secret(mut self, secret: SecretSpec) -> Self {
        self.secret = Some(secret);
        self
    }

    /// Set a static value at definition time.
    pub fn value(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn hook(mut self, hook: impl SetValues + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Append an index suffix to the id, for repeated kinds (`chainlink-0`).
    pub fn indexed(mut self, index: usize) -> Self {
        self.id = format!("{}-{}", self.id, index);
        self
    }

    /// Runtime facts recorded at deployment, if deployed.
    pub fn facts(&self) -> Option<&RuntimeFacts> {
        self.facts.as_ref()
    }

    pub fn descriptor(&self) -> DeployDescriptor {
        DeployDescriptor {
            id: self.id.clone(),
            values: self.values.clone(),
            kind: DeployKind::Manifest {
                deployment_file: self.deployment_file.clone(),
                service_file: self.service_file.clone(),
                config_map_file: self.config_map_file.clone(),
                secret: self.secret.clone(),
            },
        }
    }
}

impl EnvResource for Manifest {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Manifest
    }

    fn state(&self) -> ResourceState {
        self.state
    }

    fn values(&self) -> &ValueSet {
        &self.values
    }

    fn values_mut(&mut self) -> &mut ValueSet {
        &mut self.values
    }

    fn deploy<'a>(
        &'a mut self,
        orchestrator: &'a dyn Orchestrator,
    ) -> BoxFuture<'a, Result<(), EnvironmentError>> {
        Box::pin(async move {
            if self.state != ResourceState::Defined {
                return Err(EnvironmentError::Phase {
                    expected: "Defined",
                    actual: self.state.to_string(),
                });
            }
            tracing::debug!(id = %self.id, "applying manifest");
            match orchestrator.deploy(self.descriptor()).await {
                Ok(facts) => {
                    tracing::debug!(id = %self.id, cluster_ip = %facts.cluster_ip, "manifest live");
                    self.facts = Some(facts);
                    self.state = ResourceState::Deployed;
                    Ok(())
                }
                Err(source) => {
                    self.state = ResourceState::Failed;
                    Err(EnvironmentError::deployment(&self.id, source))
                }
            }
        })
    }

    fn resolve<'a>(
        &'a mut self,
        ctx: ResolveCtx<'a>,
    ) -> BoxFuture<'a, Result<(), EnvironmentError>> {
        Box::pin(async move {
            if self.state != ResourceState::Deployed {
                return Err(EnvironmentError::Phase {
                    expected: "Deployed",
                    actual: self.state.to_string(),
                });
            }
            let Some(hook) = self.hook.as_mut() else {
                self.state = ResourceState::Resolved;
                return Ok(());
            };
            let Some(facts) = self.facts.as_ref() else {
                // Deployed implies recorded facts.
                self.state = ResourceState::Failed;
                return Err(EnvironmentError::construction(
                    &self.id,
                    "deployed without recorded runtime facts",
                ));
            };
            let hook_ctx = HookCtx {
                facts,
                orchestrator: ctx.orchestrator,
                siblings: &ctx.siblings,
            };
            let result = hook.set_values(&mut self.values, hook_ctx).await;
            match result {
                Ok(()) => {
                    self.state = ResourceState::Resolved;
                    Ok(())
                }
                Err(source) => {
                    self.state = ResourceState::Failed;
                    Err(EnvironmentError::resolution(&self.id, source))
                }
            }
        })
    }

    fn describe(&self) -> ResourceSummary {
        ResourceSummary {
            id: self.id.clone(),
            kind: self.kind().to_string(),
            state: self.state.to_string(),
            values: self.values.clone(),
            members: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        orchestrator::{ExecOutput, ServiceDetail},
        resource::{FactValues, ResolvedValues},
    };

    struct NullOrchestrator;

    impl Orchestrator for NullOrchestrator {
        fn deploy<'a>(
            &'a self,
            _descriptor: DeployDescriptor,
        ) -> BoxFuture<'a, anyhow::Result<RuntimeFacts>> {
            Box::pin(std::future::ready(Ok(RuntimeFacts::default())))
        }

        fn exec_in_pod<'a>(
            &'a self,
            _pod_name: &'a str,
            _container: &'a str,
            _command: &'a [String],
        ) -> BoxFuture<'a, anyhow::Result<ExecOutput>> {
            Box::pin(std::future::ready(Ok(ExecOutput::default())))
        }

        fn service_details<'a>(
            &'a self,
            _release_name: &'a str,
        ) -> BoxFuture<'a, anyhow::Result<Vec<ServiceDetail>>> {
            Box::pin(std::future::ready(Ok(Vec::new())))
        }
    }

    #[tokio::test]
    async fn test_resolve_without_facts_is_terminal() {
        let mut manifest = Manifest::new("unit", "templates/unit.yml")
            .hook(FactValues(|_: &RuntimeFacts, _: &mut ValueSet| Ok(())));
        manifest.state = ResourceState::Deployed;

        let ctx = ResolveCtx {
            orchestrator: &NullOrchestrator,
            siblings: ResolvedValues::empty(),
        };
        let error = manifest.resolve(ctx).await.unwrap_err();
        assert!(matches!(error, EnvironmentError::Construction { .. }));
        assert_eq!(manifest.state(), ResourceState::Failed);
    }
}
