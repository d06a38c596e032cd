//! A helm-release deployable unit.

use std::path::PathBuf;

use futures::future::BoxFuture;

use crate::{
    error::EnvironmentError,
    orchestrator::{DeployDescriptor, DeployKind, Orchestrator, RuntimeFacts},
    resource::{
        EnvResource, HookCtx, ResolveCtx, ResourceKind, ResourceState, ResourceSummary, SetValues,
    },
    values::ValueSet,
};

/// A single helm release.
///
/// Helm-based resources usually do not know their endpoints up front; their
/// hooks self-discover them through
/// [`Orchestrator::service_details`](crate::orchestrator::Orchestrator::service_details).
pub struct HelmRelease {
    id: String,
    chart_path: PathBuf,
    release_name: String,
    values: ValueSet,
    hook: Option<Box<dyn SetValues>>,
    facts: Option<RuntimeFacts>,
    state: ResourceState,
}

impl HelmRelease {
    pub fn new(
        id: impl Into<String>,
        chart_path: impl Into<PathBuf>,
        release_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            chart_path: chart_path.into(),
            release_name: release_name.into(),
            values: ValueSet::new(),
            hook: None,
            facts: None,
            state: ResourceState::Defined,
        }
    }

    pub fn value(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn hook(mut self, hook: impl SetValues + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn release_name(&self) -> &str {
        &self.release_name
    }

    pub fn descriptor(&self) -> DeployDescriptor {
        DeployDescriptor {
            id: self.id.clone(),
            values: self.values.clone(),
            kind: DeployKind::Helm {
                chart_path: self.chart_path.clone(),
                release_name: self.release_name.clone(),
            },
        }
    }
}

impl EnvResource for HelmRelease {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Helm
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
            tracing::debug!(id = %self.id, release = %self.release_name, "installing helm release");
            match orchestrator.deploy(self.descriptor()).await {
                Ok(facts) => {
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
        let mut release = HelmRelease::new("evm", "charts/geth-reorg", "reorg-1")
            .hook(FactValues(|_: &RuntimeFacts, _: &mut ValueSet| Ok(())));
        release.state = ResourceState::Deployed;

        let ctx = ResolveCtx {
            orchestrator: &NullOrchestrator,
            siblings: ResolvedValues::empty(),
        };
        let error = release.resolve(ctx).await.unwrap_err();
        assert!(matches!(error, EnvironmentError::Construction { .. }));
        assert_eq!(release.state(), ResourceState::Failed);
    }
}
