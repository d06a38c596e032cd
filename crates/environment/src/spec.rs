//! The environment spec: a named, ordered deployment plan.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    config::NetworkConfig,
    error::EnvironmentError,
    group::ResourceGroup,
    orchestrator::Orchestrator,
    resource::{EnvResource, ResolveCtx, ResolvedValues, ResourceSummary},
    values::ValueSet,
};

/// Lifecycle phase of an environment spec.
///
/// No transition skips a phase; `Resolved` requires `Deployed`; a failure
/// anywhere during execution leaves the spec in the terminal `Failed` phase
/// with no automatic rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SpecPhase {
    /// Under assembly by a recipe.
    Draft,
    /// Structurally complete; static values populated; ready to execute.
    StaticallyPopulated,
    /// Handed to the orchestrator; groups are being applied and resolved.
    Deployed,
    /// Every group resolved; all values final.
    Resolved,
    /// Execution failed. Terminal.
    Failed,
}

/// A recipe's product: builds an [`EnvironmentSpec`] once the external
/// network configuration is known.
pub type SpecInit = Box<dyn FnOnce(&NetworkConfig) -> EnvironmentSpec + Send>;

/// Serializable snapshot of a whole spec.
#[derive(Debug, Clone, Serialize)]
pub struct SpecSummary {
    pub name: String,
    pub phase: String,
    pub groups: Vec<ResourceSummary>,
}

/// A named, ordered sequence of top-level resource groups.
///
/// Produced once per environment instantiation by a recipe, mutated in place
/// as deployment and hook execution proceed, and discarded at teardown
/// (teardown itself is external).
pub struct EnvironmentSpec {
    name: String,
    groups: Vec<ResourceGroup>,
    phase: SpecPhase,
}

impl EnvironmentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
            phase: SpecPhase::Draft,
        }
    }

    /// Append a top-level group. Only meaningful while drafting; a group
    /// pushed after [`Self::freeze`] is rejected.
    pub fn group(mut self, group: ResourceGroup) -> Self {
        if self.phase == SpecPhase::Draft {
            self.groups.push(group);
        } else {
            tracing::error!(
                spec = %self.name,
                group = %group.id(),
                phase = %self.phase,
                "ignoring group pushed after freeze"
            );
        }
        self
    }

    /// Mark the structural definition complete.
    pub fn freeze(mut self) -> Self {
        if self.phase == SpecPhase::Draft {
            self.phase = SpecPhase::StaticallyPopulated;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phase(&self) -> SpecPhase {
        self.phase
    }

    pub fn groups(&self) -> &[ResourceGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [ResourceGroup] {
        &mut self.groups
    }

    /// Deploy and resolve every group, in declaration order.
    ///
    /// Each group is fully deployed and fully resolved before the next group
    /// is touched, so later groups consume earlier groups' resolved values.
    /// Execution is sequential; the first failure halts the walk, leaves
    /// already-resolved resources with their values, and moves the spec to
    /// `Failed`.
    pub async fn execute(
        &mut self,
        orchestrator: &dyn Orchestrator,
    ) -> Result<(), EnvironmentError> {
        if self.phase != SpecPhase::StaticallyPopulated {
            return Err(EnvironmentError::Phase {
                expected: "StaticallyPopulated",
                actual: self.phase.to_string(),
            });
        }
        tracing::info!(spec = %self.name, groups = self.groups.len(), "executing environment spec");
        self.phase = SpecPhase::Deployed;

        for index in 0..self.groups.len() {
            let (resolved, remaining) = self.groups.split_at_mut(index);
            let group = &mut remaining[0];

            if let Err(error) = group.deploy(orchestrator).await {
                self.phase = SpecPhase::Failed;
                return Err(error);
            }

            let ctx = ResolveCtx {
                orchestrator,
                siblings: ResolvedValues::collect(
                    resolved.iter().map(|g| g as &dyn EnvResource),
                ),
            };
            if let Err(error) = group.resolve(ctx).await {
                self.phase = SpecPhase::Failed;
                return Err(error);
            }
        }

        self.phase = SpecPhase::Resolved;
        tracing::info!(spec = %self.name, "environment spec resolved");
        Ok(())
    }

    /// Every group's resolved values, keyed by group id. Only available once
    /// the spec has fully resolved.
    pub fn resolved_values(&self) -> Result<BTreeMap<&str, &ValueSet>, EnvironmentError> {
        if self.phase != SpecPhase::Resolved {
            return Err(EnvironmentError::Phase {
                expected: "Resolved",
                actual: self.phase.to_string(),
            });
        }
        Ok(self
            .groups
            .iter()
            .map(|group| (group.id(), group.values()))
            .collect())
    }

    pub fn describe(&self) -> SpecSummary {
        SpecSummary {
            name: self.name.clone(),
            phase: self.phase.to_string(),
            groups: self.groups.iter().map(|g| g.describe()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_after_freeze_is_rejected() {
        let spec = EnvironmentSpec::new("test")
            .group(ResourceGroup::new("a"))
            .freeze()
            .group(ResourceGroup::new("b"));

        assert_eq!(spec.phase(), SpecPhase::StaticallyPopulated);
        assert_eq!(spec.groups().len(), 1);
    }

    #[test]
    fn test_resolved_values_requires_resolved_phase() {
        let spec = EnvironmentSpec::new("test").freeze();
        assert!(matches!(
            spec.resolved_values(),
            Err(EnvironmentError::Phase { .. })
        ));
    }
}
