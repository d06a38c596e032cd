//! Core capability set shared by every deployable resource.
//!
//! Units (manifests, helm releases) and groups implement [`EnvResource`] so
//! the deployment driver and nested groups can treat them uniformly. The
//! lifecycle is two-phase: structural definition populates static values;
//! [`EnvResource::resolve`] runs the post-deploy hook once the underlying
//! resource is live, filling in runtime-dependent values. A resource's values
//! are only visible to dependents once its state is
//! [`ResourceState::Resolved`].

use anyhow::Result;
use futures::future::BoxFuture;
use serde::Serialize;

use crate::{
    error::EnvironmentError,
    orchestrator::{Orchestrator, RuntimeFacts},
    values::ValueSet,
};

/// Per-resource lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ResourceState {
    /// Structurally defined, not yet applied to the cluster.
    Defined,
    /// The underlying resource is live; the hook has not run yet.
    Deployed,
    /// The hook (if any) completed; values are final and readable.
    Resolved,
    /// Deployment or resolution failed. Terminal.
    Failed,
}

/// The deployable kinds known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ResourceKind {
    Manifest,
    Helm,
    Group,
}

/// Read view over the value sets of already-resolved resources, in
/// declaration order.
///
/// Declaration order is the sole dependency signal: a resource declared
/// *after* the reader is absent from this view even once the whole group has
/// resolved, so an out-of-order dependency shows up as a missing value rather
/// than silently succeeding.
pub struct ResolvedValues<'a> {
    entries: Vec<(&'a str, &'a ValueSet)>,
}

impl<'a> ResolvedValues<'a> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Collect the resolved members of an ordered slice, skipping anything
    /// not yet (or never) resolved.
    pub fn of_members(members: &'a [Box<dyn EnvResource>]) -> Self {
        Self::collect(members.iter().map(|m| m.as_ref() as &dyn EnvResource))
    }

    pub fn collect(resources: impl Iterator<Item = &'a dyn EnvResource>) -> Self {
        Self {
            entries: resources
                .filter(|r| r.state() == ResourceState::Resolved)
                .map(|r| (r.id(), r.values()))
                .collect(),
        }
    }

    /// This view followed by `later`, for handing a group's inherited view
    /// plus its own earlier members to a resolving member.
    pub fn and(&self, later: ResolvedValues<'a>) -> ResolvedValues<'a> {
        let mut entries = self.entries.clone();
        entries.extend(later.entries);
        ResolvedValues { entries }
    }

    /// The resolved value set of the resource with this id, if any.
    pub fn get(&self, id: &str) -> Option<&'a ValueSet> {
        self.entries
            .iter()
            .find(|(entry_id, _)| *entry_id == id)
            .map(|(_, values)| *values)
    }

    /// All resolved value sets whose resource id starts with `prefix`,
    /// in declaration order. Indexed units (`postgres-0`, `postgres-1`, ...)
    /// are addressed this way.
    pub fn with_id_prefix<'s>(
        &'s self,
        prefix: &'s str,
    ) -> impl Iterator<Item = (&'a str, &'a ValueSet)> + 's {
        self.entries
            .iter()
            .filter(move |(id, _)| id.starts_with(prefix))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ValueSet)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Context handed to a resolving resource by its enclosing group (or by the
/// top-level driver).
pub struct ResolveCtx<'a> {
    pub orchestrator: &'a dyn Orchestrator,
    /// Earlier-declared, already-resolved siblings.
    pub siblings: ResolvedValues<'a>,
}

/// Context a unit passes to its own post-deploy hook.
pub struct HookCtx<'a> {
    /// Runtime facts recorded when the unit was deployed.
    pub facts: &'a RuntimeFacts,
    pub orchestrator: &'a dyn Orchestrator,
    /// Earlier-declared, already-resolved siblings.
    pub siblings: &'a ResolvedValues<'a>,
}

/// A post-deploy hook: populates the remaining entries of a unit's value set
/// from runtime facts, in-pod commands or companion-service calls.
///
/// Runs exactly once per unit, after the underlying resource is confirmed
/// live. An error here aborts the unit's resolution; there is no
/// partial-success state.
pub trait SetValues: Send {
    fn set_values<'a>(
        &'a mut self,
        values: &'a mut ValueSet,
        ctx: HookCtx<'a>,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Adapter for hooks that derive values synchronously from runtime facts
/// alone, the common case for connection URLs.
pub struct FactValues<F>(pub F);

impl<F> SetValues for FactValues<F>
where
    F: FnMut(&RuntimeFacts, &mut ValueSet) -> Result<()> + Send,
{
    fn set_values<'a>(
        &'a mut self,
        values: &'a mut ValueSet,
        ctx: HookCtx<'a>,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(std::future::ready((self.0)(ctx.facts, values)))
    }
}

/// Serializable snapshot of a resource for plan rendering.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceSummary {
    pub id: String,
    pub kind: String,
    pub state: String,
    pub values: ValueSet,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<ResourceSummary>,
}

/// Capability set shared by all deployable resources.
pub trait EnvResource: Send {
    /// Identity, unique within the enclosing group.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn kind(&self) -> ResourceKind;

    fn state(&self) -> ResourceState;

    fn values(&self) -> &ValueSet;

    /// Mutable access to the value set during structural definition.
    fn values_mut(&mut self) -> &mut ValueSet;

    /// The value set, visible only once resolution has completed.
    fn resolved_values(&self) -> Option<&ValueSet> {
        (self.state() == ResourceState::Resolved).then(|| self.values())
    }

    /// Apply the underlying resource(s) through the orchestrator and block
    /// until live.
    fn deploy<'a>(
        &'a mut self,
        orchestrator: &'a dyn Orchestrator,
    ) -> BoxFuture<'a, Result<(), EnvironmentError>>;

    /// Run the post-deploy hook(s). Called exactly once, after [`Self::deploy`].
    fn resolve<'a>(&'a mut self, ctx: ResolveCtx<'a>)
    -> BoxFuture<'a, Result<(), EnvironmentError>>;

    fn describe(&self) -> ResourceSummary;
}
