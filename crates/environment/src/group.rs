//! Ordered collections of deployable resources.

use anyhow::Result;
use futures::future::BoxFuture;

use crate::{
    error::EnvironmentError,
    orchestrator::Orchestrator,
    resource::{
        EnvResource, ResolveCtx, ResolvedValues, ResourceKind, ResourceState, ResourceSummary,
    },
    values::ValueSet,
};

/// A group-level hook, run after every member has resolved, with all
/// members' resolved values visible. Typically aggregates member values
/// (e.g. collects every database's cluster URL into one ordered list).
pub type GroupHook = Box<dyn FnMut(&ResolvedValues<'_>, &mut ValueSet) -> Result<()> + Send>;

/// An ordered collection of deployable units or nested groups.
///
/// Declaration order is preserved and is the *sole* ordering signal: there is
/// no dependency graph and no cycle detection. Declare members in the order
/// their values are needed: database units before anything that aggregates
/// database URLs.
pub struct ResourceGroup {
    id: String,
    members: Vec<Box<dyn EnvResource>>,
    values: ValueSet,
    hook: Option<GroupHook>,
    state: ResourceState,
}

impl ResourceGroup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
            values: ValueSet::new(),
            hook: None,
            state: ResourceState::Defined,
        }
    }

    pub fn member(mut self, member: impl EnvResource + 'static) -> Self {
        self.members.push(Box::new(member));
        self
    }

    pub fn push(&mut self, member: impl EnvResource + 'static) {
        self.members.push(Box::new(member));
    }

    pub fn hook(
        mut self,
        hook: impl FnMut(&ResolvedValues<'_>, &mut ValueSet) -> Result<()> + Send + 'static,
    ) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn members(&self) -> &[Box<dyn EnvResource>] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [Box<dyn EnvResource>] {
        &mut self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl EnvResource for ResourceGroup {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn kind(&self) -> ResourceKind {
        ResourceKind::Group
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
            tracing::info!(group = %self.id, members = self.members.len(), "deploying group");
            for member in &mut self.members {
                if let Err(error) = member.deploy(orchestrator).await {
                    self.state = ResourceState::Failed;
                    return Err(error);
                }
            }
            self.state = ResourceState::Deployed;
            Ok(())
        })
    }

    /// Resolve depth-first, in declaration order. Each member sees the
    /// resolved values of its earlier-declared siblings; the group's own hook
    /// runs last with every member visible. The first failure halts the
    /// subtree; already-resolved siblings keep their values.
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
            for index in 0..self.members.len() {
                let (resolved, remaining) = self.members.split_at_mut(index);
                let member = &mut remaining[0];
                // Members see the group's inherited view (earlier top-level
                // groups) followed by their earlier-declared siblings.
                let member_ctx = ResolveCtx {
                    orchestrator: ctx.orchestrator,
                    siblings: ctx.siblings.and(ResolvedValues::of_members(&*resolved)),
                };
                if let Err(error) = member.resolve(member_ctx).await {
                    self.state = ResourceState::Failed;
                    return Err(EnvironmentError::resolution(
                        &self.id,
                        anyhow::Error::new(error),
                    ));
                }
            }
            if let Some(hook) = self.hook.as_mut() {
                let view = ResolvedValues::of_members(&self.members);
                if let Err(source) = hook(&view, &mut self.values) {
                    self.state = ResourceState::Failed;
                    return Err(EnvironmentError::resolution(&self.id, source));
                }
            }
            self.state = ResourceState::Resolved;
            tracing::debug!(group = %self.id, "group resolved");
            Ok(())
        })
    }

    fn describe(&self) -> ResourceSummary {
        ResourceSummary {
            id: self.id.clone(),
            kind: self.kind().to_string(),
            state: self.state.to_string(),
            values: self.values.clone(),
            members: self.members.iter().map(|m| m.describe()).collect(),
        }
    }
}
