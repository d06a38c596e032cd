//! testrig-environment - composite deployment specs for ephemeral test environments.
//!
//! This crate builds ordered, fully wired deployment plans for multi-service
//! test environments (chainlink nodes, databases, chain simulators, an
//! adapter, an explorer) on top of an external cluster orchestrator. Units
//! and groups share one capability set ([`EnvResource`]) and resolve their
//! runtime-dependent connection values through post-deploy hooks, in
//! declaration order.

pub mod catalog;
mod config;
mod error;
mod group;
mod helm;
mod manifest;
mod orchestrator;
pub mod recipes;
mod registry;
mod resource;
mod spec;
mod values;

pub use config::{NetworkConfig, SimulatedChain};
pub use error::EnvironmentError;
pub use group::{GroupHook, ResourceGroup};
pub use helm::HelmRelease;
pub use manifest::Manifest;
pub use orchestrator::{
    DeployDescriptor, DeployKind, ExecOutput, Orchestrator, RuntimeFacts, SecretSpec,
    ServiceDetail,
};
pub use registry::{GithubReleases, Release, ReleaseRegistry, version_from_tag};
pub use resource::{
    EnvResource, FactValues, HookCtx, ResolveCtx, ResolvedValues, ResourceKind, ResourceState,
    ResourceSummary, SetValues,
};
pub use spec::{EnvironmentSpec, SpecInit, SpecPhase, SpecSummary};
pub use values::ValueSet;
