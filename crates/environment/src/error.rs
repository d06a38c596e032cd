//! Error taxonomy for environment construction and resolution.

use thiserror::Error;

/// Errors produced by the composition and resolution engine.
///
/// Hook internals and orchestrator calls use `anyhow`; the engine wraps them
/// here with the identity of the owning resource so a failure deep inside a
/// nested group can be traced back through every enclosing level.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    /// A static programmer error in unit assembly. Never retried.
    #[error("invalid definition for '{id}': {reason}")]
    Construction { id: String, reason: String },

    /// The orchestrator failed to apply the resource or it never became ready.
    #[error("deployment of '{id}' failed")]
    Deployment {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A post-deploy hook failed, either because an expected descriptor was
    /// absent (e.g. zero matching pods) or a companion call failed.
    #[error("resolution of '{id}' failed")]
    Resolution {
        id: String,
        #[source]
        source: anyhow::Error,
    },

    /// A release-registry or admin-API call failed.
    #[error("external service call failed")]
    ExternalService {
        #[source]
        source: anyhow::Error,
    },

    /// An operation was attempted in the wrong lifecycle phase.
    #[error("operation requires phase {expected}, but the environment is {actual}")]
    Phase {
        expected: &'static str,
        actual: String,
    },
}

impl EnvironmentError {
    pub(crate) fn construction(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Construction {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn deployment(id: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Deployment {
            id: id.into(),
            source,
        }
    }

    pub(crate) fn resolution(id: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Resolution {
            id: id.into(),
            source,
        }
    }
}
