use std::time::Duration;

use thiserror::Error;

use ember_common::RegistryError;

use crate::state::Stage;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal bootstrap failure. Nothing here is retried by the caller; the
/// platform decides whether to recycle the instance.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Configuration(#[from] RegistryError),

    #[error("failed to launch {service}: {source}")]
    Launch {
        stage: Stage,
        service: String,
        #[source]
        source: BoxError,
    },

    #[error("{service} not ready after {waited:?}")]
    Readiness { service: String, waited: Duration },

    #[error("failed to fetch model '{model}' after {attempts} attempt(s): {diagnostic}")]
    Fetch {
        model: String,
        attempts: u32,
        diagnostic: String,
    },

    #[error("{service} exited unexpectedly ({status})")]
    ServiceExited {
        stage: Stage,
        service: String,
        status: String,
    },

    #[error("unexpected failure during {stage}: {source}")]
    Unexpected {
        stage: Stage,
        #[source]
        source: BoxError,
    },
}

impl BootstrapError {
    /// Stage the sequence was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            BootstrapError::Configuration(_) => Stage::Configure,
            BootstrapError::Launch { stage, .. } => *stage,
            BootstrapError::Readiness { .. } => Stage::Readiness,
            BootstrapError::Fetch { .. } => Stage::ModelFetch,
            BootstrapError::ServiceExited { stage, .. } => *stage,
            BootstrapError::Unexpected { stage, .. } => *stage,
        }
    }

    /// Short fault class used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            BootstrapError::Configuration(_) => "configuration",
            BootstrapError::Launch { .. } => "launch",
            BootstrapError::Readiness { .. } => "readiness",
            BootstrapError::Fetch { .. } => "fetch",
            BootstrapError::ServiceExited { .. } => "service_exited",
            BootstrapError::Unexpected { .. } => "unexpected",
        }
    }

    pub(crate) fn launch(stage: Stage, service: &str, err: anyhow::Error) -> Self {
        BootstrapError::Launch {
            stage,
            service: service.to_string(),
            source: err.into(),
        }
    }

    pub(crate) fn unexpected(stage: Stage, err: impl Into<BoxError>) -> Self {
        BootstrapError::Unexpected {
            stage,
            source: err.into(),
        }
    }
}
