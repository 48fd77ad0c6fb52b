use thiserror::Error;

/// Configuration-time failure: the requested model is not in the registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("model '{identifier}' is not in the model registry")]
    UnknownModel { identifier: String },
}

/// Failure handing a descriptor to the platform.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error(transparent)]
    Configuration(#[from] RegistryError),

    #[error("failed to write environment manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize environment descriptor: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("platform rejected environment request: {0}")]
    Rejected(String),
}
