pub mod accelerator;
pub mod descriptor;
pub mod error;
pub mod platform;
pub mod registry;

pub use accelerator::{AcceleratorProfile, GpuClass};
pub use descriptor::{
    build_descriptor, build_descriptor_with, DeploymentProfile, EnvironmentDescriptor,
    StorageMount, OLLAMA_MODELS_ENV,
};
pub use error::{PlatformError, RegistryError};
pub use platform::{provision, EnvironmentHandle, ManifestPlatform, Platform};
pub use registry::{resolve_accelerator, ModelEntry, ModelRegistry, ModelSpec, DEFAULT_MODEL};

pub mod telemetry;
