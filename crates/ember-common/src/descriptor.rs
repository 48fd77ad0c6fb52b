use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::accelerator::AcceleratorProfile;
use crate::registry::ModelSpec;

/// Environment variable Ollama reads its model directory from.
pub const OLLAMA_MODELS_ENV: &str = "OLLAMA_MODELS";

/// Fixed operational constants of a deployment.
///
/// `Default` carries the production values; operators may inject another
/// profile when building a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentProfile {
    pub deployment_name: String,
    pub mount_path: PathBuf,
    pub max_concurrent_requests: u32,
    pub max_parallel_instances: u32,
    pub idle_instance_floor: u32,
    pub request_timeout: Duration,
    pub startup_timeout: Duration,
    pub http_port: u16,
    pub secrets: BTreeSet<String>,
}

impl Default for DeploymentProfile {
    fn default() -> Self {
        Self {
            deployment_name: "deepseekr1-openwebui".to_string(),
            mount_path: PathBuf::from("/root/models/"),
            max_concurrent_requests: 100,
            max_parallel_instances: 1,
            idle_instance_floor: 1,
            request_timeout: Duration::from_secs(60 * 60 * 24),
            startup_timeout: Duration::from_secs(1200),
            http_port: 8080,
            secrets: BTreeSet::from(["open-webui-secrets".to_string()]),
        }
    }
}

impl DeploymentProfile {
    pub fn app_name(&self) -> String {
        format!("{}-app", self.deployment_name)
    }

    pub fn volume_name(&self) -> String {
        format!("{}-volume", self.deployment_name)
    }
}

/// Persistent volume attached to every instance of a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageMount {
    pub volume: String,
    pub mount_path: PathBuf,
    /// Create the volume on first use.
    #[serde(default)]
    pub create_if_missing: bool,
}

/// Resource shape the platform has to realize for one deployment.
///
/// Built once at configuration time and handed to the platform as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentDescriptor {
    pub app_name: String,
    pub model: String,
    pub accelerator: AcceleratorProfile,
    pub storage_mount: StorageMount,
    pub max_concurrent_requests: u32,
    pub max_parallel_instances: u32,
    pub idle_instance_floor: u32,
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub startup_timeout: Duration,
    pub http_port: u16,
    pub injected_secrets: BTreeSet<String>,
    #[serde(default)]
    pub environment: BTreeMap<String, String>,
}

/// Build the descriptor for `spec` with the production constants.
pub fn build_descriptor(spec: &ModelSpec) -> EnvironmentDescriptor {
    build_descriptor_with(spec, &DeploymentProfile::default())
}

pub fn build_descriptor_with(spec: &ModelSpec, profile: &DeploymentProfile) -> EnvironmentDescriptor {
    let mut environment = BTreeMap::new();
    environment.insert(
        OLLAMA_MODELS_ENV.to_string(),
        profile.mount_path.to_string_lossy().to_string(),
    );

    EnvironmentDescriptor {
        app_name: profile.app_name(),
        model: spec.identifier.clone(),
        accelerator: spec.accelerator,
        storage_mount: StorageMount {
            volume: profile.volume_name(),
            mount_path: profile.mount_path.clone(),
            create_if_missing: true,
        },
        max_concurrent_requests: profile.max_concurrent_requests,
        max_parallel_instances: profile.max_parallel_instances,
        idle_instance_floor: profile.idle_instance_floor,
        request_timeout: profile.request_timeout,
        startup_timeout: profile.startup_timeout,
        http_port: profile.http_port,
        injected_secrets: profile.secrets.clone(),
        environment,
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}
