use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::descriptor::{build_descriptor_with, DeploymentProfile, EnvironmentDescriptor};
use crate::error::PlatformError;
use crate::registry::ModelRegistry;

/// What the platform hands back after accepting an environment request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentHandle {
    pub app_name: String,
    /// Platform-specific locator (manifest path, deployment URL, ...).
    pub locator: String,
}

/// The hosting platform: allocates accelerators, mounts storage, injects
/// secrets and exposes ingress for a descriptor. Ember never does any of
/// that itself.
#[async_trait]
pub trait Platform: Send + Sync {
    fn name(&self) -> &str;

    async fn request_environment(
        &self,
        descriptor: &EnvironmentDescriptor,
    ) -> Result<EnvironmentHandle, PlatformError>;
}

/// Resolve `identifier`, build its descriptor and request an environment.
///
/// An unknown identifier fails before the platform sees anything.
pub async fn provision(
    registry: &ModelRegistry,
    identifier: &str,
    profile: &DeploymentProfile,
    platform: &dyn Platform,
) -> Result<(EnvironmentDescriptor, EnvironmentHandle), PlatformError> {
    let spec = registry.resolve(identifier)?;
    let descriptor = build_descriptor_with(&spec, profile);

    tracing::info!(
        model=%spec.identifier,
        accelerator=%spec.accelerator,
        platform=%platform.name(),
        app=%descriptor.app_name,
        "requesting environment"
    );
    let handle = platform.request_environment(&descriptor).await?;
    tracing::info!(app=%handle.app_name, locator=%handle.locator, "environment requested");
    Ok((descriptor, handle))
}

/// Writes each descriptor as `<dir>/<app_name>.json` for an external deploy
/// tool to pick up.
#[derive(Debug, Clone)]
pub struct ManifestPlatform {
    dir: PathBuf,
}

impl ManifestPlatform {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn manifest_path(&self, app_name: &str) -> PathBuf {
        self.dir.join(format!("{app_name}.json"))
    }
}

#[async_trait]
impl Platform for ManifestPlatform {
    fn name(&self) -> &str {
        "manifest"
    }

    async fn request_environment(
        &self,
        descriptor: &EnvironmentDescriptor,
    ) -> Result<EnvironmentHandle, PlatformError> {
        let path = self.manifest_path(&descriptor.app_name);
        let body = serde_json::to_vec_pretty(descriptor)?;

        let manifest_err = |source| PlatformError::Manifest {
            path: path.display().to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).await.map_err(manifest_err)?;
        fs::write(&path, body).await.map_err(manifest_err)?;

        Ok(EnvironmentHandle {
            app_name: descriptor.app_name.clone(),
            locator: path.display().to_string(),
        })
    }
}
