pub mod ollama;
pub mod open_webui;

use std::process::ExitStatus;

use async_trait::async_trait;
use tokio::process::Child;

pub use ollama::{OllamaConfig, OllamaServer};
pub use open_webui::{OpenWebUi, OpenWebUiConfig};

/// How a service process is owned.
pub enum ServiceProcess {
    /// A locally spawned child process.
    Child(Child),
    /// Externally managed; the orchestrator does not control its lifecycle.
    External,
}

/// Owned handle to a launched background service.
pub struct ServiceHandle {
    pub name: String,
    pub process: ServiceProcess,
}

impl ServiceHandle {
    pub fn child(name: impl Into<String>, child: Child) -> Self {
        Self {
            name: name.into(),
            process: ServiceProcess::Child(child),
        }
    }

    pub fn external(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            process: ServiceProcess::External,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        match &self.process {
            ServiceProcess::Child(child) => child.id(),
            ServiceProcess::External => None,
        }
    }

    /// Exit status if the process has already terminated. Never blocks.
    pub fn exit_status(&mut self) -> Option<ExitStatus> {
        match &mut self.process {
            ServiceProcess::Child(child) => child.try_wait().ok().flatten(),
            ServiceProcess::External => None,
        }
    }

    pub fn is_alive(&mut self) -> bool {
        self.exit_status().is_none()
    }

    /// Resolve once the process exits. Pends forever for external services.
    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        match &mut self.process {
            ServiceProcess::Child(child) => child.wait().await,
            ServiceProcess::External => std::future::pending().await,
        }
    }

    pub async fn terminate(&mut self) {
        if let ServiceProcess::Child(child) = &mut self.process {
            tracing::info!(service=%self.name, pid=?child.id(), "terminating service");
            let _ = child.kill().await;
        }
    }
}

/// Captured result of a model fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl FetchOutput {
    /// Text worth surfacing on failure: stderr if present, else stdout.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// The model-serving process (Ollama).
#[async_trait]
pub trait InferenceServer: Send + Sync {
    fn name(&self) -> &str;

    /// Launch the server in the background.
    async fn start(&self) -> anyhow::Result<ServiceHandle>;

    /// One readiness probe. Must return promptly.
    async fn probe(&self) -> bool;

    /// Pull `identifier` into the model store and wait for it to finish.
    /// `Err` means the fetch could not be invoked at all.
    async fn fetch_model(&self, identifier: &str) -> anyhow::Result<FetchOutput>;
}

/// The user-facing web front end.
#[async_trait]
pub trait UiServer: Send + Sync {
    fn name(&self) -> &str;

    async fn start(&self) -> anyhow::Result<ServiceHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_prefers_stderr() {
        let out = FetchOutput {
            stdout: "pulling manifest\n".to_string(),
            stderr: "Error: pull model manifest: file does not exist\n".to_string(),
            success: false,
        };
        assert_eq!(
            out.diagnostic(),
            "Error: pull model manifest: file does not exist"
        );

        let out = FetchOutput {
            stdout: "connection refused\n".to_string(),
            ..FetchOutput::default()
        };
        assert_eq!(out.diagnostic(), "connection refused");
    }

    #[tokio::test]
    async fn test_external_handle_is_alive() {
        let mut h = ServiceHandle::external("ui");
        assert!(h.is_alive());
        assert_eq!(h.pid(), None);
        h.terminate().await;
        assert!(h.is_alive());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_handle_observes_exit() {
        let child = tokio::process::Command::new("sh")
            .args(["-c", "exit 3"])
            .spawn()
            .unwrap();
        let mut h = ServiceHandle::child("short", child);
        let status = h.wait().await.unwrap();
        assert_eq!(status.code(), Some(3));
        assert!(!h.is_alive());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_terminate_kills_child() {
        let child = tokio::process::Command::new("sleep")
            .arg("30")
            .spawn()
            .unwrap();
        let mut h = ServiceHandle::child("sleeper", child);
        assert!(h.is_alive());
        h.terminate().await;
        assert!(!h.is_alive());
    }
}
