use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

use ember_common::OLLAMA_MODELS_ENV;

use super::{FetchOutput, InferenceServer, ServiceHandle};

/// Ollama settings taken from the node CLI args.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub bin: String,
    /// `host:port` the server binds and clients dial.
    pub host: String,
    pub models_dir: PathBuf,
}

pub struct OllamaServer {
    pub config: OllamaConfig,
    http: reqwest::Client,
}

impl OllamaServer {
    pub fn new(config: OllamaConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(3))
            .build()
            .context("failed to build ollama probe client")?;
        Ok(Self { config, http })
    }

    pub fn base_url(&self) -> String {
        base_url(&self.config.host)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.bin);
        cmd.env("OLLAMA_HOST", &self.config.host)
            .env(OLLAMA_MODELS_ENV, &self.config.models_dir)
            .stdin(Stdio::null());
        cmd
    }
}

/// `127.0.0.1:11434` -> `http://127.0.0.1:11434`; full URLs pass through.
pub fn base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}

#[async_trait]
impl InferenceServer for OllamaServer {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn start(&self) -> anyhow::Result<ServiceHandle> {
        tracing::info!(
            bin=%self.config.bin,
            host=%self.config.host,
            models_dir=%self.config.models_dir.display(),
            "starting ollama server"
        );
        let child = self
            .command()
            .arg("serve")
            .spawn()
            .with_context(|| format!("failed to spawn `{} serve`", self.config.bin))?;
        Ok(ServiceHandle::child(self.name(), child))
    }

    async fn probe(&self) -> bool {
        let url = format!("{}/api/version", self.base_url());
        match self.http.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!(error=%e, %url, "ollama probe failed");
                false
            }
        }
    }

    async fn fetch_model(&self, identifier: &str) -> anyhow::Result<FetchOutput> {
        let output = self
            .command()
            .args(["pull", identifier])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("failed to run `{} pull {identifier}`", self.config.bin))?;

        Ok(FetchOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }
}
