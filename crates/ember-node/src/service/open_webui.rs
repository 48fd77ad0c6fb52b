use std::path::PathBuf;
use std::process::Stdio;

use anyhow::Context;
use async_trait::async_trait;
use tokio::process::Command;

use super::{ServiceHandle, UiServer};

#[derive(Debug, Clone)]
pub struct OpenWebUiConfig {
    pub bin: String,
    pub host: String,
    /// Ingress port exposed by the platform.
    pub port: u16,
    /// Where the UI reaches Ollama.
    pub ollama_base_url: String,
    pub data_dir: Option<PathBuf>,
}

pub struct OpenWebUi {
    pub config: OpenWebUiConfig,
}

impl OpenWebUi {
    pub fn new(config: OpenWebUiConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl UiServer for OpenWebUi {
    fn name(&self) -> &str {
        "open-webui"
    }

    async fn start(&self) -> anyhow::Result<ServiceHandle> {
        tracing::info!(
            bin=%self.config.bin,
            host=%self.config.host,
            port=self.config.port,
            ollama=%self.config.ollama_base_url,
            "starting open-webui"
        );

        let mut cmd = Command::new(&self.config.bin);
        cmd.arg("serve")
            .arg("--host")
            .arg(&self.config.host)
            .arg("--port")
            .arg(self.config.port.to_string())
            .env("OLLAMA_BASE_URL", &self.config.ollama_base_url)
            .env("PORT", self.config.port.to_string())
            .stdin(Stdio::null());
        if let Some(dir) = self.config.data_dir.as_ref() {
            cmd.env("DATA_DIR", dir);
        }

        let child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn `{} serve`", self.config.bin))?;
        Ok(ServiceHandle::child(self.name(), child))
    }
}
