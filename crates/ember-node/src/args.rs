use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "ember-node")]
#[command(about = "Bootstrap Ollama and Open WebUI inside a provisioned GPU instance", long_about = None)]
pub struct Args {
    /// Model to pull and serve. Must be in the model registry.
    #[arg(long, env = "EMBER_MODEL", default_value = ember_common::DEFAULT_MODEL)]
    pub model: String,

    /// Mounted model volume; passed to Ollama as OLLAMA_MODELS.
    #[arg(long, env = "OLLAMA_MODELS", default_value = "/root/models/")]
    pub models_dir: PathBuf,

    #[arg(long, default_value = "ollama")]
    pub ollama_bin: String,

    /// host:port Ollama binds and the UI dials.
    #[arg(long, default_value = "127.0.0.1:11434")]
    pub ollama_host: String,

    #[arg(long, default_value = "open-webui")]
    pub webui_bin: String,

    #[arg(long, default_value = "0.0.0.0")]
    pub webui_host: String,

    /// Ingress port the platform exposes.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub webui_port: u16,

    /// Open WebUI data directory (DATA_DIR).
    #[arg(long)]
    pub webui_data_dir: Option<PathBuf>,

    /// Fixed delay before the first readiness probe.
    #[arg(long, default_value_t = 0)]
    pub settle_secs: u64,

    #[arg(long, default_value_t = 120)]
    pub ready_timeout_secs: u64,

    #[arg(long, default_value_t = 250, value_parser = clap::value_parser!(u64).range(1..))]
    pub ready_initial_backoff_ms: u64,

    #[arg(long, default_value_t = 5_000, value_parser = clap::value_parser!(u64).range(1..))]
    pub ready_max_backoff_ms: u64,

    /// Extra model pull attempts after a failure.
    #[arg(long, env = "EMBER_FETCH_RETRIES", default_value_t = 0)]
    pub fetch_retries: u32,

    #[arg(long, default_value_t = 2)]
    pub fetch_retry_backoff_secs: u64,

    /// Skip the cross-instance lock around the first pull of a model.
    #[arg(long, default_value_t = false)]
    pub no_fetch_lock: bool,

    /// Lock directory; defaults to `<models-dir>/.locks`.
    #[arg(long)]
    pub fetch_lock_dir: Option<PathBuf>,

    /// A fetch lock untouched for this long is treated as abandoned.
    #[arg(long, default_value_t = 1_800, value_parser = clap::value_parser!(u64).range(1..))]
    pub lock_stale_secs: u64,

    /// Port for the status API (/healthz, /status, /metrics).
    #[arg(long, default_value_t = 9090)]
    pub api_port: u16,

    /// OTLP/HTTP endpoint for span export. Disabled if unset.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    #[arg(long, env = "OTEL_EXPORTER_OTLP_TOKEN")]
    pub otlp_token: Option<String>,
}
