mod args;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use ember_common::telemetry::{init_tracing, shutdown_tracing};
use ember_node::api::serve_status;
use ember_node::supervise::{shutdown_signal, supervise};
use ember_node::{
    BootstrapConfig, FetchLockConfig, OllamaConfig, OllamaServer, OpenWebUi, OpenWebUiConfig,
    Orchestrator, ReadinessPolicy,
};

use crate::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let provider = init_tracing(
        "ember-node",
        args.otlp_endpoint.as_deref(),
        args.otlp_token.as_deref(),
    );
    tracing::info!(model=%args.model, "ember-node starting");

    let result = run(args).await;
    if let Err(e) = &result {
        tracing::error!(error=%e, "ember-node exiting with failure");
    }
    shutdown_tracing(provider);
    result
}

async fn run(args: Args) -> anyhow::Result<()> {
    let ollama = OllamaServer::new(OllamaConfig {
        bin: args.ollama_bin.clone(),
        host: args.ollama_host.clone(),
        models_dir: args.models_dir.clone(),
    })?;
    let ui = OpenWebUi::new(OpenWebUiConfig {
        bin: args.webui_bin.clone(),
        host: args.webui_host.clone(),
        port: args.webui_port,
        ollama_base_url: ollama.base_url(),
        data_dir: args.webui_data_dir.clone(),
    });

    let orchestrator = Orchestrator::new(bootstrap_config(&args), Arc::new(ollama), Arc::new(ui));

    match TcpListener::bind(("0.0.0.0", args.api_port)).await {
        Ok(listener) => {
            tracing::info!(port = args.api_port, "status api listening");
            let state = orchestrator.state();
            tokio::spawn(async move {
                if let Err(e) = serve_status(listener, state).await {
                    tracing::warn!(error=%e, "status api stopped");
                }
            });
        }
        Err(e) => {
            tracing::warn!(port = args.api_port, error=%e, "failed to bind status api, continuing without it");
        }
    }

    let services = orchestrator.run().await?;
    supervise(services, orchestrator.state(), shutdown_signal()).await?;
    tracing::info!("ember-node stopped");
    Ok(())
}

fn bootstrap_config(args: &Args) -> BootstrapConfig {
    let fetch_lock = if args.no_fetch_lock {
        None
    } else {
        let dir = args
            .fetch_lock_dir
            .clone()
            .unwrap_or_else(|| args.models_dir.join(".locks"));
        Some(FetchLockConfig::new(
            dir,
            Duration::from_secs(args.lock_stale_secs),
        ))
    };

    BootstrapConfig {
        model: args.model.clone(),
        readiness: ReadinessPolicy {
            settle: Duration::from_secs(args.settle_secs),
            initial_backoff: Duration::from_millis(args.ready_initial_backoff_ms),
            max_backoff: Duration::from_millis(args.ready_max_backoff_ms),
            timeout: Duration::from_secs(args.ready_timeout_secs),
        },
        fetch_retries: args.fetch_retries,
        fetch_retry_backoff: Duration::from_secs(args.fetch_retry_backoff_secs),
        fetch_lock,
    }
}
