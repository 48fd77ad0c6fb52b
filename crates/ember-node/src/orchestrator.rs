use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use ember_common::{ModelRegistry, ModelSpec};

use crate::cache_lock::{FetchLock, FetchLockConfig};
use crate::error::BootstrapError;
use crate::service::{FetchOutput, InferenceServer, ServiceHandle, UiServer};
use crate::state::{BootstrapState, SharedState, Stage};

/// Upper bound on the delay between fetch retries.
const MAX_FETCH_BACKOFF: Duration = Duration::from_secs(60);

/// How long to wait for the inference server to come up, and how often to
/// look.
#[derive(Debug, Clone)]
pub struct ReadinessPolicy {
    /// Fixed delay before the first probe.
    pub settle: Duration,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// Total budget for probing, not counting `settle`.
    pub timeout: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            settle: Duration::ZERO,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(5),
            timeout: Duration::from_secs(120),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Model identifier to serve; must be in the registry.
    pub model: String,
    pub readiness: ReadinessPolicy,
    /// Extra fetch attempts after the first failure. Zero disables retries.
    pub fetch_retries: u32,
    pub fetch_retry_backoff: Duration,
    /// Serialize first fetches across instances sharing the model volume.
    pub fetch_lock: Option<FetchLockConfig>,
}

impl BootstrapConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            readiness: ReadinessPolicy::default(),
            fetch_retries: 0,
            fetch_retry_backoff: Duration::from_secs(2),
            fetch_lock: None,
        }
    }
}

/// Both services, running, after a successful bootstrap.
pub struct RunningServices {
    pub inference: ServiceHandle,
    pub ui: ServiceHandle,
}

impl RunningServices {
    /// Stop the UI first so it never outlives its backend.
    pub async fn shutdown(&mut self) {
        self.ui.terminate().await;
        self.inference.terminate().await;
    }
}

/// Drives one environment instance from nothing to both services running.
///
/// The sequence is strictly ordered: inference start, readiness, model
/// fetch, UI start. The first failing stage ends the run; services already
/// launched are terminated before the error is returned.
pub struct Orchestrator {
    config: BootstrapConfig,
    registry: &'static ModelRegistry,
    inference: Arc<dyn InferenceServer>,
    ui: Arc<dyn UiServer>,
    state: SharedState,
}

impl Orchestrator {
    pub fn new(
        config: BootstrapConfig,
        inference: Arc<dyn InferenceServer>,
        ui: Arc<dyn UiServer>,
    ) -> Self {
        let state = BootstrapState::shared(config.model.clone());
        Self {
            config,
            registry: ModelRegistry::builtin(),
            inference,
            ui,
            state,
        }
    }

    pub fn with_registry(mut self, registry: &'static ModelRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    pub async fn run(&self) -> Result<RunningServices, BootstrapError> {
        match self.run_stages().await {
            Ok(services) => {
                self.state.write().await.enter(Stage::Ready);
                tracing::info!(model=%self.config.model, "services started successfully");
                Ok(services)
            }
            Err(e) => {
                self.report(&e);
                self.state.write().await.fail(e.stage(), e.to_string());
                Err(e)
            }
        }
    }

    async fn run_stages(&self) -> Result<RunningServices, BootstrapError> {
        let spec = self.registry.resolve(&self.config.model)?;
        tracing::info!(model=%spec.identifier, accelerator=%spec.accelerator, "bootstrapping instance");

        self.enter(Stage::InferenceStart).await;
        let mut inference = self
            .inference
            .start()
            .await
            .map_err(|e| BootstrapError::launch(Stage::InferenceStart, self.inference.name(), e))?;
        self.state.write().await.inference_server_up = true;
        tracing::info!(service=%inference.name, pid=?inference.pid(), "inference server launched");

        self.enter(Stage::Readiness).await;
        if let Err(e) = self.await_readiness(&mut inference).await {
            return Err(self.abort(e, &mut inference).await);
        }

        self.enter(Stage::ModelFetch).await;
        match self.fetch(&spec).await {
            Ok(out) => {
                tracing::debug!(model=%spec.identifier, output=%out.stdout, "model pull output");
            }
            Err(e) => return Err(self.abort(e, &mut inference).await),
        }
        self.state.write().await.model_fetched = true;

        self.enter(Stage::UiStart).await;
        if let Some(status) = inference.exit_status() {
            let e = BootstrapError::ServiceExited {
                stage: Stage::UiStart,
                service: inference.name.clone(),
                status: status.to_string(),
            };
            return Err(self.abort(e, &mut inference).await);
        }
        let mut ui = match self.ui.start().await {
            Ok(h) => h,
            Err(e) => {
                let e = BootstrapError::launch(Stage::UiStart, self.ui.name(), e);
                return Err(self.abort(e, &mut inference).await);
            }
        };
        if let Some(status) = ui.exit_status() {
            let e = BootstrapError::ServiceExited {
                stage: Stage::UiStart,
                service: ui.name.clone(),
                status: status.to_string(),
            };
            return Err(self.abort(e, &mut inference).await);
        }
        self.state.write().await.ui_server_up = true;
        tracing::info!(service=%ui.name, pid=?ui.pid(), "ui server launched");

        Ok(RunningServices { inference, ui })
    }

    /// Poll the readiness probe with exponential backoff until it passes,
    /// the budget runs out, or the server process dies.
    async fn await_readiness(&self, inference: &mut ServiceHandle) -> Result<(), BootstrapError> {
        let policy = &self.config.readiness;
        let service = self.inference.name().to_string();
        tracing::info!(%service, timeout=?policy.timeout, "waiting for inference server");

        let poll = async {
            if !policy.settle.is_zero() {
                tokio::time::sleep(policy.settle).await;
            }
            let start = Instant::now();
            let mut backoff = policy.initial_backoff;
            loop {
                let remaining = policy.timeout.saturating_sub(start.elapsed());
                if remaining.is_zero() {
                    return Err(start.elapsed());
                }
                if let Ok(true) = tokio::time::timeout(remaining, self.inference.probe()).await {
                    return Ok(start.elapsed());
                }
                let remaining = policy.timeout.saturating_sub(start.elapsed());
                if remaining.is_zero() {
                    return Err(start.elapsed());
                }
                tokio::time::sleep(backoff.min(remaining)).await;
                backoff = (backoff * 2).min(policy.max_backoff);
            }
        };

        tokio::select! {
            r = poll => match r {
                Ok(waited) => {
                    tracing::info!(%service, ?waited, "inference server ready");
                    Ok(())
                }
                Err(waited) => Err(BootstrapError::Readiness { service, waited }),
            },
            status = inference.wait() => {
                let status = status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|e| format!("wait failed: {e}"));
                Err(BootstrapError::ServiceExited { stage: Stage::Readiness, service, status })
            }
        }
    }

    /// Pull the model, holding the shared-volume lock if configured, with
    /// up to `fetch_retries` extra attempts.
    async fn fetch(&self, spec: &ModelSpec) -> Result<FetchOutput, BootstrapError> {
        let model = spec.identifier.as_str();
        let _lock = match self.config.fetch_lock.as_ref() {
            Some(cfg) => Some(
                FetchLock::acquire(cfg, model)
                    .await
                    .map_err(|e| BootstrapError::unexpected(Stage::ModelFetch, e))?,
            ),
            None => None,
        };

        let attempts = self.config.fetch_retries.saturating_add(1);
        let mut diagnostic = String::new();
        for attempt in 0..attempts {
            if attempt > 0 {
                let backoff = fetch_backoff(self.config.fetch_retry_backoff, attempt);
                tracing::warn!(%model, attempt, "retrying model fetch after {:?}", backoff);
                tokio::time::sleep(backoff).await;
            }

            tracing::info!(%model, attempt, "pulling model");
            match self.inference.fetch_model(model).await {
                Ok(out) if out.success => return Ok(out),
                Ok(out) => {
                    diagnostic = out.diagnostic();
                    tracing::warn!(%model, attempt, error=%diagnostic, "model pull failed");
                }
                Err(e) => {
                    diagnostic = format!("{e:#}");
                    tracing::warn!(%model, attempt, error=%diagnostic, "failed to run model pull");
                }
            }
        }

        Err(BootstrapError::Fetch {
            model: model.to_string(),
            attempts,
            diagnostic,
        })
    }

    async fn enter(&self, stage: Stage) {
        self.state.write().await.enter(stage);
        tracing::debug!(%stage, "entering stage");
    }

    async fn abort(&self, e: BootstrapError, inference: &mut ServiceHandle) -> BootstrapError {
        inference.terminate().await;
        self.state.write().await.inference_server_up = false;
        e
    }

    fn report(&self, e: &BootstrapError) {
        let model = self.config.model.as_str();
        let stage = e.stage();
        match e {
            BootstrapError::Fetch { diagnostic, .. } => {
                tracing::error!(%model, %stage, fault=e.kind(), %diagnostic, "service failed");
            }
            BootstrapError::Unexpected { .. } => {
                tracing::error!(%model, %stage, fault=e.kind(), error=%e, "unexpected bootstrap error");
            }
            _ => {
                tracing::error!(%model, %stage, fault=e.kind(), error=%e, "service failed");
            }
        }
    }
}

/// `base * 2^(attempt-1)`, capped.
fn fetch_backoff(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor).min(MAX_FETCH_BACKOFF)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use ember_common::{AcceleratorProfile, GpuClass, ModelEntry, RegistryError};

    use super::*;

    #[derive(Default)]
    struct Calls {
        log: Mutex<Vec<&'static str>>,
        probes: AtomicUsize,
        fetches: AtomicUsize,
    }

    impl Calls {
        fn push(&self, call: &'static str) {
            self.log.lock().unwrap().push(call);
        }

        fn log(&self) -> Vec<&'static str> {
            self.log.lock().unwrap().clone()
        }
    }

    struct MockInference {
        calls: Arc<Calls>,
        start_fails: bool,
        ready_after_probes: Option<usize>,
        /// Outcome of each fetch call; the last one repeats.
        fetch_results: Vec<Result<bool, &'static str>>,
        fetch_delay: Duration,
        /// Run this shell snippet as the server process instead of an
        /// external handle that never exits.
        process_script: Option<&'static str>,
    }

    impl MockInference {
        fn healthy(calls: Arc<Calls>) -> Self {
            Self {
                calls,
                start_fails: false,
                ready_after_probes: Some(1),
                fetch_results: vec![Ok(true)],
                fetch_delay: Duration::ZERO,
                process_script: None,
            }
        }
    }

    #[async_trait]
    impl InferenceServer for MockInference {
        fn name(&self) -> &str {
            "mock-inference"
        }

        async fn start(&self) -> anyhow::Result<ServiceHandle> {
            self.calls.push("inference.start");
            if self.start_fails {
                anyhow::bail!("exec format error");
            }
            match self.process_script {
                Some(script) => {
                    let child = tokio::process::Command::new("sh")
                        .args(["-c", script])
                        .spawn()?;
                    Ok(ServiceHandle::child("mock-inference", child))
                }
                None => Ok(ServiceHandle::external("mock-inference")),
            }
        }

        async fn probe(&self) -> bool {
            let n = self.calls.probes.fetch_add(1, Ordering::SeqCst) + 1;
            matches!(self.ready_after_probes, Some(k) if n >= k)
        }

        async fn fetch_model(&self, _identifier: &str) -> anyhow::Result<FetchOutput> {
            self.calls.push("inference.fetch");
            if !self.fetch_delay.is_zero() {
                tokio::time::sleep(self.fetch_delay).await;
            }
            let n = self.calls.fetches.fetch_add(1, Ordering::SeqCst);
            let idx = n.min(self.fetch_results.len() - 1);
            match self.fetch_results[idx] {
                Ok(true) => Ok(FetchOutput {
                    stdout: "success\n".to_string(),
                    stderr: String::new(),
                    success: true,
                }),
                Ok(false) => Ok(FetchOutput {
                    stdout: "pulling manifest\n".to_string(),
                    stderr: "Error: pull model manifest: file does not exist\n".to_string(),
                    success: false,
                }),
                Err(msg) => anyhow::bail!(msg),
            }
        }
    }

    struct MockUi {
        calls: Arc<Calls>,
        start_fails: bool,
    }

    #[async_trait]
    impl UiServer for MockUi {
        fn name(&self) -> &str {
            "mock-ui"
        }

        async fn start(&self) -> anyhow::Result<ServiceHandle> {
            self.calls.push("ui.start");
            if self.start_fails {
                anyhow::bail!("address already in use");
            }
            Ok(ServiceHandle::external("mock-ui"))
        }
    }

    fn fast_config(model: &str) -> BootstrapConfig {
        BootstrapConfig {
            model: model.to_string(),
            readiness: ReadinessPolicy {
                settle: Duration::ZERO,
                initial_backoff: Duration::from_millis(1),
                max_backoff: Duration::from_millis(5),
                timeout: Duration::from_millis(200),
            },
            fetch_retries: 0,
            fetch_retry_backoff: Duration::from_millis(1),
            fetch_lock: None,
        }
    }

    fn orchestrator(
        config: BootstrapConfig,
        inference: MockInference,
        ui_fails: bool,
    ) -> (Orchestrator, Arc<Calls>) {
        let calls = inference.calls.clone();
        let ui = MockUi {
            calls: calls.clone(),
            start_fails: ui_fails,
        };
        (
            Orchestrator::new(config, Arc::new(inference), Arc::new(ui)),
            calls,
        )
    }

    #[tokio::test]
    async fn test_known_model_reaches_ready() {
        let calls = Arc::new(Calls::default());
        let (orch, calls) = orchestrator(
            fast_config("deepseek-r1:14b"),
            MockInference::healthy(calls),
            false,
        );

        let services = orch.run().await.unwrap();
        assert_eq!(services.inference.name, "mock-inference");
        assert_eq!(services.ui.name, "mock-ui");
        assert_eq!(
            calls.log(),
            vec!["inference.start", "inference.fetch", "ui.start"]
        );

        let st = orch.state().read().await.clone();
        assert!(st.is_ready());
        assert!(st.inference_server_up && st.model_fetched && st.ui_server_up);
    }

    #[tokio::test]
    async fn test_unknown_model_launches_nothing() {
        let calls = Arc::new(Calls::default());
        let (orch, calls) = orchestrator(
            fast_config("deepseek-r1:999b"),
            MockInference::healthy(calls),
            false,
        );

        let err = orch.run().await.err().unwrap();
        assert!(matches!(
            err,
            BootstrapError::Configuration(RegistryError::UnknownModel { .. })
        ));
        assert_eq!(err.stage(), Stage::Configure);
        assert!(calls.log().is_empty());
    }

    #[tokio::test]
    async fn test_inference_launch_failure_skips_fetch_and_ui() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            start_fails: true,
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(fast_config("deepseek-r1:14b"), inference, false);

        let err = orch.run().await.err().unwrap();
        assert!(matches!(
            err,
            BootstrapError::Launch {
                stage: Stage::InferenceStart,
                ..
            }
        ));
        assert_eq!(calls.log(), vec!["inference.start"]);
        assert_eq!(calls.probes.load(Ordering::SeqCst), 0);

        let st = orch.state().read().await.clone();
        assert!(!st.inference_server_up);
        assert_eq!(st.failure.unwrap().stage, Stage::InferenceStart);
    }

    #[tokio::test]
    async fn test_fetch_failure_carries_diagnostic_and_skips_ui() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            fetch_results: vec![Ok(false)],
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(fast_config("deepseek-r1:14b"), inference, false);

        let err = orch.run().await.err().unwrap();
        match &err {
            BootstrapError::Fetch {
                model,
                attempts,
                diagnostic,
            } => {
                assert_eq!(model, "deepseek-r1:14b");
                assert_eq!(*attempts, 1);
                assert_eq!(diagnostic, "Error: pull model manifest: file does not exist");
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
        assert!(!calls.log().contains(&"ui.start"));

        let st = orch.state().read().await.clone();
        assert!(!st.model_fetched && !st.ui_server_up);
        assert!(!st.is_ready());
    }

    #[tokio::test]
    async fn test_fetch_invocation_error_is_fetch_fault() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            fetch_results: vec![Err("No such file or directory")],
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(fast_config("deepseek-r1:7b"), inference, false);

        let err = orch.run().await.err().unwrap();
        assert_eq!(err.stage(), Stage::ModelFetch);
        assert!(err.to_string().contains("No such file or directory"));
        assert!(!calls.log().contains(&"ui.start"));
    }

    #[tokio::test]
    async fn test_no_retries_by_default() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            fetch_results: vec![Ok(false), Ok(true)],
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(fast_config("deepseek-r1:14b"), inference, false);

        assert!(orch.run().await.is_err());
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fetch_retries_recover_transient_failure() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            fetch_results: vec![Ok(false), Err("connection reset"), Ok(true)],
            ..MockInference::healthy(calls)
        };
        let mut config = fast_config("deepseek-r1:14b");
        config.fetch_retries = 2;
        let (orch, calls) = orchestrator(config, inference, false);

        orch.run().await.unwrap();
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 3);
        assert_eq!(calls.log().last(), Some(&"ui.start"));
    }

    #[tokio::test]
    async fn test_fetch_retries_exhausted() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            fetch_results: vec![Ok(false)],
            ..MockInference::healthy(calls)
        };
        let mut config = fast_config("deepseek-r1:14b");
        config.fetch_retries = 2;
        let (orch, calls) = orchestrator(config, inference, false);

        let err = orch.run().await.err().unwrap();
        assert!(matches!(err, BootstrapError::Fetch { attempts: 3, .. }));
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 3);
        assert!(!calls.log().contains(&"ui.start"));
    }

    #[tokio::test]
    async fn test_readiness_polls_until_ready() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            ready_after_probes: Some(4),
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(fast_config("deepseek-r1:14b"), inference, false);

        orch.run().await.unwrap();
        assert_eq!(calls.probes.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_readiness_timeout_is_bounded() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            ready_after_probes: None,
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(fast_config("deepseek-r1:14b"), inference, false);

        let started = std::time::Instant::now();
        let err = orch.run().await.err().unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(err, BootstrapError::Readiness { .. }));
        assert_eq!(err.stage(), Stage::Readiness);
        assert_eq!(calls.log(), vec!["inference.start"]);
        assert!(calls.probes.load(Ordering::SeqCst) > 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_inference_exit_during_readiness_fails_fast() {
        let calls = Arc::new(Calls::default());
        let mut config = fast_config("deepseek-r1:14b");
        config.readiness.timeout = Duration::from_secs(30);
        let inference = MockInference {
            ready_after_probes: None,
            process_script: Some("exit 1"),
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(config, inference, false);

        let started = std::time::Instant::now();
        let err = orch.run().await.err().unwrap();
        assert!(started.elapsed() < Duration::from_secs(10));
        match &err {
            BootstrapError::ServiceExited { stage, service, .. } => {
                assert_eq!(*stage, Stage::Readiness);
                assert_eq!(service, "mock-inference");
            }
            other => panic!("expected service exit, got {other:?}"),
        }
        assert_eq!(calls.fetches.load(Ordering::SeqCst), 0);
        assert_eq!(calls.log(), vec!["inference.start"]);
        assert!(!orch.state().read().await.inference_server_up);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_inference_exit_during_fetch_blocks_ui() {
        let calls = Arc::new(Calls::default());
        let inference = MockInference {
            process_script: Some("sleep 0.2; exit 2"),
            fetch_delay: Duration::from_millis(800),
            ..MockInference::healthy(calls)
        };
        let (orch, calls) = orchestrator(fast_config("deepseek-r1:14b"), inference, false);

        let err = orch.run().await.err().unwrap();
        assert!(matches!(
            err,
            BootstrapError::ServiceExited {
                stage: Stage::UiStart,
                ..
            }
        ));
        assert_eq!(calls.log(), vec!["inference.start", "inference.fetch"]);
        let st = orch.state().read().await.clone();
        assert!(st.model_fetched);
        assert!(!st.ui_server_up);
    }

    #[tokio::test]
    async fn test_ui_launch_failure() {
        let calls = Arc::new(Calls::default());
        let (orch, calls) = orchestrator(
            fast_config("deepseek-r1:14b"),
            MockInference::healthy(calls),
            true,
        );

        let err = orch.run().await.err().unwrap();
        assert!(matches!(
            err,
            BootstrapError::Launch {
                stage: Stage::UiStart,
                ..
            }
        ));
        assert_eq!(
            calls.log(),
            vec!["inference.start", "inference.fetch", "ui.start"]
        );
        let st = orch.state().read().await.clone();
        assert!(st.model_fetched);
        assert!(!st.ui_server_up);
    }

    #[tokio::test]
    async fn test_fetch_holds_lock_and_releases_it() {
        let tmp = tempfile::tempdir().unwrap();
        let mut config = fast_config("deepseek-r1:14b");
        config.fetch_lock = Some(FetchLockConfig {
            dir: tmp.path().join(".locks"),
            stale_after: Duration::from_secs(60),
            poll_interval: Duration::from_millis(5),
        });
        let calls = Arc::new(Calls::default());
        let (orch, _calls) = orchestrator(config, MockInference::healthy(calls), false);

        orch.run().await.unwrap();
        let leftover: Vec<_> = std::fs::read_dir(tmp.path().join(".locks"))
            .unwrap()
            .collect();
        assert!(leftover.is_empty());
    }

    #[tokio::test]
    async fn test_custom_registry() {
        static ENTRIES: [ModelEntry; 1] = [ModelEntry {
            identifier: "qwen2.5:0.5b",
            accelerator: AcceleratorProfile::named(GpuClass::L4),
            approx_size_gb: 0.4,
        }];
        static REGISTRY: ModelRegistry = ModelRegistry::new(&ENTRIES);

        let calls = Arc::new(Calls::default());
        let (orch, _calls) =
            orchestrator(fast_config("qwen2.5:0.5b"), MockInference::healthy(calls), false);
        let orch = orch.with_registry(&REGISTRY);
        assert!(orch.run().await.is_ok());
    }

    #[test]
    fn test_fetch_backoff_doubles_and_caps() {
        let base = Duration::from_secs(2);
        assert_eq!(fetch_backoff(base, 1), Duration::from_secs(2));
        assert_eq!(fetch_backoff(base, 2), Duration::from_secs(4));
        assert_eq!(fetch_backoff(base, 3), Duration::from_secs(8));
        assert_eq!(fetch_backoff(base, 40), MAX_FETCH_BACKOFF);
    }
}
