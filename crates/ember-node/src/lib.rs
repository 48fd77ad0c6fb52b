pub mod api;
pub mod cache_lock;
pub mod error;
pub mod orchestrator;
pub mod service;
pub mod state;
pub mod supervise;

pub use cache_lock::{FetchLock, FetchLockConfig};
pub use error::BootstrapError;
pub use orchestrator::{BootstrapConfig, Orchestrator, ReadinessPolicy, RunningServices};
pub use service::{
    FetchOutput, InferenceServer, OllamaConfig, OllamaServer, OpenWebUi, OpenWebUiConfig,
    ServiceHandle, ServiceProcess, UiServer,
};
pub use state::{BootstrapState, SharedState, Stage, StageFailure};
