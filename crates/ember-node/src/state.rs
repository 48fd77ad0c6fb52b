use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Position in the bootstrap sequence. Stages only ever move forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Configure,
    InferenceStart,
    Readiness,
    ModelFetch,
    UiStart,
    Ready,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::InferenceStart => "inference_start",
            Stage::Readiness => "readiness",
            Stage::ModelFetch => "model_fetch",
            Stage::UiStart => "ui_start",
            Stage::Ready => "ready",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: Stage,
    pub message: String,
}

/// Per-instance bootstrap progress. Lives only as long as the process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BootstrapState {
    pub model: String,
    pub stage: Stage,
    pub inference_server_up: bool,
    pub model_fetched: bool,
    pub ui_server_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<StageFailure>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type SharedState = Arc<RwLock<BootstrapState>>;

impl BootstrapState {
    pub fn new(model: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            model: model.into(),
            stage: Stage::Configure,
            inference_server_up: false,
            model_fetched: false,
            ui_server_up: false,
            failure: None,
            started_at: now,
            updated_at: now,
        }
    }

    pub fn shared(model: impl Into<String>) -> SharedState {
        Arc::new(RwLock::new(Self::new(model)))
    }

    pub fn is_ready(&self) -> bool {
        self.stage == Stage::Ready && self.failure.is_none()
    }

    pub fn enter(&mut self, stage: Stage) {
        self.stage = stage;
        self.touch();
    }

    pub fn fail(&mut self, stage: Stage, message: impl Into<String>) {
        self.failure = Some(StageFailure {
            stage,
            message: message.into(),
        });
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
