use serde::{Deserialize, Serialize};

use crate::accelerator::{AcceleratorProfile, GpuClass};
use crate::error::RegistryError;

/// Model deployed when no identifier is configured.
pub const DEFAULT_MODEL: &str = "deepseek-r1:14b";

/// One row of the registry table.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ModelEntry {
    pub identifier: &'static str,
    pub accelerator: AcceleratorProfile,
    /// Approximate download size; informational only.
    pub approx_size_gb: f32,
}

/// A model identifier that has passed registry validation, paired with the
/// hardware it needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelSpec {
    pub identifier: String,
    pub accelerator: AcceleratorProfile,
}

/// Static mapping from model identifier to accelerator profile.
///
/// The table is an operational decision about which hardware each model
/// needs. It is fixed at compile time and never mutated, so lookups are
/// plain reads and safe from any thread.
#[derive(Debug)]
pub struct ModelRegistry {
    entries: &'static [ModelEntry],
}

static BUILTIN_ENTRIES: [ModelEntry; 7] = [
    entry("deepseek-r1:1.5b", AcceleratorProfile::named(GpuClass::T4), 1.1),
    entry("deepseek-r1:7b", AcceleratorProfile::named(GpuClass::T4), 4.7),
    entry("deepseek-r1:8b", AcceleratorProfile::named(GpuClass::T4), 4.9),
    entry("deepseek-r1:14b", AcceleratorProfile::named(GpuClass::T4), 9.0),
    entry("deepseek-r1:32b", AcceleratorProfile::named(GpuClass::T4), 20.0),
    entry(
        "deepseek-r1:70b",
        AcceleratorProfile::composite(GpuClass::A100, 2, 80),
        43.0,
    ),
    entry("deepseek-r1:671b", AcceleratorProfile::named(GpuClass::T4), 404.0),
];

static BUILTIN: ModelRegistry = ModelRegistry::new(&BUILTIN_ENTRIES);

const fn entry(
    identifier: &'static str,
    accelerator: AcceleratorProfile,
    approx_size_gb: f32,
) -> ModelEntry {
    ModelEntry {
        identifier,
        accelerator,
        approx_size_gb,
    }
}

impl ModelRegistry {
    pub const fn new(entries: &'static [ModelEntry]) -> Self {
        Self { entries }
    }

    /// The process-wide registry of supported DeepSeek R1 tags.
    pub fn builtin() -> &'static ModelRegistry {
        &BUILTIN
    }

    /// All entries, in table order.
    pub fn models(&self) -> &[ModelEntry] {
        self.entries
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|e| e.identifier == identifier)
    }

    pub fn resolve_accelerator(&self, identifier: &str) -> Result<AcceleratorProfile, RegistryError> {
        self.entries
            .iter()
            .find(|e| e.identifier == identifier)
            .map(|e| e.accelerator)
            .ok_or_else(|| RegistryError::UnknownModel {
                identifier: identifier.to_string(),
            })
    }

    pub fn resolve(&self, identifier: &str) -> Result<ModelSpec, RegistryError> {
        let accelerator = self.resolve_accelerator(identifier)?;
        Ok(ModelSpec {
            identifier: identifier.to_string(),
            accelerator,
        })
    }
}

/// Look `identifier` up in the built-in registry.
pub fn resolve_accelerator(identifier: &str) -> Result<AcceleratorProfile, RegistryError> {
    ModelRegistry::builtin().resolve_accelerator(identifier)
}
