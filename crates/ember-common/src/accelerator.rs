use std::fmt;

use serde::{Deserialize, Serialize};

/// GPU classes the hosting platform knows how to allocate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum GpuClass {
    T4,
    L4,
    A10G,
    A100,
    H100,
}

impl GpuClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            GpuClass::T4 => "T4",
            GpuClass::L4 => "L4",
            GpuClass::A10G => "A10G",
            GpuClass::A100 => "A100",
            GpuClass::H100 => "H100",
        }
    }
}

impl fmt::Display for GpuClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hardware requested for a model.
///
/// Either a single accelerator of a named class, or a composite request for
/// several accelerators of one class with a fixed memory size. Values are
/// `Copy` and never change once the registry hands them out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AcceleratorProfile {
    Named {
        class: GpuClass,
    },
    Composite {
        class: GpuClass,
        count: u32,
        memory_gb: u32,
    },
}

impl AcceleratorProfile {
    pub const fn named(class: GpuClass) -> Self {
        AcceleratorProfile::Named { class }
    }

    pub const fn composite(class: GpuClass, count: u32, memory_gb: u32) -> Self {
        AcceleratorProfile::Composite {
            class,
            count,
            memory_gb,
        }
    }

    pub fn class(&self) -> GpuClass {
        match self {
            AcceleratorProfile::Named { class } | AcceleratorProfile::Composite { class, .. } => {
                *class
            }
        }
    }

    /// Number of devices attached to one instance.
    pub fn count(&self) -> u32 {
        match self {
            AcceleratorProfile::Named { .. } => 1,
            AcceleratorProfile::Composite { count, .. } => *count,
        }
    }
}

/// Renders the platform's GPU request string: `T4`, `A100-80GB:2`.
impl fmt::Display for AcceleratorProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcceleratorProfile::Named { class } => write!(f, "{class}"),
            AcceleratorProfile::Composite {
                class,
                count,
                memory_gb,
            } => write!(f, "{class}-{memory_gb}GB:{count}"),
        }
    }
}
