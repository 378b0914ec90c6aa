//! Threshold presets.

use crate::core::ThresholdValues;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPreset {
    /// Strict thresholds for high coverage standards
    Strict,
    /// Balanced thresholds for typical projects (default)
    #[default]
    Balanced,
    /// Lenient thresholds for legacy codebases
    Lenient,
}

impl ThresholdPreset {
    pub fn thresholds(&self) -> ThresholdValues {
        match self {
            ThresholdPreset::Strict => ThresholdValues {
                lines: 80.0,
                branches: 70.0,
                functions: 75.0,
                statements: 80.0,
            },
            ThresholdPreset::Balanced => ThresholdValues::default(),
            ThresholdPreset::Lenient => ThresholdValues {
                lines: 40.0,
                branches: 30.0,
                functions: 30.0,
                statements: 40.0,
            },
        }
    }
}
