//! Configuration type definitions.

use crate::constants::DEFAULT_INPUT_SIZE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inference model settings.
    pub model: ModelConfig,

    /// Locations of the JSON assets.
    pub assets: AssetsConfig,

    /// Default analysis settings.
    pub defaults: DefaultsConfig,
}

/// Configuration for the classification model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the ONNX model file.
    pub path: Option<PathBuf>,

    /// Path to the labels file.
    pub labels: Option<PathBuf>,

    /// Side length of the square model input, in pixels.
    pub input_size: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: None,
            labels: None,
            input_size: DEFAULT_INPUT_SIZE,
        }
    }
}

/// Paths to the threshold and species metadata assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Threshold asset (JSON).
    pub thresholds: Option<PathBuf>,

    /// Species metadata asset (JSON).
    pub metadata: Option<PathBuf>,
}

/// Default analysis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Reject poor captures before inference.
    pub quality_gate: bool,

    /// Emit JSON envelopes instead of human-readable output.
    pub json: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            quality_gate: true,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_config_default_values() {
        let defaults = DefaultsConfig::default();
        assert!(defaults.quality_gate);
        assert!(!defaults.json);
    }

    #[test]
    fn test_model_config_default_input_size() {
        let model = ModelConfig::default();
        assert_eq!(model.input_size, 224);
        assert!(model.path.is_none());
        assert!(model.labels.is_none());
    }
}
