//! Inference module for fish species classification.

mod backend;
mod classifier;

pub use backend::{InferenceBackend, OnnxBackend};
pub use classifier::{FishClassifier, rank};

use crate::constants::CATCH_ALL_LABEL;
use serde::Serialize;
use std::fmt;

/// One class score from a single inference pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    /// Class label.
    pub label: String,
    /// Model score in `[0, 1]`.
    pub confidence: f32,
    /// Position of the class in the model output.
    pub class_index: usize,
}

/// Response regime of a model, fixed by its label list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelMode {
    /// One target species against a synthetic catch-all class.
    SingleClass,
    /// Discrimination among several real species.
    MultiClass,
}

impl ModelMode {
    /// Single-class iff any label is the catch-all label.
    pub fn detect<S: AsRef<str>>(labels: &[S]) -> Self {
        if labels.iter().any(|label| is_catch_all(label.as_ref())) {
            Self::SingleClass
        } else {
            Self::MultiClass
        }
    }
}

impl fmt::Display for ModelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleClass => write!(f, "single-class"),
            Self::MultiClass => write!(f, "multi-class"),
        }
    }
}

/// Whether `label` names the catch-all class (case-insensitive).
pub fn is_catch_all(label: &str) -> bool {
    label.eq_ignore_ascii_case(CATCH_ALL_LABEL)
}
