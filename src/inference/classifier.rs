//! Fish classifier: preprocessing, model access and ranking.

use crate::config::ModelConfig;
use crate::constants::{TOP_K, UNKNOWN_LABEL};
use crate::error::Result;
use crate::imaging::{ImageTensor, preprocess};
use crate::inference::backend::{InferenceBackend, OnnxBackend};
use crate::inference::{Classification, ModelMode};
use crate::utils::labels::load_labels_or_default;
use image::DynamicImage;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

type Backend = Box<dyn InferenceBackend>;

/// Classifier owning the (non-reentrant) model handle and its label list.
///
/// A classifier whose model failed to load is still usable: every call
/// returns an empty list, which the decision policy rejects as `NoModel`.
pub struct FishClassifier {
    backend: Mutex<Option<Backend>>,
    labels: Vec<String>,
    mode: ModelMode,
    input_size: u32,
}

impl FishClassifier {
    /// Build a classifier around an already loaded backend.
    pub fn new(backend: Backend, labels: Vec<String>, input_size: u32) -> Self {
        let mode = ModelMode::detect(&labels);
        info!(
            "Classifier ready: {} ({} classes, {} mode, {}px input)",
            backend.describe(),
            labels.len(),
            mode,
            input_size
        );
        Self {
            backend: Mutex::new(Some(backend)),
            labels,
            mode,
            input_size,
        }
    }

    /// Build a classifier with no model behind it.
    pub fn unavailable(labels: Vec<String>, input_size: u32) -> Self {
        Self {
            backend: Mutex::new(None),
            mode: ModelMode::detect(&labels),
            labels,
            input_size,
        }
    }

    /// Build a classifier from model configuration.
    ///
    /// Label and model failures are absorbed: labels fall back to the
    /// built-in list, and a model that cannot be loaded leaves the
    /// classifier unavailable.
    pub fn from_config(model: &ModelConfig) -> Self {
        let labels = load_labels_or_default(model.labels.as_deref());

        let Some(path) = model.path.as_deref() else {
            warn!("No model configured, classification unavailable");
            return Self::unavailable(labels, model.input_size);
        };

        match OnnxBackend::load(path) {
            Ok(backend) => Self::new(Box::new(backend), labels, model.input_size),
            Err(e) => {
                warn!("{e}, classification unavailable");
                Self::unavailable(labels, model.input_size)
            }
        }
    }

    /// Whether a model is loaded and not yet released.
    pub fn is_available(&self) -> bool {
        self.lock().is_some()
    }

    /// Single- or multi-class regime, fixed at construction.
    pub fn mode(&self) -> ModelMode {
        self.mode
    }

    /// Class labels, index-aligned to the model output.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Side length of the model input.
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Preprocess and classify an image, returning the top 3 classes.
    ///
    /// Inference failures are logged and yield an empty list.
    pub fn classify(&self, image: &DynamicImage) -> Vec<Classification> {
        let tensor = preprocess(image, self.input_size);
        self.classify_tensor(&tensor)
    }

    /// Classify a preprocessed tensor, absorbing inference failures.
    pub fn classify_tensor(&self, tensor: &ImageTensor) -> Vec<Classification> {
        self.try_classify_tensor(tensor).unwrap_or_else(|e| {
            warn!("{e}");
            Vec::new()
        })
    }

    /// Classify a preprocessed tensor.
    ///
    /// Returns an empty list without error when no model is available.
    pub fn try_classify_tensor(&self, tensor: &ImageTensor) -> Result<Vec<Classification>> {
        let mut guard = self.lock();
        let Some(backend) = guard.as_mut() else {
            debug!("Classification requested without a model");
            return Ok(Vec::new());
        };

        let scores = backend.infer(tensor)?;
        drop(guard);

        if scores.len() != self.labels.len() {
            debug!(
                "Model returned {} scores for {} labels",
                scores.len(),
                self.labels.len()
            );
        }

        Ok(rank(&scores, &self.labels, TOP_K))
    }

    /// Release the model handle.
    ///
    /// Returns `true` only for the call that actually released it; later
    /// classifications return empty lists.
    pub fn close(&self) -> bool {
        let released = self.lock().take();
        if let Some(backend) = released {
            info!("Released model {}", backend.describe());
            true
        } else {
            false
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Backend>> {
        self.backend.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Rank raw scores into the `k` most confident classifications.
///
/// The sort is stable, so equal scores keep class-index order. Finite
/// scores are clamped into `[0, 1]`. NaN and both infinities rank as 0,
/// since an infinite score is a model fault rather than certainty. Indices
/// past the label list are labelled `"Unknown"`.
pub fn rank(scores: &[f32], labels: &[String], k: usize) -> Vec<Classification> {
    let mut ranked: Vec<Classification> = scores
        .iter()
        .enumerate()
        .map(|(index, &score)| Classification {
            label: labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            confidence: normalize_score(score),
            class_index: index,
        })
        .collect();

    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    ranked.truncate(k);
    ranked
}

fn normalize_score(score: f32) -> f32 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedScores {
        scores: Vec<f32>,
        calls: Arc<AtomicUsize>,
    }

    impl InferenceBackend for FixedScores {
        fn infer(&mut self, input: &ImageTensor) -> Result<Vec<f32>> {
            assert_eq!(input.data.len(), 16 * 16 * 3);
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.scores.clone())
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    struct Failing;

    impl InferenceBackend for Failing {
        fn infer(&mut self, _input: &ImageTensor) -> Result<Vec<f32>> {
            Err(Error::Inference {
                reason: "device lost".to_string(),
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_rank_orders_by_descending_confidence() {
        let ranked = rank(&[0.2, 0.9, 0.5], &labels(&["a", "b", "c"]), 3);
        let order: Vec<(usize, f32)> = ranked
            .iter()
            .map(|c| (c.class_index, c.confidence))
            .collect();
        assert_eq!(order, vec![(1, 0.9), (2, 0.5), (0, 0.2)]);
    }

    #[test]
    fn test_rank_is_stable_for_ties() {
        let ranked = rank(&[0.3, 0.3, 0.4, 0.3], &labels(&["a", "b", "c", "d"]), 4);
        let indices: Vec<usize> = ranked.iter().map(|c| c.class_index).collect();
        assert_eq!(indices, vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_rank_keeps_top_k_and_labels_overflow() {
        let ranked = rank(&[0.1, 0.2, 0.3, 0.4], &labels(&["a", "b"]), 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].label, "Unknown");
        assert_eq!(ranked[0].class_index, 3);
        assert_eq!(ranked[2].label, "b");
    }

    #[test]
    fn test_rank_non_finite_scores_rank_last() {
        let ranked = rank(&[f32::NAN, 0.1, f32::INFINITY], &labels(&["a", "b", "c"]), 3);
        assert_eq!(ranked[0].class_index, 1);
        assert_eq!(ranked[1].confidence, 0.0);
        assert_eq!(ranked[2].confidence, 0.0);
    }

    #[test]
    fn test_rank_clamps_out_of_range_scores() {
        let ranked = rank(&[1.7, -0.3, 0.4], &labels(&["a", "b", "c"]), 3);
        assert_eq!(ranked[0].confidence, 1.0);
        assert_eq!(ranked[0].class_index, 0);
        assert_eq!(ranked[1].confidence, 0.4);
        assert_eq!(ranked[2].confidence, 0.0);
        assert_eq!(ranked[2].class_index, 1);
    }

    #[test]
    fn test_classify_runs_backend_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = FishClassifier::new(
            Box::new(FixedScores {
                scores: vec![0.05, 0.9, 0.05],
                calls: Arc::clone(&calls),
            }),
            labels(&["Torsk", "Sei", "Other"]),
            16,
        );

        let image = DynamicImage::new_rgb8(40, 30);
        let results = classifier.classify(&image);
        assert_eq!(results[0].label, "Sei");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(classifier.mode(), ModelMode::SingleClass);
    }

    #[test]
    fn test_inference_failure_yields_empty_list() {
        let classifier = FishClassifier::new(Box::new(Failing), labels(&["Torsk"]), 16);
        let tensor = preprocess(&DynamicImage::new_rgb8(8, 8), 16);
        assert!(classifier.classify_tensor(&tensor).is_empty());
        assert!(classifier.try_classify_tensor(&tensor).is_err());
    }

    #[test]
    fn test_unavailable_classifier_returns_empty() {
        let classifier = FishClassifier::unavailable(labels(&["Torsk"]), 16);
        assert!(!classifier.is_available());
        assert!(classifier.classify(&DynamicImage::new_rgb8(8, 8)).is_empty());
    }

    #[test]
    fn test_close_releases_exactly_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let classifier = FishClassifier::new(
            Box::new(FixedScores {
                scores: vec![1.0],
                calls: Arc::clone(&calls),
            }),
            labels(&["Torsk"]),
            16,
        );

        assert!(classifier.close());
        assert!(!classifier.close());
        assert!(classifier.classify(&DynamicImage::new_rgb8(8, 8)).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_from_config_without_model_is_unavailable() {
        let classifier = FishClassifier::from_config(&ModelConfig::default());
        assert!(!classifier.is_available());
        assert_eq!(classifier.labels().len(), 10);
        assert_eq!(classifier.mode(), ModelMode::MultiClass);
    }

    #[test]
    fn test_from_config_missing_model_file_is_unavailable() {
        let model = ModelConfig {
            path: Some("/nonexistent/fish_model.onnx".into()),
            ..ModelConfig::default()
        };
        let classifier = FishClassifier::from_config(&model);
        assert!(!classifier.is_available());
    }
}
