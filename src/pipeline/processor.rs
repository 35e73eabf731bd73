//! Single capture processing pipeline.

use crate::config::ThresholdConfig;
use crate::decision::{DecisionPolicy, DecisionResult};
use crate::error::{Error, Result};
use crate::imaging::{QualityMetrics, mirror};
use crate::inference::{Classification, FishClassifier};
use crate::species::{Resolution, SpeciesResolver};
use image::{DynamicImage, ImageDecoder, ImageError, ImageReader};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Everything a capture needs besides the image itself.
///
/// Cheap to clone; all heavy state is shared.
#[derive(Clone)]
pub struct CaptureContext {
    /// Shared classifier (serialises model access internally).
    pub classifier: Arc<FishClassifier>,
    /// Thresholds for the decision policy and quality gate.
    pub thresholds: Arc<ThresholdConfig>,
    /// Species lookup for accepted captures.
    pub resolver: Arc<SpeciesResolver>,
    /// Whether to reject poor-quality images before inference.
    pub quality_gate: bool,
}

/// Result of processing one capture.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureOutcome {
    /// Where the captured image is stored.
    pub image_path: PathBuf,
    /// Quality metrics of the image.
    pub quality: QualityMetrics,
    /// Accept/reject verdict.
    pub decision: DecisionResult,
    /// Resolved species, present only when accepted.
    pub species: Option<Resolution>,
    /// Wall-clock processing time in seconds.
    pub duration_secs: f64,
}

impl CaptureContext {
    fn policy(&self) -> DecisionPolicy<'_> {
        DecisionPolicy::new(&self.thresholds, self.classifier.mode())
    }

    /// Quality-gate rejection for `quality`, if the gate is on and fails.
    pub fn screen(&self, quality: &QualityMetrics) -> Option<DecisionResult> {
        if self.quality_gate {
            self.policy().check_quality(quality)
        } else {
            None
        }
    }

    /// Apply the policy to both passes and resolve the winner.
    pub fn conclude(
        &self,
        image_path: &Path,
        quality: QualityMetrics,
        original: &[Classification],
        flipped: &[Classification],
        started: Instant,
    ) -> CaptureOutcome {
        let decision = self.policy().decide(original, flipped);
        let species = match &decision {
            DecisionResult::Accepted { winner, .. } => Some(
                self.resolver
                    .resolve(Some(&winner.label), winner.class_index),
            ),
            DecisionResult::Rejected { .. } => None,
        };
        self.finish(image_path, quality, decision, species, started)
    }

    /// Outcome for a capture stopped by the quality gate.
    pub fn rejected(
        &self,
        image_path: &Path,
        quality: QualityMetrics,
        decision: DecisionResult,
        started: Instant,
    ) -> CaptureOutcome {
        self.finish(image_path, quality, decision, None, started)
    }

    fn finish(
        &self,
        image_path: &Path,
        quality: QualityMetrics,
        decision: DecisionResult,
        species: Option<Resolution>,
        started: Instant,
    ) -> CaptureOutcome {
        let duration_secs = started.elapsed().as_secs_f64();
        match &decision {
            DecisionResult::Accepted { winner, .. } => info!(
                "{}: {} ({:.1}%) in {:.2}s",
                image_path.display(),
                winner.label,
                winner.confidence * 100.0,
                duration_secs
            ),
            DecisionResult::Rejected { reason } => info!(
                "{}: rejected, {} in {:.2}s",
                image_path.display(),
                reason,
                duration_secs
            ),
        }

        CaptureOutcome {
            image_path: image_path.to_path_buf(),
            quality,
            decision,
            species,
            duration_secs,
        }
    }

    /// Run the full pipeline on an already decoded image, both passes in
    /// sequence on the calling thread.
    pub fn evaluate(&self, image: &DynamicImage, image_path: &Path) -> CaptureOutcome {
        let started = Instant::now();
        let quality = QualityMetrics::analyze(image);
        debug!(
            "Quality: brightness {:.3}, sharpness {:.3}, margin {:.3}",
            quality.brightness, quality.sharpness, quality.central_margin
        );

        if let Some(rejection) = self.screen(&quality) {
            return self.rejected(image_path, quality, rejection, started);
        }

        let original = self.classifier.classify(image);
        let flipped = self.classifier.classify(&mirror(image));
        self.conclude(image_path, quality, &original, &flipped, started)
    }
}

/// Decode an image file, applying its EXIF orientation.
pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    let decode_error = |source: ImageError| Error::ImageDecode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| decode_error(ImageError::IoError(e)))?;
    let mut decoder = reader.into_decoder().map_err(decode_error)?;
    let orientation = decoder.orientation().map_err(decode_error)?;
    let mut image = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
    image.apply_orientation(orientation);

    debug!(
        "Decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Decode and evaluate one capture.
pub fn process_capture(path: &Path, context: &CaptureContext) -> Result<CaptureOutcome> {
    info!("Processing: {}", path.display());
    let image = decode_image(path)?;
    Ok(context.evaluate(&image, path))
}
