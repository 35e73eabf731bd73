//! Acceptance policy over the original and mirrored inference passes.

use crate::config::ThresholdConfig;
use crate::constants::TOP_K;
use crate::decision::{DecisionResult, RejectReason};
use crate::imaging::QualityMetrics;
use crate::inference::{Classification, ModelMode, is_catch_all};
use tracing::debug;

/// Pure decision function parameterised by thresholds and model mode.
#[derive(Debug, Clone, Copy)]
pub struct DecisionPolicy<'a> {
    thresholds: &'a ThresholdConfig,
    mode: ModelMode,
}

impl<'a> DecisionPolicy<'a> {
    /// Create a policy for a model operating in `mode`.
    pub fn new(thresholds: &'a ThresholdConfig, mode: ModelMode) -> Self {
        Self { thresholds, mode }
    }

    /// Reject an image whose quality metrics fall below the minimums.
    ///
    /// Returns `None` when every metric passes.
    pub fn check_quality(&self, metrics: &QualityMetrics) -> Option<DecisionResult> {
        let issues = metrics.issues(self.thresholds);
        if issues.is_empty() {
            return None;
        }
        debug!("Quality gate rejected capture: {} issue(s)", issues.len());
        Some(DecisionResult::rejected(RejectReason::PoorQuality { issues }))
    }

    /// Decide from the ranked results of both passes.
    ///
    /// Confidence comparisons are inclusive: a score equal to its threshold
    /// is accepted.
    pub fn decide(&self, original: &[Classification], flipped: &[Classification]) -> DecisionResult {
        let Some(top) = original.first() else {
            return DecisionResult::rejected(RejectReason::NoModel);
        };

        if self.mode == ModelMode::SingleClass && is_catch_all(&top.label) {
            debug!("Catch-all class won at {:.3}", top.confidence);
            return DecisionResult::rejected(RejectReason::CatchAll {
                confidence: top.confidence,
            });
        }

        let threshold = self.thresholds.threshold_for(&top.label, self.mode);
        if top.confidence < threshold {
            debug!(
                "{} at {:.3} below threshold {:.3}",
                top.label, top.confidence, threshold
            );
            return DecisionResult::rejected(RejectReason::LowConfidence {
                label: top.label.clone(),
                confidence: top.confidence,
                threshold,
            });
        }

        if self.mode == ModelMode::SingleClass && self.thresholds.require_flip_agreement {
            let flipped_top = flipped.first();
            let agrees = flipped_top
                .is_some_and(|f| f.label == top.label && f.confidence >= threshold);
            if !agrees {
                debug!("Mirrored pass does not confirm {}", top.label);
                return DecisionResult::rejected(RejectReason::FlipDisagreement {
                    expected: top.label.clone(),
                    flipped: flipped_top.cloned(),
                });
            }
        }

        DecisionResult::Accepted {
            winner: top.clone(),
            top3: original.iter().take(TOP_K).cloned().collect(),
        }
    }
}
