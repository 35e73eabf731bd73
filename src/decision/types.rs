//! Decision outcome types.

use crate::imaging::QualityIssue;
use crate::inference::Classification;
use serde::Serialize;
use std::fmt;

/// Final verdict for one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DecisionResult {
    /// The top classification is trustworthy enough to show.
    Accepted {
        /// Winning classification (rank 1 of the original pass).
        winner: Classification,
        /// Up to three ranked classifications, winner first.
        top3: Vec<Classification>,
    },
    /// No trustworthy answer.
    Rejected {
        /// Why the capture was rejected.
        reason: RejectReason,
    },
}

impl DecisionResult {
    /// Shorthand for a rejection.
    pub fn rejected(reason: RejectReason) -> Self {
        Self::Rejected { reason }
    }

    /// Whether the capture was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }

    /// Winning label, if accepted.
    pub fn winning_label(&self) -> Option<&str> {
        match self {
            Self::Accepted { winner, .. } => Some(&winner.label),
            Self::Rejected { .. } => None,
        }
    }

    /// Winning confidence, if accepted.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            Self::Accepted { winner, .. } => Some(winner.confidence),
            Self::Rejected { .. } => None,
        }
    }
}

/// Why a capture was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectReason {
    /// The original pass produced no classifications.
    NoModel,
    /// The image failed the quality gate before inference.
    PoorQuality {
        /// Every failing metric.
        issues: Vec<QualityIssue>,
    },
    /// A single-class model's top class was the catch-all.
    CatchAll {
        /// Confidence of the catch-all class.
        confidence: f32,
    },
    /// Top-1 confidence below its threshold.
    LowConfidence {
        /// Top-1 label.
        label: String,
        /// Top-1 confidence.
        confidence: f32,
        /// Threshold it had to reach.
        threshold: f32,
    },
    /// The mirrored pass did not confirm the original top-1.
    FlipDisagreement {
        /// Top-1 label of the original pass.
        expected: String,
        /// Top-1 of the mirrored pass, if any.
        flipped: Option<Classification>,
    },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoModel => write!(f, "no classification produced"),
            Self::PoorQuality { issues } => {
                write!(f, "poor image quality: ")?;
                for (i, issue) in issues.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{issue}")?;
                }
                Ok(())
            }
            Self::CatchAll { confidence } => {
                write!(f, "catch-all class won ({confidence:.3})")
            }
            Self::LowConfidence {
                label,
                confidence,
                threshold,
            } => write!(
                f,
                "{label} confidence {confidence:.3} below threshold {threshold:.3}"
            ),
            Self::FlipDisagreement { expected, flipped } => match flipped {
                Some(c) => write!(
                    f,
                    "mirrored image disagrees: expected {expected}, got {} ({:.3})",
                    c.label, c.confidence
                ),
                None => write!(
                    f,
                    "mirrored image disagrees: expected {expected}, got nothing"
                ),
            },
        }
    }
}
