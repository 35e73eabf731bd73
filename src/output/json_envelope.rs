//! JSON envelope types for CLI output.
//!
//! With `--json`, every event is printed as one envelope per line so the
//! CLI can sit behind another program (a camera app, a web frontend).

use crate::imaging::{QualityIssue, QualityMetrics};
use crate::inference::ModelMode;
use crate::pipeline::CaptureOutcome;
use crate::species::SpeciesRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Version of the JSON envelope format.
pub const SPEC_VERSION: &str = "1.0";

/// JSON envelope wrapping all CLI output events.
#[derive(Debug, Serialize)]
pub struct JsonEnvelope<T> {
    /// API specification version.
    pub spec_version: String,
    /// Event timestamp.
    pub timestamp: DateTime<Utc>,
    /// Event type.
    pub event: EventType,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> JsonEnvelope<T> {
    /// Create a new envelope with the current timestamp.
    pub fn new(event: EventType, payload: T) -> Self {
        Self {
            spec_version: SPEC_VERSION.to_string(),
            timestamp: Utc::now(),
            event,
            payload,
        }
    }
}

/// Event types for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// Capture processing starting.
    PipelineStarted,
    /// One capture finished (accepted, rejected or failed).
    CaptureCompleted,
    /// All captures processed.
    PipelineCompleted,
    /// Final result of a non-pipeline command.
    Result,
    /// Operation cancelled.
    Cancelled,
}

/// Result type discriminator for result payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Image quality report.
    Quality,
    /// Curated species list.
    SpeciesList,
    /// One curated species.
    SpeciesInfo,
    /// Configuration display.
    Config,
}

/// Capture status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureStatus {
    /// A species was accepted.
    Accepted,
    /// The decision policy rejected the capture.
    Rejected,
    /// The capture could not be processed.
    Failed,
}

/// Payload for `pipeline_started` event.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStartedPayload {
    /// Number of captures queued.
    pub total_captures: usize,
    /// Model file, if one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    /// Whether the model loaded.
    pub model_available: bool,
    /// Model regime.
    pub mode: ModelMode,
}

/// Payload for `capture_completed` event.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureCompletedPayload {
    /// Image path.
    pub file: PathBuf,
    /// Capture status.
    pub status: CaptureStatus,
    /// User-facing message.
    pub message: String,
    /// Full outcome (absent on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CaptureOutcome>,
    /// Error details (present on failure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Payload for `pipeline_completed` event.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineCompletedPayload {
    /// Captures accepted.
    pub accepted: usize,
    /// Captures rejected.
    pub rejected: usize,
    /// Captures that failed.
    pub failed: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

/// Payload for cancelled event.
#[derive(Debug, Clone, Serialize)]
pub struct CancelledPayload {
    /// Captures completed before cancellation.
    pub captures_completed: usize,
    /// Total captures that were planned.
    pub captures_total: usize,
}

/// Payload for quality result.
#[derive(Debug, Clone, Serialize)]
pub struct QualityPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// One entry per image.
    pub images: Vec<QualityEntry>,
}

/// Quality report for one image.
#[derive(Debug, Clone, Serialize)]
pub struct QualityEntry {
    /// Image path.
    pub file: PathBuf,
    /// Measured metrics.
    pub metrics: QualityMetrics,
    /// Failing metrics; empty when the image passes.
    pub issues: Vec<QualityIssue>,
}

/// Payload for species list result.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesListPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Curated species.
    pub species: Vec<SpeciesRecord>,
}

/// Payload for species info result.
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesInfoPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// The species.
    pub species: SpeciesRecord,
}

/// Payload for config show result.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPayload {
    /// Result type discriminator.
    pub result_type: ResultType,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// The configuration contents.
    pub config: serde_json::Value,
}
