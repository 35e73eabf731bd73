//! Human-readable rendering of capture outcomes.

use crate::constants::{confidence as bounds, messages};
use crate::decision::{DecisionResult, RejectReason};
use crate::imaging::QualityMetrics;
use crate::inference::Classification;
use crate::pipeline::CaptureOutcome;
use crate::species::SpeciesRecord;
use std::fmt::Write;

/// Confidence as a whole percentage, truncated (0.987 → 98).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn percent(confidence: f32) -> u32 {
    (confidence.clamp(bounds::MIN, bounds::MAX) * 100.0) as u32
}

/// Short user-facing message for a decision.
pub fn outcome_message(decision: &DecisionResult) -> String {
    match decision {
        DecisionResult::Accepted { winner, .. } => {
            format!("{} ({}%)", winner.label, percent(winner.confidence))
        }
        DecisionResult::Rejected {
            reason: RejectReason::NoModel,
        } => messages::NOT_IDENTIFIED.to_string(),
        DecisionResult::Rejected { .. } => messages::UNCERTAIN.to_string(),
    }
}

/// Render a catalog entry on its own, without a confidence.
pub fn render_record(record: &SpeciesRecord) -> String {
    let mut out = String::new();
    write_record(&mut out, record, None);
    out
}

/// Render a species record with its confidence and the runner-up classes.
pub fn render_species(record: &SpeciesRecord, confidence: f32, top3: &[Classification]) -> String {
    let mut out = String::new();
    write_record(&mut out, record, Some(confidence));

    if top3.len() > 1 {
        let _ = writeln!(out);
        let _ = writeln!(out, "Andre muligheter:");
        for (rank, other) in top3.iter().enumerate().skip(1).take(2) {
            let _ = writeln!(
                out,
                "{}. {} - {}%",
                rank,
                other.label,
                percent(other.confidence)
            );
        }
    }

    out
}

fn write_record(out: &mut String, record: &SpeciesRecord, confidence: Option<f32>) {
    let _ = writeln!(out, "{}", record.display_name());
    for line in [&record.scientific_name, &record.english_name] {
        if !line.is_empty() {
            let _ = writeln!(out, "{line}");
        }
    }
    if let Some(confidence) = confidence {
        let _ = writeln!(out, "Sikkerhet: {}%", percent(confidence));
    }

    if !record.description.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", record.description);
    }
    if !record.habitat.is_empty() {
        let _ = writeln!(out, "Habitat: {}", record.habitat);
    }
    if !record.average_size.is_empty() {
        let _ = writeln!(out, "Størrelse: {}", record.average_size);
    }
    if !record.characteristics.is_empty() {
        let _ = writeln!(out);
        for characteristic in &record.characteristics {
            let _ = writeln!(out, "• {characteristic}");
        }
    }
}

/// Render a full capture outcome.
pub fn render_outcome(outcome: &CaptureOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", outcome.image_path.display());

    match (&outcome.decision, &outcome.species) {
        (DecisionResult::Accepted { winner, top3 }, Some(species)) => {
            out.push_str(&render_species(&species.record(), winner.confidence, top3));
        }
        (DecisionResult::Accepted { winner, top3 }, None) => {
            let record = SpeciesRecord::label_only(winner.label.clone());
            out.push_str(&render_species(&record, winner.confidence, top3));
        }
        (DecisionResult::Rejected { reason }, _) => {
            let _ = writeln!(out, "{}", outcome_message(&outcome.decision));
            let _ = writeln!(out, "  ({reason})");
        }
    }

    out
}

/// Render a capture that could not be read.
pub fn render_failure(path: &std::path::Path, error: &crate::error::Error) -> String {
    format!(
        "{}\n{}\n  ({error})\n",
        path.display(),
        messages::CAPTURE_FAILED
    )
}

/// Render a quality report line block.
pub fn render_quality(
    path: &std::path::Path,
    metrics: &QualityMetrics,
    issues: &[crate::imaging::QualityIssue],
) -> String {
    let mut out = String::new();
    let verdict = if issues.is_empty() { "OK" } else { "FAIL" };
    let _ = writeln!(out, "{} [{verdict}]", path.display());
    let _ = writeln!(
        out,
        "  brightness {:.3}  sharpness {:.3}  margin {:.3}",
        metrics.brightness, metrics.sharpness, metrics.central_margin
    );
    for issue in issues {
        let _ = writeln!(out, "  - {issue}");
    }
    out
}
