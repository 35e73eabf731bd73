//! Capture output: terminal rendering, JSON events and progress bars.

pub mod display;
pub mod json_envelope;
pub mod progress;
mod reporter;

pub use reporter::{
    CaptureReporter, CaptureSummary, HumanReporter, JsonReporter, create_reporter,
    emit_json_result,
};
