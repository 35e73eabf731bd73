//! Capture reporting for CLI output.
//!
//! A trait for reporting pipeline events, with a human-readable and an
//! NDJSON implementation.

use crate::decision::DecisionResult;
use crate::error::Error;
use crate::inference::ModelMode;
use crate::output::display;
use crate::output::json_envelope::{
    CancelledPayload, CaptureCompletedPayload, CaptureStatus, EventType, JsonEnvelope,
    PipelineCompletedPayload, PipelineStartedPayload,
};
use crate::pipeline::CaptureOutcome;
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Trait for reporting capture pipeline events.
pub trait CaptureReporter: Send + Sync {
    /// Report pipeline start.
    fn pipeline_started(&self, total: usize, model: Option<&Path>, available: bool, mode: ModelMode);

    /// Report a processed capture.
    fn capture_completed(&self, outcome: &CaptureOutcome);

    /// Report a capture that could not be processed.
    fn capture_failed(&self, file: &Path, error: &Error);

    /// Report pipeline completion.
    fn pipeline_completed(&self, summary: &CaptureSummary);

    /// Report cancellation.
    fn cancelled(&self, completed: usize, total: usize);
}

/// Counts of capture outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Captures accepted.
    pub accepted: usize,
    /// Captures rejected.
    pub rejected: usize,
    /// Captures that failed.
    pub failed: usize,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl CaptureSummary {
    /// Count an outcome.
    pub fn record(&mut self, decision: &DecisionResult) {
        if decision.is_accepted() {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }
    }

    /// Captures that produced an outcome or failed.
    pub fn completed(&self) -> usize {
        self.accepted + self.rejected + self.failed
    }
}

/// Writes a shared sink, remembering only the first write failure.
struct Sink {
    writer: Mutex<Box<dyn Write + Send>>,
    error_logged: AtomicBool,
}

impl Sink {
    fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            error_logged: AtomicBool::new(false),
        }
    }

    fn write(&self, text: &str) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writer.write_all(text.as_bytes()).and_then(|()| writer.flush())
            && !self.error_logged.swap(true, Ordering::Relaxed)
        {
            // stderr, so a broken stdout pipe does not hide the cause
            eprintln!("fisk: warning: failed to write output: {e} (subsequent errors suppressed)");
        }
    }
}

/// Human-readable reporter.
pub struct HumanReporter {
    sink: Sink,
}

impl HumanReporter {
    /// Reporter writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Reporter writing to a custom writer.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Sink::new(Box::new(writer)),
        }
    }
}

impl Default for HumanReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureReporter for HumanReporter {
    fn pipeline_started(&self, _total: usize, _model: Option<&Path>, _available: bool, _mode: ModelMode) {}

    fn capture_completed(&self, outcome: &CaptureOutcome) {
        self.sink.write(&format!("{}\n", display::render_outcome(outcome)));
    }

    fn capture_failed(&self, file: &Path, error: &Error) {
        self.sink
            .write(&format!("{}\n", display::render_failure(file, error)));
    }

    fn pipeline_completed(&self, summary: &CaptureSummary) {
        if summary.completed() > 1 {
            self.sink.write(&format!(
                "{} accepted, {} rejected, {} failed\n",
                summary.accepted, summary.rejected, summary.failed
            ));
        }
    }

    fn cancelled(&self, completed: usize, total: usize) {
        self.sink
            .write(&format!("Cancelled after {completed} of {total} captures\n"));
    }
}

/// NDJSON reporter: one envelope per line.
pub struct JsonReporter {
    sink: Sink,
}

impl JsonReporter {
    /// Reporter writing to stdout.
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Reporter writing to a custom writer.
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Sink::new(Box::new(writer)),
        }
    }

    fn emit<T: serde::Serialize>(&self, event: EventType, payload: T) {
        let envelope = JsonEnvelope::new(event, payload);
        match serde_json::to_string(&envelope) {
            Ok(json) => self.sink.write(&format!("{json}\n")),
            Err(e) => eprintln!("fisk: error: failed to serialize JSON event: {e}"),
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureReporter for JsonReporter {
    fn pipeline_started(&self, total: usize, model: Option<&Path>, available: bool, mode: ModelMode) {
        self.emit(
            EventType::PipelineStarted,
            PipelineStartedPayload {
                total_captures: total,
                model: model.map(Path::to_path_buf),
                model_available: available,
                mode,
            },
        );
    }

    fn capture_completed(&self, outcome: &CaptureOutcome) {
        let status = if outcome.decision.is_accepted() {
            CaptureStatus::Accepted
        } else {
            CaptureStatus::Rejected
        };
        self.emit(
            EventType::CaptureCompleted,
            CaptureCompletedPayload {
                file: outcome.image_path.clone(),
                status,
                message: display::outcome_message(&outcome.decision),
                outcome: Some(outcome.clone()),
                error: None,
            },
        );
    }

    fn capture_failed(&self, file: &Path, error: &Error) {
        self.emit(
            EventType::CaptureCompleted,
            CaptureCompletedPayload {
                file: file.to_path_buf(),
                status: CaptureStatus::Failed,
                message: crate::constants::messages::CAPTURE_FAILED.to_string(),
                outcome: None,
                error: Some(error.to_string()),
            },
        );
    }

    fn pipeline_completed(&self, summary: &CaptureSummary) {
        self.emit(
            EventType::PipelineCompleted,
            PipelineCompletedPayload {
                accepted: summary.accepted,
                rejected: summary.rejected,
                failed: summary.failed,
                duration_ms: summary.duration_ms,
            },
        );
    }

    fn cancelled(&self, completed: usize, total: usize) {
        self.emit(
            EventType::Cancelled,
            CancelledPayload {
                captures_completed: completed,
                captures_total: total,
            },
        );
    }
}

/// Create a reporter for the selected output mode.
pub fn create_reporter(json: bool) -> Box<dyn CaptureReporter> {
    if json {
        Box::new(JsonReporter::new())
    } else {
        Box::new(HumanReporter::new())
    }
}

/// Emit a JSON result event to stdout.
pub fn emit_json_result<T: serde::Serialize>(payload: &T) {
    let envelope = JsonEnvelope::new(EventType::Result, payload);
    match serde_json::to_string(&envelope) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("fisk: error: failed to serialize JSON result: {e}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::decision::RejectReason;
    use crate::imaging::QualityMetrics;
    use std::path::PathBuf;
    use std::sync::Arc;

    /// Test writer that captures output.
    #[derive(Clone, Default)]
    struct TestWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl TestWriter {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
        }
    }

    impl Write for TestWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn rejected_outcome() -> CaptureOutcome {
        CaptureOutcome {
            image_path: PathBuf::from("fangst.jpg"),
            quality: QualityMetrics {
                brightness: 0.4,
                sharpness: 20.0,
                central_margin: 0.75,
            },
            decision: DecisionResult::rejected(RejectReason::NoModel),
            species: None,
            duration_secs: 0.01,
        }
    }

    #[test]
    fn test_json_reporter_emits_one_line_per_event() {
        let writer = TestWriter::default();
        let reporter = JsonReporter::with_writer(writer.clone());

        reporter.pipeline_started(2, None, false, ModelMode::MultiClass);
        reporter.capture_completed(&rejected_outcome());
        reporter.capture_failed(Path::new("broken.jpg"), &Error::WorkerShutdown);

        let output = writer.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"event\":\"pipeline_started\""));
        assert!(lines[1].contains("\"status\":\"rejected\""));
        assert!(lines[1].contains("\"code\":\"no_model\""));
        assert!(lines[2].contains("\"status\":\"failed\""));

        let parsed: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed["payload"]["message"], "Kunne ikke identifisere fisk");
    }

    #[test]
    fn test_human_reporter_renders_rejection() {
        let writer = TestWriter::default();
        let reporter = HumanReporter::with_writer(writer.clone());

        reporter.capture_completed(&rejected_outcome());
        assert!(writer.contents().contains("Kunne ikke identifisere fisk"));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = CaptureSummary::default();
        summary.record(&DecisionResult::rejected(RejectReason::NoModel));
        summary.failed += 1;
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.completed(), 2);
    }

    #[test]
    fn test_reporter_handles_write_errors() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let reporter = JsonReporter::with_writer(FailingWriter);
        reporter.pipeline_started(1, None, false, ModelMode::MultiClass);
        reporter.cancelled(0, 1);
    }
}
