//! Progress bar utilities for capture processing.

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for processing multiple captures.
///
/// A single capture gets no bar.
pub fn create_capture_progress(total: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total < 2 {
        return None;
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} images ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    Some(pb)
}

/// Run `f` with the bar hidden, so printed output does not tear it.
pub fn suspend<R>(pb: Option<&ProgressBar>, f: impl FnOnce() -> R) -> R {
    match pb {
        Some(pb) => pb.suspend(f),
        None => f(),
    }
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

/// Increment a progress bar.
pub fn inc_progress(pb: Option<&ProgressBar>) {
    if let Some(pb) = pb {
        pb.inc(1);
    }
}
