//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "fisk";

/// Default side length of the square model input, in pixels.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Largest accepted model input side length.
pub const MAX_INPUT_SIZE: u32 = 4096;

/// Number of colour channels in the model input tensor.
pub const NUM_CHANNELS: usize = 3;

/// Number of ranked classifications retained per inference pass.
pub const TOP_K: usize = 3;

/// Reserved label of the synthetic catch-all class in single-class models.
pub const CATCH_ALL_LABEL: &str = "Other";

/// Label given to score indices beyond the end of the label list.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Display name used when no label survived the pipeline at all.
pub const UNKNOWN_SPECIES: &str = "Ukjent art";

/// Labels used when no label file can be read.
///
/// Index-aligned with the curated species catalog.
pub const DEFAULT_LABELS: [&str; 10] = [
    "Torsk",
    "Sei",
    "Hyse",
    "Laks",
    "Ørret",
    "Makrell",
    "Sild",
    "Rødspette",
    "Kveite",
    "Abbor",
];

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Default decision thresholds.
pub mod thresholds {
    /// Acceptance threshold for multi-class models.
    pub const MULTI_CLASS: f32 = 0.60;

    /// Acceptance threshold for single-class models.
    pub const SINGLE_CLASS: f32 = 0.98;

    /// Whether single-class models must agree with the mirrored pass.
    pub const REQUIRE_FLIP_AGREEMENT: bool = true;

    /// Minimum mean brightness (0-1).
    pub const MIN_BRIGHTNESS: f32 = 0.15;

    /// Minimum Laplacian variance.
    pub const MIN_SHARPNESS: f32 = 0.08;

    /// Minimum central framing margin (0-1).
    pub const MIN_MARGIN: f32 = 0.15;
}

/// Image quality analysis constants.
pub mod quality {
    /// Side length of the sample used for brightness.
    pub const BRIGHTNESS_SAMPLE: u32 = 64;

    /// Side length of the sample used for sharpness.
    pub const SHARPNESS_SAMPLE: u32 = 128;

    /// Half-size of the central framing square relative to the short side.
    pub const MARGIN_FACTOR: f32 = 0.5;

    /// ITU-R BT.601 luma weights for R, G, B.
    pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];
}

/// Confidence value bounds.
pub mod confidence {
    /// Minimum valid confidence value.
    pub const MIN: f32 = 0.0;
    /// Maximum valid confidence value.
    pub const MAX: f32 = 1.0;
}

/// User-facing outcome messages.
pub mod messages {
    /// Shown when a capture is rejected as untrustworthy.
    pub const UNCERTAIN: &str = "Usikker gjenkjenning – prøv igjen med bedre lys/utsnitt";

    /// Shown when no classification could be produced at all.
    pub const NOT_IDENTIFIED: &str = "Kunne ikke identifisere fisk";

    /// Shown when the captured image cannot be read.
    pub const CAPTURE_FAILED: &str = "Kunne ikke ta bilde";
}

/// Capture worker constants.
pub mod worker {
    /// Number of captures that may wait behind the in-flight one.
    pub const QUEUE_CAPACITY: usize = 16;
}
