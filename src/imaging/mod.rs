//! Image preprocessing and capture quality analysis.

mod preprocess;
mod quality;

pub use preprocess::{ImageTensor, center_crop, mirror, normalize_sample, preprocess};
pub use quality::{QualityIssue, QualityMetrics, brightness, central_margin, sharpness};
