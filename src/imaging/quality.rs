//! Capture quality metrics.
//!
//! Brightness and sharpness are measured on small downscaled samples so the
//! cost does not grow with sensor resolution. None of the metrics can fail:
//! a zero-sized image scores 0.0 on every metric.

use crate::config::ThresholdConfig;
use crate::constants::quality::{BRIGHTNESS_SAMPLE, LUMA_WEIGHTS, MARGIN_FACTOR, SHARPNESS_SAMPLE};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb};
use serde::Serialize;
use std::fmt;

/// Scalar quality scores for one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityMetrics {
    /// Mean luma, 0 (black) to 1 (white).
    pub brightness: f32,
    /// Laplacian variance; unbounded, 0 for a flat image.
    pub sharpness: f32,
    /// Share of the frame covered by the centered framing square.
    pub central_margin: f32,
}

impl QualityMetrics {
    /// Compute all metrics for `image`.
    pub fn analyze(image: &DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            brightness: brightness(image),
            sharpness: sharpness(image),
            central_margin: central_margin(width, height),
        }
    }

    /// Every metric falling below its configured minimum.
    ///
    /// A metric equal to its minimum passes.
    pub fn issues(&self, thresholds: &ThresholdConfig) -> Vec<QualityIssue> {
        let mut issues = Vec::new();

        if self.brightness < thresholds.min_brightness {
            issues.push(QualityIssue::TooDark {
                brightness: self.brightness,
                minimum: thresholds.min_brightness,
            });
        }
        if self.sharpness < thresholds.min_sharpness {
            issues.push(QualityIssue::TooBlurry {
                sharpness: self.sharpness,
                minimum: thresholds.min_sharpness,
            });
        }
        if self.central_margin < thresholds.min_margin {
            issues.push(QualityIssue::PoorFraming {
                margin: self.central_margin,
                minimum: thresholds.min_margin,
            });
        }

        issues
    }
}

/// A quality metric below its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QualityIssue {
    /// Not enough light.
    TooDark {
        /// Measured brightness.
        brightness: f32,
        /// Configured minimum.
        minimum: f32,
    },
    /// Out of focus or motion-blurred.
    TooBlurry {
        /// Measured sharpness.
        sharpness: f32,
        /// Configured minimum.
        minimum: f32,
    },
    /// Aspect ratio leaves too little of the frame in the center.
    PoorFraming {
        /// Measured central margin.
        margin: f32,
        /// Configured minimum.
        minimum: f32,
    },
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooDark {
                brightness,
                minimum,
            } => write!(f, "too dark (brightness {brightness:.3} < {minimum:.3})"),
            Self::TooBlurry { sharpness, minimum } => {
                write!(f, "too blurry (sharpness {sharpness:.3} < {minimum:.3})")
            }
            Self::PoorFraming { margin, minimum } => {
                write!(f, "poorly framed (margin {margin:.3} < {minimum:.3})")
            }
        }
    }
}

fn luma(pixel: Rgb<u8>) -> f32 {
    let [r, g, b] = pixel.0;
    LUMA_WEIGHTS[0] * f32::from(r) + LUMA_WEIGHTS[1] * f32::from(g) + LUMA_WEIGHTS[2] * f32::from(b)
}

fn is_empty(image: &DynamicImage) -> bool {
    image.width() == 0 || image.height() == 0
}

/// Mean luma of a 64×64 sample, scaled to `[0, 1]`.
pub fn brightness(image: &DynamicImage) -> f32 {
    if is_empty(image) {
        return 0.0;
    }

    let sample = image
        .resize_exact(BRIGHTNESS_SAMPLE, BRIGHTNESS_SAMPLE, FilterType::Triangle)
        .to_rgb8();

    let total: f64 = sample.pixels().map(|p| f64::from(luma(*p))).sum();
    let count = f64::from(sample.width()) * f64::from(sample.height());
    #[allow(clippy::cast_possible_truncation)]
    let mean = (total / count) as f32;

    (mean / 255.0).clamp(0.0, 1.0)
}

/// Population variance of the 4-neighbour Laplacian over the interior of a
/// 128×128 grayscale sample.
pub fn sharpness(image: &DynamicImage) -> f32 {
    if is_empty(image) {
        return 0.0;
    }

    let sample = image
        .resize_exact(SHARPNESS_SAMPLE, SHARPNESS_SAMPLE, FilterType::Triangle)
        .to_rgb8();
    let (w, h) = (sample.width() as usize, sample.height() as usize);
    if w < 3 || h < 3 {
        return 0.0;
    }

    let gray: Vec<f32> = sample.pixels().map(|p| luma(*p)).collect();
    let at = |x: usize, y: usize| gray[y * w + x];

    let mut responses = Vec::with_capacity((w - 2) * (h - 2));
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let center = at(x, y);
            // Summing neighbour differences keeps a flat region at exactly 0.
            let response = (at(x - 1, y) - center)
                + (at(x + 1, y) - center)
                + (at(x, y - 1) - center)
                + (at(x, y + 1) - center);
            responses.push(f64::from(response));
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let n = responses.len() as f64;
    let mean = responses.iter().sum::<f64>() / n;
    let variance = responses.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    #[allow(clippy::cast_possible_truncation)]
    let variance = variance as f32;
    variance.max(0.0)
}

/// Fraction of a `width × height` frame covered by the square of half-size
/// `0.5 * min(width, height)` centered in it.
///
/// A square frame scores 1.0; a frame with aspect ratio `r` scores `1/r`.
pub fn central_margin(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let (w, h) = (width as f32, height as f32);
    let margin = MARGIN_FACTOR * w.min(h);
    let (cx, cy) = (w / 2.0, h / 2.0);

    let overlap_x = ((cx + margin).min(w) - (cx - margin).max(0.0)).max(0.0);
    let overlap_y = ((cy + margin).min(h) - (cy - margin).max(0.0)).max(0.0);

    ((overlap_x * overlap_y) / (w * h)).clamp(0.0, 1.0)
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn uniform(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value; 3])))
    }

    #[test]
    fn test_central_margin_square_is_one() {
        assert_eq!(central_margin(500, 500), 1.0);
        assert_eq!(central_margin(1, 1), 1.0);
    }

    #[test]
    fn test_central_margin_aspect_ratio() {
        assert_eq!(central_margin(100, 200), 0.5);
        assert_eq!(central_margin(200, 100), 0.5);
        assert!((central_margin(1920, 1080) - 1080.0 / 1920.0).abs() < 1e-6);
    }

    #[test]
    fn test_central_margin_degenerate() {
        assert_eq!(central_margin(0, 100), 0.0);
        assert_eq!(central_margin(100, 0), 0.0);
    }

    #[test]
    fn test_brightness_uniform_gray_independent_of_size() {
        let expected = 128.0 / 255.0;
        for (w, h) in [(64, 64), (10, 30), (640, 480)] {
            let b = brightness(&uniform(w, h, 128));
            assert!((b - expected).abs() < 1e-4, "{w}x{h}: {b}");
        }
    }

    #[test]
    fn test_brightness_bounds() {
        assert!(brightness(&uniform(20, 20, 0)).abs() < 1e-6);
        assert!((brightness(&uniform(20, 20, 255)) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_sharpness_uniform_is_exactly_zero() {
        for value in [0, 77, 128, 255] {
            assert_eq!(sharpness(&uniform(300, 200, value)), 0.0);
        }
        let tinted = DynamicImage::ImageRgb8(RgbImage::from_pixel(90, 90, Rgb([12, 200, 99])));
        assert_eq!(sharpness(&tinted), 0.0);
    }

    #[test]
    fn test_sharp_pattern_scores_higher_than_smooth_gradient() {
        let stripes = DynamicImage::ImageRgb8(RgbImage::from_fn(128, 128, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        }));
        let gradient = DynamicImage::ImageRgb8(RgbImage::from_fn(128, 128, |x, _| {
            Rgb([(x * 2) as u8; 3])
        }));

        let sharp = sharpness(&stripes);
        let smooth = sharpness(&gradient);
        assert!(sharp > 1000.0, "stripes: {sharp}");
        assert!(smooth < sharp / 100.0, "gradient: {smooth}");
    }

    #[test]
    fn test_empty_image_scores_zero() {
        let empty = DynamicImage::new_rgb8(0, 0);
        let metrics = QualityMetrics::analyze(&empty);
        assert_eq!(metrics.brightness, 0.0);
        assert_eq!(metrics.sharpness, 0.0);
        assert_eq!(metrics.central_margin, 0.0);
    }

    #[test]
    fn test_issues_inclusive_minimums() {
        let thresholds = ThresholdConfig::default();
        let at_limits = QualityMetrics {
            brightness: thresholds.min_brightness,
            sharpness: thresholds.min_sharpness,
            central_margin: thresholds.min_margin,
        };
        assert!(at_limits.issues(&thresholds).is_empty());
    }

    #[test]
    fn test_issues_reports_every_failure() {
        let thresholds = ThresholdConfig::default();
        let dark_flat = QualityMetrics::analyze(&uniform(400, 100, 10));
        let issues = dark_flat.issues(&thresholds);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], QualityIssue::TooDark { .. }));
        assert!(matches!(issues[1], QualityIssue::TooBlurry { .. }));
    }
}
