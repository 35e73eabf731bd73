//! Model input preprocessing.

use crate::constants::NUM_CHANNELS;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::warn;

/// Normalised model input: `size × size × 3` floats in `[-1, 1]`,
/// row-major, channels interleaved (R, G, B).
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    /// Flat NHWC data for a batch of one.
    pub data: Vec<f32>,
    /// Side length in pixels.
    pub size: u32,
}

impl ImageTensor {
    /// Tensor shape as `[batch, height, width, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        let side = self.size as usize;
        [1, side, side, NUM_CHANNELS]
    }

    fn neutral(size: u32) -> Self {
        let side = size as usize;
        Self {
            data: vec![0.0; side * side * NUM_CHANNELS],
            size,
        }
    }
}

/// Center-crop `image` to a square, resize it to `target_size` and
/// normalise every sample to `[-1, 1]`.
///
/// A zero-area image produces an all-zero tensor of the right length.
pub fn preprocess(image: &DynamicImage, target_size: u32) -> ImageTensor {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 || target_size == 0 {
        warn!(
            "Cannot preprocess {}x{} image to {}px, using neutral input",
            width, height, target_size
        );
        return ImageTensor::neutral(target_size);
    }

    let square = center_crop(image);
    let resized = image::imageops::resize(
        &square.to_rgb8(),
        target_size,
        target_size,
        FilterType::Triangle,
    );

    let data = resized
        .pixels()
        .flat_map(|pixel| pixel.0)
        .map(normalize_sample)
        .collect();

    ImageTensor {
        data,
        size: target_size,
    }
}

/// Crop the largest centered square out of `image`.
///
/// Offsets use floor division, so odd surplus pixels fall on the right
/// and bottom edges.
pub fn center_crop(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    let x_offset = (width - side) / 2;
    let y_offset = (height - side) / 2;
    image.crop_imm(x_offset, y_offset, side, side)
}

/// Reflect `image` about its vertical axis.
pub fn mirror(image: &DynamicImage) -> DynamicImage {
    image.fliph()
}

/// Map an 8-bit sample to `[-1, 1]`.
pub fn normalize_sample(value: u8) -> f32 {
    f32::from(value) / 127.5 - 1.0
}
