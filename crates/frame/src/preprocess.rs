//! # Observation preprocessing
//!
//! Colour emulator output is reduced to the 84×84 luminance image used as a
//! single slot of the frame stack:
//!
//! 1.  RGB → luminance with fixed-point BT.601 weights,
//! 2.  bilinear resize of the full frame to 110×84 (width × height),
//! 3.  crop of the horizontal band `13..97`, leaving 84×84.
//!
//! Every step is integer or fixed-filter arithmetic, so the same raw frame
//! always yields a bit-identical result.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use tracing::debug;

use crate::raw::{RawFrame, ATARI_HEIGHT, ATARI_WIDTH};
use crate::{Frame, FrameError};

// Y = 0.299 R + 0.587 G + 0.114 B in Q14.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Converts one RGB pixel to its 8-bit luminance.
// Weights sum to 1 << 14, so the result never exceeds 255.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn luminance([r, g, b]: [u8; 3]) -> u8 {
    let y = LUMA_R * u32::from(r) + LUMA_G * u32::from(g) + LUMA_B * u32::from(b);
    ((y + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/// Geometry of the preprocessing pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preprocessor {
    /// Expected raw frame size as `(height, width)`.
    pub input: (u32, u32),
    /// Intermediate size as `(width, height)`.
    pub resize: (u32, u32),
    /// First column kept by the crop.
    pub crop_x: u32,
    /// Side of the square output.
    pub output: u32,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self {
            input: (ATARI_HEIGHT, ATARI_WIDTH),
            resize: (110, 84),
            crop_x: 13,
            output: 84,
        }
    }
}

impl Preprocessor {
    /// Runs grayscale, resize and crop over `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::ShapeMismatch`] when `raw` is not the resolution
    /// this pipeline was built for, and [`FrameError::CropOutOfBounds`] when
    /// the square crop does not fit inside the resized image.
    pub fn apply(&self, raw: &RawFrame) -> Result<Frame, FrameError> {
        let actual = (raw.height(), raw.width());
        if actual != self.input {
            debug!(expected = ?self.input, ?actual, "unexpected raw frame resolution");
            return Err(FrameError::ShapeMismatch {
                expected: self.input,
                actual,
            });
        }
        let (w, h) = self.resize;
        if self.output == 0 || self.output > h || self.crop_x.saturating_add(self.output) > w {
            return Err(FrameError::CropOutOfBounds {
                crop_x: self.crop_x,
                side: self.output,
                resize: self.resize,
            });
        }

        let gray = self.grayscale(raw);
        let resized = imageops::resize(&gray, w, h, FilterType::Triangle);
        Ok(imageops::crop_imm(&resized, self.crop_x, 0, self.output, self.output).to_image())
    }

    fn grayscale(&self, raw: &RawFrame) -> GrayImage {
        let (height, width) = self.input;
        GrayImage::from_fn(width, height, |x, y| Luma([luminance(raw.pixel(x, y))]))
    }
}

/// Preprocesses a native-resolution raw frame with the default pipeline.
///
/// # Errors
///
/// Fails with [`FrameError::ShapeMismatch`] if `raw` is not 210×160.
pub fn preprocess_state(raw: &RawFrame) -> Result<Frame, FrameError> {
    Preprocessor::default().apply(raw)
}
