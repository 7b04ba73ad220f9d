#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Frames
//!
//! Pixel plumbing between an arcade emulator and a learner.
//!
//! -   [`RawFrame`] is what the emulator renders: a row-major RGB image.
//! -   [`preprocess_state`] turns it into an 84×84 single-channel [`Frame`].
//! -   [`FrameStack`] keeps the most recent frames, oldest first, so a single
//!     observation carries some motion history.

use thiserror::Error;

pub mod preprocess;
pub mod raw;
pub mod stack;

pub use preprocess::{preprocess_state, Preprocessor};
pub use raw::{RawFrame, ATARI_HEIGHT, ATARI_WIDTH};
pub use stack::FrameStack;

/// A preprocessed, single-channel observation.
pub type Frame = image::GrayImage;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("raw frame buffer holds {actual} bytes, expected {expected}")]
    BufferLength { expected: usize, actual: usize },
    #[error("raw frame is {actual:?} (height, width), expected {expected:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("{side}x{side} crop at column {crop_x} does not fit a {resize:?} (w, h) image")]
    CropOutOfBounds {
        crop_x: u32,
        side: u32,
        resize: (u32, u32),
    },
    #[error("frame stack depth must be at least 1")]
    EmptyStack,
}
