use std::collections::VecDeque;

use crate::{Frame, FrameError};

/// The `depth` most recent preprocessed frames, oldest first.
///
/// The stack never changes length: [`FrameStack::push`] drops the oldest frame
/// and appends the newest one. Consumers that need to keep a past state around
/// after the owner pushes again must `clone()` it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameStack {
    frames: VecDeque<Frame>,
}

impl FrameStack {
    /// A stack of `depth` copies of `frame`, used at the start of an episode
    /// when there is no history yet.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::EmptyStack`] when `depth` is zero.
    pub fn filled(frame: &Frame, depth: usize) -> Result<Self, FrameError> {
        if depth == 0 {
            return Err(FrameError::EmptyStack);
        }
        let mut frames = VecDeque::with_capacity(depth);
        frames.extend(std::iter::repeat(frame).take(depth).cloned());
        Ok(Self { frames })
    }

    /// Slides the window: the oldest frame leaves, `frame` becomes the newest.
    pub fn push(&mut self, frame: Frame) {
        self.frames.pop_front();
        self.frames.push_back(frame);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of frames held; identical to [`FrameStack::len`].
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Frames from oldest to newest.
    pub fn frames(&self) -> impl ExactSizeIterator<Item = &Frame> + '_ {
        self.frames.iter()
    }

    #[must_use]
    pub fn oldest(&self) -> &Frame {
        &self.frames[0]
    }

    #[must_use]
    pub fn newest(&self) -> &Frame {
        &self.frames[self.frames.len() - 1]
    }

    /// `[depth, height, width]`.
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        let (w, h) = self.oldest().dimensions();
        [self.frames.len(), h as usize, w as usize]
    }

    /// Flattens the stack into a `depth × height × width` buffer of raw pixel
    /// intensities (0.0..=255.0), oldest frame first.
    #[must_use]
    pub fn to_f32(&self) -> Vec<f32> {
        let [d, h, w] = self.shape();
        let mut out = Vec::with_capacity(d * h * w);
        for frame in &self.frames {
            out.extend(frame.as_raw().iter().map(|&p| f32::from(p)));
        }
        out
    }
}
