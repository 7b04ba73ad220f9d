//! # Arcade environment adapter
//!
//! [`AtariEnv`] wraps a pixel environment and presents it the way value-based
//! agents usually consume arcade games:
//!
//! -   every observation is preprocessed to an 84×84 luminance frame,
//! -   the last `stacked_frames` observations are stacked, oldest first,
//! -   each agent action is repeated for `frames_clipped` emulator frames,
//!     stopping early as soon as the episode ends,
//! -   rewards are clipped per frame and summed over the repeat.

use anyhow::Result;
use frame::{FrameStack, Preprocessor};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::env::RawEnv;
use crate::reward::RewardClip;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterError {
    #[error("stacked_frames must be at least 1")]
    ZeroStackDepth,
    #[error("frames_clipped must be at least 1")]
    ZeroFrameSkip,
    #[error("step called before reset")]
    NotReset,
}

fn default_stacked_frames() -> usize {
    4
}

fn default_frames_clipped() -> usize {
    4
}

/// Construction parameters of [`AtariEnv`].
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AdapterConfig {
    /// Environment identifier, for logs.
    pub name: String,
    /// Depth of the frame stack.
    #[serde(default = "default_stacked_frames")]
    pub stacked_frames: usize,
    /// Emulator frames executed per [`AtariEnv::step`].
    #[serde(default = "default_frames_clipped")]
    pub frames_clipped: usize,
    #[serde(default)]
    pub reward_clip: RewardClip,
}

impl AdapterConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, stacked_frames: usize, frames_clipped: usize) -> Self {
        Self {
            name: name.into(),
            stacked_frames,
            frames_clipped,
            reward_clip: RewardClip::Sign,
        }
    }

    #[must_use]
    pub fn with_reward_clip(mut self, reward_clip: RewardClip) -> Self {
        self.reward_clip = reward_clip;
        self
    }
}

/// Result of one adapter step.
#[derive(Debug)]
pub struct AdapterStep<'a, I> {
    /// The updated stack. Borrowed from the adapter; clone to keep it past the
    /// next step.
    pub state: &'a FrameStack,
    /// Sum of the clipped rewards of every emulator frame executed.
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    /// Info of the last emulator frame executed.
    pub info: I,
    /// Emulator frames executed, between 1 and `frames_clipped`.
    pub raw_steps: usize,
}

impl<I> AdapterStep<'_, I> {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Frame-stacking, frame-skipping, reward-clipping wrapper around a
/// [`RawEnv`].
pub struct AtariEnv<E: RawEnv> {
    env: E,
    config: AdapterConfig,
    preprocessor: Preprocessor,
    stack: Option<FrameStack>,
}

impl<E: RawEnv> AtariEnv<E> {
    /// Wraps `env`.
    ///
    /// # Errors
    ///
    /// Rejects a zero stack depth or a zero frame skip.
    pub fn new(env: E, config: AdapterConfig) -> Result<Self, AdapterError> {
        if config.stacked_frames == 0 {
            return Err(AdapterError::ZeroStackDepth);
        }
        if config.frames_clipped == 0 {
            return Err(AdapterError::ZeroFrameSkip);
        }
        Ok(Self {
            env,
            config,
            preprocessor: Preprocessor::default(),
            stack: None,
        })
    }

    /// Replaces the default 210×160 → 84×84 pipeline.
    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Starts a new episode. The stack is filled with copies of the first
    /// preprocessed frame.
    ///
    /// # Errors
    ///
    /// Propagates emulator failures unchanged, and preprocessing failures when
    /// the emulator renders at an unexpected resolution.
    pub fn reset(&mut self) -> Result<(&FrameStack, E::Info)> {
        let (raw, info) = self.env.reset()?;
        let first = self.preprocessor.apply(&raw)?;
        let stack = FrameStack::filled(&first, self.config.stacked_frames)?;
        debug!(env = %self.config.name, depth = stack.depth(), "reset");
        let stack: &FrameStack = self.stack.insert(stack);
        Ok((stack, info))
    }

    /// Repeats `action` for up to `frames_clipped` emulator frames and pushes
    /// the last observed frame onto the stack.
    ///
    /// # Errors
    ///
    /// [`AdapterError::NotReset`] before the first [`AtariEnv::reset`];
    /// otherwise emulator and preprocessing failures, unchanged.
    pub fn step(&mut self, action: usize) -> Result<AdapterStep<'_, E::Info>> {
        if self.stack.is_none() {
            return Err(AdapterError::NotReset.into());
        }

        let mut total_reward = 0.0;
        let mut raw_steps = 0;
        let mut last = self.env.step(action)?;
        loop {
            raw_steps += 1;
            total_reward += self.config.reward_clip.apply(last.reward);
            if last.terminated || last.truncated {
                if raw_steps < self.config.frames_clipped {
                    debug!(
                        env = %self.config.name,
                        raw_steps,
                        terminated = last.terminated,
                        truncated = last.truncated,
                        "episode ended inside the frame-skip window"
                    );
                }
                break;
            }
            if raw_steps == self.config.frames_clipped {
                break;
            }
            last = self.env.step(action)?;
        }

        let newest = self.preprocessor.apply(&last.observation)?;
        let stack = self.stack.as_mut().ok_or(AdapterError::NotReset)?;
        stack.push(newest);

        Ok(AdapterStep {
            state: stack,
            reward: total_reward,
            terminated: last.terminated,
            truncated: last.truncated,
            info: last.info,
            raw_steps,
        })
    }

    /// The current stack.
    ///
    /// # Errors
    ///
    /// [`AdapterError::NotReset`] before the first reset.
    pub fn state(&self) -> Result<&FrameStack, AdapterError> {
        self.stack.as_ref().ok_or(AdapterError::NotReset)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn stacked_frames(&self) -> usize {
        self.config.stacked_frames
    }

    #[must_use]
    pub fn frames_clipped(&self) -> usize {
        self.config.frames_clipped
    }

    #[must_use]
    pub fn reward_clip(&self) -> RewardClip {
        self.config.reward_clip
    }

    #[must_use]
    pub fn action_count(&self) -> usize {
        self.env.action_count()
    }

    /// The wrapped environment.
    #[must_use]
    pub fn inner(&self) -> &E {
        &self.env
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[must_use]
    pub fn into_inner(self) -> E {
        self.env
    }
}
