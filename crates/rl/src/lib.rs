#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # RL driver
//!
//! Everything between a pixel environment and a learner:
//!
//! -   [`RawEnv`]: the emulator contract (Gymnasium-style `reset`/`step`).
//! -   [`AtariEnv`]: preprocessing, frame stacking, frame skipping and reward
//!     clipping on top of a [`RawEnv`].
//! -   [`Trainer`]: the episode loop feeding transitions to an
//!     [`agent::Agent`].
//! -   [`MetricsSink`]: where per-episode rewards are reported.

pub mod atari;
pub mod env;
pub mod metrics;
pub mod reward;
pub mod trainer;

pub use atari::{AdapterConfig, AdapterError, AdapterStep, AtariEnv};
pub use env::{RawEnv, RawStep};
pub use metrics::{EpisodeRewards, MetricsSink, TracingSink};
pub use reward::RewardClip;
pub use trainer::{EpisodeSummary, Trainer};
