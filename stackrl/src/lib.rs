#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # stackrl
//!
//! Command-line driver wiring the workspace together:
//!
//! -   `frame` turns emulator screens into 84×84 grayscale frames and stacks
//!     them.
//! -   [`rl`] wraps a raw environment with preprocessing, frame skipping and
//!     reward clipping, and runs the episode loop.
//! -   [`agent`] provides the learner contract, its JSON configuration and a
//!     reference agent.
//! -   [`arcade`] provides the Breakout environment looked up by name.

pub mod app;
pub mod cli;
