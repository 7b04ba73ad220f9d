#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Arcade
//!
//! A small, deterministic Breakout-style game that renders native 210×160 RGB
//! frames and implements [`rl::RawEnv`]. It stands in for an emulator so the
//! training driver can run end to end without external ROMs.
//!
//! ```rust,ignore
//! let mut env = arcade::make("ALE/Breakout-v5", 0)?;
//! let (frame, info) = env.reset()?;
//! let step = env.step(arcade::Action::Fire as usize)?;
//! ```

use thiserror::Error;

pub mod breakout;
mod render;

pub use breakout::{Action, Breakout, BreakoutConfig, BreakoutInfo};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArcadeError {
    #[error("action {action} is outside the action space of size {count}")]
    InvalidAction { action: usize, count: usize },
    #[error("unknown environment '{0}'")]
    UnknownEnvironment(String),
}

/// Environment ids accepted by [`make`].
pub const BREAKOUT_IDS: [&str; 3] = ["ALE/Breakout-v5", "Breakout-v5", "Breakout"];

/// Builds an environment from its id with default settings.
///
/// # Errors
///
/// [`ArcadeError::UnknownEnvironment`] for ids other than [`BREAKOUT_IDS`].
pub fn make(name: &str, seed: u64) -> Result<Breakout, ArcadeError> {
    make_with(
        name,
        BreakoutConfig {
            seed,
            ..BreakoutConfig::default()
        },
    )
}

/// Builds an environment from its id and explicit settings.
///
/// # Errors
///
/// [`ArcadeError::UnknownEnvironment`] for ids other than [`BREAKOUT_IDS`].
pub fn make_with(name: &str, config: BreakoutConfig) -> Result<Breakout, ArcadeError> {
    if BREAKOUT_IDS.contains(&name) {
        tracing::info!(name, seed = config.seed, "Creating environment");
        Ok(Breakout::new(config))
    } else {
        Err(ArcadeError::UnknownEnvironment(name.to_string()))
    }
}
