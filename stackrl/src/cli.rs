use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rl::RewardClip;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "stackrl", about = "Frame-stacking DQN driver for arcade environments")]
pub struct Args {
    /// Environment id.
    #[arg(long, default_value = "ALE/Breakout-v5")]
    pub env: String,
    #[arg(long, default_value_t = 50)]
    pub episodes: usize,
    /// Frames per observation stack.
    #[arg(long, default_value_t = 4)]
    pub stacked_frames: usize,
    /// Emulator frames each chosen action is repeated for.
    #[arg(long, default_value_t = 4)]
    pub frames_clipped: usize,
    #[arg(long, value_enum, default_value_t = ClipMode::Sign)]
    pub reward_clip: ClipMode,
    /// Symmetric bound used by `--reward-clip clamp`.
    #[arg(long, default_value_t = 1.0)]
    pub clamp_bound: f32,
    /// Agent configuration JSON. Defaults to the built-in Breakout DQN.
    #[arg(long)]
    pub agent_config: Option<PathBuf>,
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Per-episode emulator frame budget before truncation.
    #[arg(long)]
    pub max_episode_frames: Option<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    Sign,
    Clamp,
    Unclipped,
}

impl Args {
    #[must_use]
    pub fn reward_clip(&self) -> RewardClip {
        match self.reward_clip {
            ClipMode::Sign => RewardClip::Sign,
            ClipMode::Clamp => RewardClip::Clamp {
                min: -self.clamp_bound,
                max: self.clamp_bound,
            },
            ClipMode::Unclipped => RewardClip::Unclipped,
        }
    }
}
