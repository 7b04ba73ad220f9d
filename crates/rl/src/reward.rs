use serde::{Deserialize, Serialize};

/// Per-frame reward shaping applied before rewards are summed over a
/// frame-skip window.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewardClip {
    /// Keep only the sign: `+1.0`, `-1.0` or `0.0` (also for `-0.0`).
    #[default]
    Sign,
    /// Clamp to `[min, max]`.
    Clamp { min: f32, max: f32 },
    Unclipped,
}

impl RewardClip {
    /// Shapes one raw reward. NaN is returned unchanged by every policy.
    #[must_use]
    pub fn apply(self, reward: f32) -> f32 {
        match self {
            RewardClip::Sign => {
                if reward.is_nan() {
                    reward
                } else if reward > 0.0 {
                    1.0
                } else if reward < 0.0 {
                    -1.0
                } else {
                    0.0
                }
            }
            RewardClip::Clamp { min, max } => {
                if reward.is_nan() {
                    reward
                } else {
                    reward.max(min).min(max)
                }
            }
            RewardClip::Unclipped => reward,
        }
    }
}
