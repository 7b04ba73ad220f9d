use agent::AgentConfig;
use tracing::{info, warn};

/// Receives run-level reporting from the [`Trainer`](crate::Trainer).
/// Nothing returned from a sink feeds back into training.
pub trait MetricsSink {
    /// Called once, after the agent accepted `config`.
    fn log_hparams(&mut self, _config: &AgentConfig) {}

    /// Called once per finished episode with its cumulative clipped reward.
    fn track_episode_reward(&mut self, episode: usize, reward: f32);
}

/// Emits metrics as structured `tracing` events.
#[derive(Default)]
pub struct TracingSink;

impl MetricsSink for TracingSink {
    fn log_hparams(&mut self, config: &AgentConfig) {
        match serde_json::to_string(config) {
            Ok(hparams) => info!(%hparams, "hparams"),
            Err(e) => warn!("could not serialize hparams: {e}"),
        }
    }

    fn track_episode_reward(&mut self, episode: usize, reward: f32) {
        info!(episode, reward, "Episode reward");
    }
}

/// Keeps every reported episode reward in memory.
#[derive(Default, Debug, Clone)]
pub struct EpisodeRewards {
    pub hparams: Option<AgentConfig>,
    pub rewards: Vec<(usize, f32)>,
}

impl EpisodeRewards {
    /// Mean of the last `n` episode rewards, if any were recorded.
    #[must_use]
    pub fn recent_mean(&self, n: usize) -> Option<f32> {
        let tail = &self.rewards[self.rewards.len().saturating_sub(n)..];
        if tail.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let len = tail.len() as f32;
        Some(tail.iter().map(|(_, r)| r).sum::<f32>() / len)
    }
}

impl MetricsSink for EpisodeRewards {
    fn log_hparams(&mut self, config: &AgentConfig) {
        self.hparams = Some(config.clone());
    }

    fn track_episode_reward(&mut self, episode: usize, reward: f32) {
        self.rewards.push((episode, reward));
    }
}

/// Forwards to both sinks.
impl<A: MetricsSink, B: MetricsSink> MetricsSink for (A, B) {
    fn log_hparams(&mut self, config: &AgentConfig) {
        self.0.log_hparams(config);
        self.1.log_hparams(config);
    }

    fn track_episode_reward(&mut self, episode: usize, reward: f32) {
        self.0.track_episode_reward(episode, reward);
        self.1.track_episode_reward(episode, reward);
    }
}
