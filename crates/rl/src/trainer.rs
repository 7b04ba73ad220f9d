//! # Training loop
//!
//! Drives episodes between an [`AtariEnv`] and an [`Agent`].
//!
//! The agent is always told about the *previous* transition: at the top of
//! each iteration it receives the current stack together with the reward and
//! terminal flag produced by the action it chose one iteration earlier, and
//! answers with the next action. When an episode ends the agent gets one last
//! call with [`StateView::Terminal`] so it can close the final transition.

use agent::{Agent, AgentConfig, StateView};
use anyhow::Result;
use tracing::{debug, info};

use crate::atari::AtariEnv;
use crate::env::RawEnv;
use crate::metrics::MetricsSink;

/// Per-episode report.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub episode: usize,
    /// Sum of clipped rewards over the episode.
    pub reward: f32,
    /// Adapter steps, i.e. actions chosen by the agent.
    pub steps: usize,
    /// Emulator frames executed.
    pub raw_steps: usize,
}

pub struct Trainer<E: RawEnv, A: Agent, M: MetricsSink> {
    env: AtariEnv<E>,
    agent: A,
    metrics: M,
}

impl<E: RawEnv, A: Agent, M: MetricsSink> Trainer<E, A, M> {
    /// Initializes `agent` with `config` and reports the hyperparameters.
    ///
    /// # Errors
    ///
    /// Whatever the agent's `initialize` returns, unchanged.
    pub fn new(
        env: AtariEnv<E>,
        mut agent: A,
        mut metrics: M,
        config: &AgentConfig,
    ) -> Result<Self> {
        agent.initialize(config)?;
        metrics.log_hparams(config);
        Ok(Self { env, agent, metrics })
    }

    /// Plays one episode to its end. There is no step cap: an environment
    /// that never terminates keeps this running.
    ///
    /// # Errors
    ///
    /// Environment and agent failures abort the episode and are returned
    /// unchanged.
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeSummary> {
        self.env.reset()?;
        let mut reward = 0.0_f32;
        let mut terminal = false;
        let mut cumulative = 0.0_f32;
        let mut steps = 0;
        let mut raw_steps = 0;

        loop {
            let state = StateView::Frames(self.env.state()?);
            let action = self.agent.step(state, reward, terminal)?;
            let step = self.env.step(action)?;
            steps += 1;
            raw_steps += step.raw_steps;
            cumulative += step.reward;
            reward = step.reward;
            terminal = step.is_terminal();

            if terminal {
                debug!(
                    episode,
                    steps,
                    terminated = step.terminated,
                    truncated = step.truncated,
                    "episode end"
                );
                self.agent.step(StateView::Terminal, reward, terminal)?;
                self.metrics.track_episode_reward(episode, cumulative);
                break;
            }
        }

        Ok(EpisodeSummary {
            episode,
            reward: cumulative,
            steps,
            raw_steps,
        })
    }

    /// Runs `episodes` episodes in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing episode.
    pub fn train(&mut self, episodes: usize) -> Result<Vec<EpisodeSummary>> {
        info!(env = %self.env.name(), episodes, "Starting training");
        let mut summaries = Vec::with_capacity(episodes);
        for episode in 0..episodes {
            let summary = self.run_episode(episode)?;
            info!(
                episode,
                reward = summary.reward,
                steps = summary.steps,
                frames = summary.raw_steps,
                "Episode complete"
            );
            summaries.push(summary);
        }
        info!("Training complete");
        Ok(summaries)
    }

    #[must_use]
    pub fn env(&self) -> &AtariEnv<E> {
        &self.env
    }

    #[must_use]
    pub fn agent(&self) -> &A {
        &self.agent
    }

    #[must_use]
    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn into_parts(self) -> (AtariEnv<E>, A, M) {
        (self.env, self.agent, self.metrics)
    }
}
