use anyhow::{bail, Result};
use tracing::{debug, info};

use crate::config::{ActionSpace, AgentConfig, Exploration};
use crate::{Agent, StateView};

/// State-blind epsilon-greedy baseline.
///
/// Keeps a running mean of the reward observed after each action and, when
/// not exploring, picks the action with the highest mean (lowest index on
/// ties). The reward passed to [`Agent::step`] is credited to the action
/// returned by the previous call.
pub struct ActionValueAgent {
    rng: fastrand::Rng,
    exploration: Exploration,
    values: Vec<f32>,
    counts: Vec<u32>,
    last_action: Option<usize>,
    steps: u64,
}

impl ActionValueAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            exploration: Exploration::Constant { value: 1.0 },
            values: Vec::new(),
            counts: Vec::new(),
            last_action: None,
            steps: 0,
        }
    }

    /// Mean reward credited to each action so far.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of actions chosen so far (terminal notifications excluded).
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn epsilon(&self) -> f32 {
        self.exploration.epsilon_at(self.steps)
    }

    fn credit(&mut self, action: usize, reward: f32) {
        self.counts[action] += 1;
        #[allow(clippy::cast_precision_loss)]
        let n = self.counts[action] as f32;
        self.values[action] += (reward - self.values[action]) / n;
    }

    fn greedy(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.values.iter().enumerate() {
            if v > self.values[best] {
                best = i;
            }
        }
        best
    }
}

impl Agent for ActionValueAgent {
    fn initialize(&mut self, config: &AgentConfig) -> Result<()> {
        config.validate()?;
        let ActionSpace::Discrete { n } = config.action_space;
        self.exploration = config.epsilon;
        self.values = vec![0.0; n];
        self.counts = vec![0; n];
        self.last_action = None;
        self.steps = 0;
        info!(actions = n, exploration = ?self.exploration, "agent initialized");
        Ok(())
    }

    fn step(&mut self, state: StateView<'_>, reward: f32, terminal: bool) -> Result<usize> {
        if self.values.is_empty() {
            bail!("agent stepped before initialize");
        }
        if let Some(previous) = self.last_action.take() {
            self.credit(previous, reward);
        }
        if terminal || state.is_terminal() {
            debug!(steps = self.steps, "episode finished");
            return Ok(0);
        }

        let epsilon = self.epsilon();
        self.steps += 1;
        let action = if self.rng.f32() < epsilon {
            self.rng.usize(..self.values.len())
        } else {
            self.greedy()
        };
        self.last_action = Some(action);
        Ok(action)
    }
}
