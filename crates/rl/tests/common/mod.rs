#![allow(dead_code)]

use agent::{Agent, AgentConfig, StateView};
use anyhow::Result;
use frame::{FrameStack, RawFrame, ATARI_HEIGHT, ATARI_WIDTH};
use rl::{RawEnv, RawStep};
use std::fmt;

/// Deterministic pseudo-random native-resolution frame.
pub fn noise_frame(seed: u64) -> RawFrame {
    let rng = fastrand::Rng::with_seed(seed);
    let len = (ATARI_HEIGHT * ATARI_WIDTH * 3) as usize;
    let data = (0..len).map(|_| rng.u8(..)).collect();
    RawFrame::new(ATARI_HEIGHT, ATARI_WIDTH, data).unwrap()
}

#[derive(Debug, PartialEq, Eq)]
pub struct InvalidAction(pub usize);

impl fmt::Display for InvalidAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid action {}", self.0)
    }
}

impl std::error::Error for InvalidAction {}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedInfo {
    pub raw_step: usize,
}

/// Emits a fresh noise frame on every reset/step and follows a reward and
/// termination script indexed by the raw step within the episode.
pub struct ScriptedEnv {
    /// Reward of raw step `i` (1-based) is `rewards[i - 1]`, 0 past the end.
    pub rewards: Vec<f32>,
    /// Raw step (1-based) reporting `terminated`.
    pub terminate_at: Option<usize>,
    /// Raw step (1-based) reporting `truncated`.
    pub truncate_at: Option<usize>,
    pub actions: Vec<usize>,
    pub emitted: Vec<RawFrame>,
    pub resets: usize,
    pub frame_size: (u32, u32),
    raw_step: usize,
    seed: u64,
}

impl ScriptedEnv {
    pub fn new(rewards: Vec<f32>, terminate_at: Option<usize>) -> Self {
        Self {
            rewards,
            terminate_at,
            truncate_at: None,
            actions: Vec::new(),
            emitted: Vec::new(),
            resets: 0,
            frame_size: (ATARI_HEIGHT, ATARI_WIDTH),
            raw_step: 0,
            seed: 0,
        }
    }

    pub fn raw_steps(&self) -> usize {
        self.actions.len()
    }

    pub fn last_emitted(&self) -> &RawFrame {
        self.emitted.last().unwrap()
    }

    fn next_frame(&mut self) -> RawFrame {
        self.seed += 1;
        let frame = if self.frame_size == (ATARI_HEIGHT, ATARI_WIDTH) {
            noise_frame(self.seed)
        } else {
            RawFrame::filled(self.frame_size.0, self.frame_size.1, [9, 9, 9])
        };
        self.emitted.push(frame.clone());
        frame
    }
}

impl RawEnv for ScriptedEnv {
    type Info = ScriptedInfo;

    fn reset(&mut self) -> Result<(RawFrame, ScriptedInfo)> {
        self.resets += 1;
        self.raw_step = 0;
        Ok((self.next_frame(), ScriptedInfo { raw_step: 0 }))
    }

    fn step(&mut self, action: usize) -> Result<RawStep<ScriptedInfo>> {
        if action >= self.action_count() {
            return Err(InvalidAction(action).into());
        }
        self.raw_step += 1;
        self.actions.push(action);
        let reward = self.rewards.get(self.raw_step - 1).copied().unwrap_or(0.0);
        Ok(RawStep {
            observation: self.next_frame(),
            reward,
            terminated: self.terminate_at == Some(self.raw_step),
            truncated: self.truncate_at == Some(self.raw_step),
            info: ScriptedInfo { raw_step: self.raw_step },
        })
    }

    fn action_count(&self) -> usize {
        4
    }
}

/// One call received by [`RecordingAgent::step`].
#[derive(Clone, Debug)]
pub struct Call {
    pub state: Option<FrameStack>,
    pub reward: f32,
    pub terminal: bool,
    pub action: usize,
}

/// Plays a fixed action script (cycled) and records every call.
#[derive(Default)]
pub struct RecordingAgent {
    pub script: Vec<usize>,
    pub calls: Vec<Call>,
    pub initialized: Option<AgentConfig>,
    pub reject_config: bool,
}

impl RecordingAgent {
    pub fn new(script: Vec<usize>) -> Self {
        Self {
            script,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct Rejected;

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("configuration rejected")
    }
}

impl std::error::Error for Rejected {}

impl Agent for RecordingAgent {
    fn initialize(&mut self, config: &AgentConfig) -> Result<()> {
        if self.reject_config {
            return Err(Rejected.into());
        }
        self.initialized = Some(config.clone());
        Ok(())
    }

    fn step(&mut self, state: StateView<'_>, reward: f32, terminal: bool) -> Result<usize> {
        let action = if self.script.is_empty() {
            0
        } else {
            self.script[self.calls.len() % self.script.len()]
        };
        self.calls.push(Call {
            state: state.frames().cloned(),
            reward,
            terminal,
            action,
        });
        Ok(action)
    }
}
