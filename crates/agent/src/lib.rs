#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Agent collaborator
//!
//! The learning side of the training loop, seen only through a narrow
//! contract: [`Agent::initialize`] once with an [`AgentConfig`], then
//! [`Agent::step`] once per environment transition.

use anyhow::Result;
use frame::FrameStack;

pub mod config;
pub mod value;

pub use config::{
    ActionSpace, AgentConfig, Algorithm, ConfigError, Exploration, Layer, Loss, Optimizer,
};
pub use value::ActionValueAgent;

/// What the agent sees of the environment after a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StateView<'a> {
    /// The current frame stack. It is owned by the environment adapter and
    /// will be overwritten by the next step; clone it to keep it.
    Frames(&'a FrameStack),
    /// The episode ended; there is no successor state.
    Terminal,
}

impl<'a> StateView<'a> {
    #[must_use]
    pub fn frames(self) -> Option<&'a FrameStack> {
        match self {
            StateView::Frames(stack) => Some(stack),
            StateView::Terminal => None,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, StateView::Terminal)
    }
}

/// A learning algorithm driven one transition at a time.
pub trait Agent {
    /// Builds the agent from its configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is structurally invalid for this agent.
    fn initialize(&mut self, config: &AgentConfig) -> Result<()>;

    /// Receives the outcome of the previous action (`reward` and `terminal`
    /// belong to the transition that led to `state`) and returns the next
    /// action. The return value is ignored when `terminal` is true.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the learner.
    fn step(&mut self, state: StateView<'_>, reward: f32, terminal: bool) -> Result<usize>;
}
