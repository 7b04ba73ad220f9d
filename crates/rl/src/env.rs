use anyhow::Result;
use frame::RawFrame;
use std::fmt::Debug;

/// Outcome of a single emulator step.
#[derive(Clone, Debug)]
pub struct RawStep<I> {
    pub observation: RawFrame,
    /// Unclipped game reward.
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: I,
}

/// Pixel-based environment trait.
///
/// Modelled after the Gymnasium API: [`reset`] starts an episode and returns
/// the first rendered frame, [`step`] advances the game by exactly one frame
/// under the given discrete action. Episodes end either naturally
/// (`terminated`) or because an external limit was hit (`truncated`).
///
/// Implementations report their own failures (invalid action, crashed
/// emulator) through the returned error; callers do not validate actions.
///
/// [`reset`]: RawEnv::reset
/// [`step`]: RawEnv::step
pub trait RawEnv {
    /// Diagnostic data forwarded untouched to the caller.
    type Info: Clone + Debug + Default;

    /// Start a new episode.
    ///
    /// # Errors
    ///
    /// Any emulator failure.
    fn reset(&mut self) -> Result<(RawFrame, Self::Info)>;

    /// Advance the environment by one frame.
    ///
    /// # Errors
    ///
    /// Any emulator failure, including an action outside the action space.
    fn step(&mut self, action: usize) -> Result<RawStep<Self::Info>>;

    /// Size of the discrete action space.
    fn action_count(&self) -> usize;
}
