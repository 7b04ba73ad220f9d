//! # Application
//!
//! Builds the environment, adapter, agent and metrics sinks from [`Args`] and
//! runs the training loop.

use agent::{ActionValueAgent, AgentConfig};
use anyhow::{Context, Result};
use arcade::BreakoutConfig;
use rl::{AdapterConfig, AtariEnv, EpisodeRewards, EpisodeSummary, TracingSink, Trainer};
use tracing::info;

use crate::cli::Args;

/// Episodes averaged in the closing summary.
const SUMMARY_WINDOW: usize = 10;

/// Installs the log subscriber and trains as configured.
///
/// # Errors
///
/// Returns configuration, environment and agent errors unchanged.
pub fn run(args: &Args) -> Result<()> {
    tracing_subscriber::fmt::init();

    let (summaries, rewards) = train(args)?;
    let total_frames: usize = summaries.iter().map(|s| s.raw_steps).sum();
    let episodes = summaries.len();
    match rewards.recent_mean(SUMMARY_WINDOW) {
        Some(mean) => info!(episodes, total_frames, recent_mean = mean, "Complete"),
        None => info!(episodes, total_frames, "Complete"),
    }
    Ok(())
}

/// Runs `args.episodes` episodes and returns their summaries along with the
/// in-memory reward log.
///
/// # Errors
///
/// Fails on an unknown environment id, an unreadable or invalid agent
/// configuration, or any error raised while playing.
pub fn train(args: &Args) -> Result<(Vec<EpisodeSummary>, EpisodeRewards)> {
    let mut breakout = BreakoutConfig {
        seed: args.seed,
        ..BreakoutConfig::default()
    };
    if let Some(frames) = args.max_episode_frames {
        breakout.max_episode_frames = Some(frames);
    }
    let raw = arcade::make_with(&args.env, breakout)?;

    let adapter = AdapterConfig::new(args.env.clone(), args.stacked_frames, args.frames_clipped)
        .with_reward_clip(args.reward_clip());
    let env = AtariEnv::new(raw, adapter)?;

    let config = match &args.agent_config {
        Some(path) => AgentConfig::from_path(path)
            .with_context(|| format!("loading agent configuration {}", path.display()))?,
        None => AgentConfig::breakout_dqn(args.stacked_frames, env.action_count()),
    };

    let agent = ActionValueAgent::new(args.seed);
    let metrics = (TracingSink, EpisodeRewards::default());
    let mut trainer = Trainer::new(env, agent, metrics, &config)?;
    let summaries = trainer.train(args.episodes)?;

    let (_, _, (_, rewards)) = trainer.into_parts();
    Ok((summaries, rewards))
}
