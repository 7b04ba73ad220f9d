mod common;

use common::{InvalidAction, ScriptedEnv, ScriptedInfo};
use frame::{preprocess_state, FrameError};
use rl::{AdapterConfig, AdapterError, AtariEnv, RewardClip};

fn adapter(env: ScriptedEnv, k: usize, f: usize) -> AtariEnv<ScriptedEnv> {
    AtariEnv::new(env, AdapterConfig::new("scripted", k, f)).unwrap()
}

#[test]
fn reset_fills_the_stack_with_the_first_frame() {
    let mut env = adapter(ScriptedEnv::new(vec![], None), 4, 4);
    let (state, info) = env.reset().unwrap();
    let state = state.clone();
    assert_eq!(info, ScriptedInfo { raw_step: 0 });

    let expected = preprocess_state(env.inner().last_emitted()).unwrap();
    assert_eq!(state.len(), 4);
    assert!(state.frames().all(|f| *f == expected));
}

#[test]
fn step_shifts_and_appends_the_last_raw_frame() {
    let mut env = adapter(ScriptedEnv::new(vec![], None), 4, 3);
    env.reset().unwrap();
    env.step(1).unwrap();
    let before = env.state().unwrap().clone();

    let step = env.step(2).unwrap();
    assert_eq!(step.raw_steps, 3);
    let after = step.state.clone();

    assert_eq!(after.len(), 4);
    for i in 0..3 {
        assert_eq!(after.get(i), before.get(i + 1));
    }
    let expected = preprocess_state(env.inner().last_emitted()).unwrap();
    assert_eq!(after.newest(), &expected);
    // One reset frame plus 3 raw frames per step.
    assert_eq!(env.inner().emitted.len(), 1 + 3 + 3);
    assert_eq!(env.inner().actions, vec![1, 1, 1, 2, 2, 2]);
}

#[test]
fn intermediate_frames_are_not_stacked() {
    let mut env = adapter(ScriptedEnv::new(vec![], None), 2, 4);
    env.reset().unwrap();
    let step = env.step(0).unwrap();
    let state = step.state.clone();
    let emitted = &env.inner().emitted;
    let reset_frame = preprocess_state(&emitted[0]).unwrap();
    let last_frame = preprocess_state(&emitted[4]).unwrap();
    assert_eq!(state.oldest(), &reset_frame);
    assert_eq!(state.newest(), &last_frame);
}

#[test]
fn sign_clipping_of_each_raw_reward() {
    let raw = [5.0, -3.0, 0.0, 0.3, -0.1];
    let clipped: Vec<f32> = raw.iter().map(|&r| RewardClip::Sign.apply(r)).collect();
    assert_eq!(clipped, vec![1.0, -1.0, 0.0, 1.0, -1.0]);
}

#[test]
fn negative_zero_clips_to_positive_zero() {
    let clipped = RewardClip::Sign.apply(-0.0);
    assert_eq!(clipped, 0.0);
    assert!(clipped.is_sign_positive());
}

#[test]
fn clipped_rewards_are_summed_over_the_repeat() {
    let mut env = adapter(ScriptedEnv::new(vec![5.0, -3.0, 0.0, 0.3, -0.1], None), 4, 5);
    env.reset().unwrap();
    let step = env.step(0).unwrap();
    assert_eq!(step.raw_steps, 5);
    assert_eq!(step.reward, 1.0 - 1.0 + 0.0 + 1.0 - 1.0);
    assert!(!step.terminated && !step.truncated);
}

#[test]
fn other_clip_policies() {
    assert_eq!(RewardClip::Unclipped.apply(5.0), 5.0);
    let clamp = RewardClip::Clamp { min: -2.0, max: 2.0 };
    assert_eq!(clamp.apply(5.0), 2.0);
    assert_eq!(clamp.apply(-0.5), -0.5);
    assert!(RewardClip::Sign.apply(f32::NAN).is_nan());
    assert!(RewardClip::Clamp { min: -1.0, max: 1.0 }.apply(f32::NAN).is_nan());

    let mut env = AtariEnv::new(
        ScriptedEnv::new(vec![5.0, -3.0], None),
        AdapterConfig::new("scripted", 4, 2).with_reward_clip(RewardClip::Unclipped),
    )
    .unwrap();
    env.reset().unwrap();
    assert_eq!(env.step(0).unwrap().reward, 2.0);
}

#[test]
fn termination_short_circuits_the_repeat() {
    // Terminates on raw repeat index 1 (the second raw step) with F = 4.
    let mut env = adapter(ScriptedEnv::new(vec![1.0, 1.0, 1.0, 1.0], Some(2)), 4, 4);
    env.reset().unwrap();
    let step = env.step(3).unwrap();

    assert!(step.terminated);
    assert!(!step.truncated);
    assert_eq!(step.raw_steps, 2);
    assert_eq!(step.reward, 2.0);
    assert_eq!(step.info, ScriptedInfo { raw_step: 2 });
    let newest = step.state.newest().clone();

    assert_eq!(env.inner().raw_steps(), 2);
    let expected = preprocess_state(env.inner().last_emitted()).unwrap();
    assert_eq!(newest, expected);
}

#[test]
fn truncation_short_circuits_too() {
    let mut scripted = ScriptedEnv::new(vec![], None);
    scripted.truncate_at = Some(1);
    let mut env = adapter(scripted, 4, 4);
    env.reset().unwrap();
    let step = env.step(0).unwrap();
    assert!(step.truncated);
    assert!(step.is_terminal());
    assert_eq!(step.raw_steps, 1);
}

#[test]
fn raw_environment_errors_propagate_unchanged() {
    let mut env = adapter(ScriptedEnv::new(vec![], None), 4, 4);
    env.reset().unwrap();
    let err = env.step(9).unwrap_err();
    assert_eq!(err.downcast_ref::<InvalidAction>(), Some(&InvalidAction(9)));
}

#[test]
fn step_before_reset_is_an_error() {
    let mut env = adapter(ScriptedEnv::new(vec![], None), 4, 4);
    let err = env.step(0).unwrap_err();
    assert_eq!(err.downcast_ref::<AdapterError>(), Some(&AdapterError::NotReset));
    assert_eq!(env.inner().raw_steps(), 0);
    assert_eq!(env.state().unwrap_err(), AdapterError::NotReset);
}

#[test]
fn zero_sizes_are_rejected() {
    let err = AtariEnv::new(ScriptedEnv::new(vec![], None), AdapterConfig::new("x", 0, 4))
        .err()
        .unwrap();
    assert_eq!(err, AdapterError::ZeroStackDepth);
    let err = AtariEnv::new(ScriptedEnv::new(vec![], None), AdapterConfig::new("x", 4, 0))
        .err()
        .unwrap();
    assert_eq!(err, AdapterError::ZeroFrameSkip);
}

#[test]
fn unexpected_resolution_fails_preprocessing() {
    let mut scripted = ScriptedEnv::new(vec![], None);
    scripted.frame_size = (250, 160);
    let mut env = adapter(scripted, 4, 4);
    let err = env.reset().unwrap_err();
    assert!(matches!(
        err.downcast_ref::<FrameError>(),
        Some(FrameError::ShapeMismatch { .. })
    ));
}

#[test]
fn config_deserializes_with_defaults() {
    let config: AdapterConfig = serde_json::from_str(r#"{"name": "ALE/Breakout-v5"}"#).unwrap();
    assert_eq!(config, AdapterConfig::new("ALE/Breakout-v5", 4, 4));
    let config: AdapterConfig = serde_json::from_str(
        r#"{"name": "b", "reward_clip": {"type": "clamp", "min": -1.0, "max": 1.0}}"#,
    )
    .unwrap();
    assert_eq!(config.reward_clip, RewardClip::Clamp { min: -1.0, max: 1.0 });
}
