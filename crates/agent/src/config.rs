//! # Agent configuration
//!
//! Declarative hyperparameters handed to an [`Agent`](crate::Agent) once, at
//! initialization. The JSON layout uses a `type` tag for every polymorphic
//! section (action space, exploration schedule, optimizer, layers), so an
//! unknown tag or a missing field is rejected while deserializing.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("{field} = {value} is outside [0, 1]")]
    OutOfUnitRange { field: &'static str, value: f32 },
    #[error("the action space has no actions")]
    EmptyActionSpace,
    #[error("the network has no layers")]
    EmptyNetwork,
    #[error("layer {index}: {reason}")]
    ShapeMismatch { index: usize, reason: String },
    #[error("network produces {produced} outputs but the action space has {actions} actions")]
    OutputSize { produced: usize, actions: usize },
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Dqn,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpace {
    Discrete { n: usize },
}

impl ActionSpace {
    #[must_use]
    pub fn len(&self) -> usize {
        match *self {
            ActionSpace::Discrete { n } => n,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Exploration rate schedule.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Exploration {
    /// Linear interpolation from `start` to `end` over `steps_to_end` steps,
    /// then held at `end`.
    LinDecrease {
        start: f32,
        end: f32,
        steps_to_end: u64,
    },
    Constant { value: f32 },
}

impl Exploration {
    /// Exploration rate after `step` agent steps.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn epsilon_at(&self, step: u64) -> f32 {
        match *self {
            Exploration::LinDecrease { start, end, steps_to_end } => {
                if step >= steps_to_end {
                    return end;
                }
                let progress = step as f64 / steps_to_end as f64;
                (f64::from(start) + (f64::from(end) - f64::from(start)) * progress) as f32
            }
            Exploration::Constant { value } => value,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    SmoothL1Loss,
    MseLoss,
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Optimizer {
    #[serde(rename = "adamw")]
    AdamW {
        lr: f32,
        #[serde(default)]
        amsgrad: bool,
    },
    Adam { lr: f32 },
    Sgd {
        lr: f32,
        #[serde(default)]
        momentum: f32,
    },
}

impl Optimizer {
    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        match *self {
            Optimizer::AdamW { lr, .. } | Optimizer::Adam { lr } | Optimizer::Sgd { lr, .. } => lr,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Conv2d {
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        stride: usize,
    },
    Relu,
    Tanh,
    Sigmoid,
    Flatten,
    Linear {
        in_features: usize,
        out_features: usize,
    },
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct AgentConfig {
    #[serde(rename = "type")]
    pub algorithm: Algorithm,
    pub action_space: ActionSpace,
    pub gamma: f32,
    pub tau: f32,
    pub epsilon: Exploration,
    pub batch_size: usize,
    pub grad_clip_value: f32,
    pub loss: Loss,
    pub optimizer: Optimizer,
    pub replay_buffer_size: usize,
    pub network: Vec<Layer>,
}

impl AgentConfig {
    /// Parses a JSON configuration.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, unknown `type` tags and missing fields.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or does not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {e}", path.display()))?;
        Self::from_str(&json)
    }

    /// DQN for an 84×84 frame stack of depth `stacked_frames`: two
    /// convolutions, a 256-unit hidden layer and one output per action.
    #[must_use]
    pub fn breakout_dqn(stacked_frames: usize, actions: usize) -> Self {
        Self {
            algorithm: Algorithm::Dqn,
            action_space: ActionSpace::Discrete { n: actions },
            gamma: 0.99,
            tau: 0.005,
            epsilon: Exploration::LinDecrease {
                start: 1.0,
                end: 0.1,
                steps_to_end: 1_000_000,
            },
            batch_size: 32,
            grad_clip_value: 100.0,
            loss: Loss::SmoothL1Loss,
            optimizer: Optimizer::AdamW { lr: 1e-4, amsgrad: true },
            replay_buffer_size: 1_000_000,
            network: vec![
                Layer::Conv2d {
                    in_channels: stacked_frames,
                    out_channels: 16,
                    kernel_size: 8,
                    stride: 4,
                },
                Layer::Relu,
                Layer::Conv2d {
                    in_channels: 16,
                    out_channels: 32,
                    kernel_size: 4,
                    stride: 1,
                },
                Layer::Relu,
                Layer::Flatten,
                Layer::Linear {
                    in_features: 32 * 17 * 17,
                    out_features: 256,
                },
                Layer::Relu,
                Layer::Linear {
                    in_features: 256,
                    out_features: actions,
                },
            ],
        }
    }

    /// Checks internal consistency without knowing the observation size:
    /// positive sizes, rates in range, channel and feature chaining, and an
    /// output layer matching the action space.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.action_space.is_empty() {
            return Err(ConfigError::EmptyActionSpace);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::NotPositive { field: "batch_size" });
        }
        if self.replay_buffer_size == 0 {
            return Err(ConfigError::NotPositive { field: "replay_buffer_size" });
        }
        if self.optimizer.learning_rate() <= 0.0 {
            return Err(ConfigError::NotPositive { field: "optimizer.lr" });
        }
        for (field, value) in [("gamma", self.gamma), ("tau", self.tau)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfUnitRange { field, value });
            }
        }
        if let Exploration::LinDecrease { start, end, .. } = self.epsilon {
            for (field, value) in [("epsilon.start", start), ("epsilon.end", end)] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::OutOfUnitRange { field, value });
                }
            }
        }

        let mut channels: Option<usize> = None;
        let mut features: Option<usize> = None;
        let mut flattened = false;
        let mut last_out = None;
        for (index, layer) in self.network.iter().enumerate() {
            match *layer {
                Layer::Conv2d {
                    in_channels,
                    out_channels,
                    kernel_size,
                    stride,
                } => {
                    if kernel_size == 0 || stride == 0 || out_channels == 0 {
                        return Err(mismatch(
                            index,
                            "kernel_size, stride and out_channels must be positive",
                        ));
                    }
                    if flattened || features.is_some() {
                        return Err(mismatch(index, "convolution after a flat layer"));
                    }
                    if let Some(c) = channels {
                        if c != in_channels {
                            return Err(mismatch(
                                index,
                                format!("expects {in_channels} channels, previous layer gives {c}"),
                            ));
                        }
                    }
                    channels = Some(out_channels);
                }
                Layer::Flatten => flattened = true,
                Layer::Linear {
                    in_features,
                    out_features,
                } => {
                    if in_features == 0 || out_features == 0 {
                        return Err(mismatch(
                            index,
                            "in_features and out_features must be positive",
                        ));
                    }
                    if let Some(f) = features {
                        if f != in_features {
                            return Err(mismatch(
                                index,
                                format!("expects {in_features} features, previous layer gives {f}"),
                            ));
                        }
                    }
                    features = Some(out_features);
                    last_out = Some(out_features);
                }
                Layer::Relu | Layer::Tanh | Layer::Sigmoid => {}
            }
        }

        match last_out {
            None if self.network.is_empty() => Err(ConfigError::EmptyNetwork),
            None => Err(mismatch(
                self.network.len() - 1,
                "the network has no linear output layer",
            )),
            Some(produced) if produced != self.action_space.len() => {
                Err(ConfigError::OutputSize {
                    produced,
                    actions: self.action_space.len(),
                })
            }
            Some(_) => Ok(()),
        }
    }

    /// Propagates an observation of shape `[channels, height, width]` through
    /// the network and returns the output shape.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ShapeMismatch`] at the first layer whose declared
    /// input does not match what the previous layer produces.
    pub fn infer_output_shape(&self, input: [usize; 3]) -> Result<Vec<usize>, ConfigError> {
        let mut shape = input.to_vec();
        for (index, layer) in self.network.iter().enumerate() {
            shape = match *layer {
                Layer::Conv2d {
                    in_channels,
                    out_channels,
                    kernel_size,
                    stride,
                } => {
                    let &[c, h, w] = shape.as_slice() else {
                        let reason = format!("convolution needs a 3-d input, got {shape:?}");
                        return Err(mismatch(index, reason));
                    };
                    if c != in_channels {
                        let reason = format!("expects {in_channels} channels, got {c}");
                        return Err(mismatch(index, reason));
                    }
                    if stride == 0 || kernel_size > h || kernel_size > w {
                        let reason = format!("kernel {kernel_size} does not fit {h}x{w}");
                        return Err(mismatch(index, reason));
                    }
                    vec![
                        out_channels,
                        (h - kernel_size) / stride + 1,
                        (w - kernel_size) / stride + 1,
                    ]
                }
                Layer::Flatten => vec![shape.iter().product()],
                Layer::Linear {
                    in_features,
                    out_features,
                } => {
                    let &[f] = shape.as_slice() else {
                        let reason = format!("linear needs a flat input, got {shape:?}");
                        return Err(mismatch(index, reason));
                    };
                    if f != in_features {
                        let reason = format!("expects {in_features} features, got {f}");
                        return Err(mismatch(index, reason));
                    }
                    vec![out_features]
                }
                Layer::Relu | Layer::Tanh | Layer::Sigmoid => shape,
            };
        }
        Ok(shape)
    }
}

fn mismatch(index: usize, reason: impl Into<String>) -> ConfigError {
    ConfigError::ShapeMismatch { index, reason: reason.into() }
}
