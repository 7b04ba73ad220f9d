//! # Breakout
//!
//! Integer-pixel game logic. One call to [`RawEnv::step`] advances exactly one
//! frame. The wall has six rows of eighteen bricks worth 7, 7, 4, 4, 1, 1
//! points from top to bottom. The ball must be served with FIRE; missing it
//! costs a life and the episode terminates when no lives remain.

use anyhow::Result;
use frame::RawFrame;
use rl::{RawEnv, RawStep};
use tracing::debug;

use crate::render;
use crate::ArcadeError;

pub(crate) const FIELD_LEFT: i32 = 8;
pub(crate) const FIELD_RIGHT: i32 = 152;
pub(crate) const FIELD_TOP: i32 = 25;
pub(crate) const FIELD_BOTTOM: i32 = 196;

pub(crate) const BRICK_ROWS: usize = 6;
pub(crate) const BRICK_COLS: usize = 18;
pub(crate) const BRICK_TOP: i32 = 57;
pub(crate) const BRICK_WIDTH: i32 = 8;
pub(crate) const BRICK_HEIGHT: i32 = 6;
const ROW_POINTS: [u32; BRICK_ROWS] = [7, 7, 4, 4, 1, 1];

pub(crate) const PADDLE_Y: i32 = 189;
pub(crate) const PADDLE_WIDTH: i32 = 16;
pub(crate) const PADDLE_HEIGHT: i32 = 4;
const PADDLE_SPEED: i32 = 3;

pub(crate) const BALL_SIZE: i32 = 2;
const BALL_SPEED_Y: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Action {
    Noop = 0,
    Fire = 1,
    Right = 2,
    Left = 3,
}

impl Action {
    pub const COUNT: usize = 4;
}

impl TryFrom<usize> for Action {
    type Error = ArcadeError;

    fn try_from(action: usize) -> Result<Self, Self::Error> {
        match action {
            0 => Ok(Action::Noop),
            1 => Ok(Action::Fire),
            2 => Ok(Action::Right),
            3 => Ok(Action::Left),
            _ => Err(ArcadeError::InvalidAction {
                action,
                count: Action::COUNT,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreakoutConfig {
    pub seed: u64,
    pub lives: u32,
    /// Episode frame budget; reaching it reports `truncated`.
    pub max_episode_frames: Option<u64>,
    /// Probability of repeating the previous action instead of the requested one.
    pub sticky_action_probability: f32,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            lives: 5,
            max_episode_frames: Some(108_000),
            sticky_action_probability: 0.25,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BreakoutInfo {
    pub lives: u32,
    pub episode_frame_number: u64,
    /// Frames since the environment was created, across episodes.
    pub frame_number: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ball {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
}

pub struct Breakout {
    config: BreakoutConfig,
    rng: fastrand::Rng,
    pub(crate) bricks: [[bool; BRICK_COLS]; BRICK_ROWS],
    pub(crate) paddle_x: i32,
    pub(crate) ball: Option<Ball>,
    pub(crate) lives: u32,
    score: u32,
    last_action: Action,
    episode_frame_number: u64,
    frame_number: u64,
}

impl Breakout {
    #[must_use]
    pub fn new(config: BreakoutConfig) -> Self {
        let mut env = Self {
            config,
            rng: fastrand::Rng::with_seed(config.seed),
            bricks: [[true; BRICK_COLS]; BRICK_ROWS],
            paddle_x: 0,
            ball: None,
            lives: config.lives,
            score: 0,
            last_action: Action::Noop,
            episode_frame_number: 0,
            frame_number: 0,
        };
        env.restart();
        env
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn bricks_left(&self) -> usize {
        self.bricks.iter().flatten().filter(|&&b| b).count()
    }

    #[must_use]
    pub fn ball_in_play(&self) -> bool {
        self.ball.is_some()
    }

    #[must_use]
    pub fn paddle_x(&self) -> i32 {
        self.paddle_x
    }

    fn restart(&mut self) {
        self.bricks = [[true; BRICK_COLS]; BRICK_ROWS];
        self.paddle_x = (FIELD_LEFT + FIELD_RIGHT - PADDLE_WIDTH) / 2;
        self.ball = None;
        self.lives = self.config.lives;
        self.score = 0;
        self.last_action = Action::Noop;
        self.episode_frame_number = 0;
    }

    fn info(&self) -> BreakoutInfo {
        BreakoutInfo {
            lives: self.lives,
            episode_frame_number: self.episode_frame_number,
            frame_number: self.frame_number,
        }
    }

    fn serve(&mut self) {
        let x = self.rng.i32(FIELD_LEFT + 16..FIELD_RIGHT - 16);
        let vx = if self.rng.bool() { 1 } else { -1 };
        self.ball = Some(Ball {
            x,
            y: BRICK_TOP + BRICK_HEIGHT * 6 + 10,
            vx,
            vy: BALL_SPEED_Y,
        });
    }

    /// Moves the ball one frame and resolves collisions; returns points scored.
    fn advance_ball(&mut self) -> u32 {
        let Some(mut ball) = self.ball else {
            return 0;
        };
        let mut points = 0;

        ball.x += ball.vx;
        ball.y += ball.vy;

        if ball.x < FIELD_LEFT {
            ball.x = FIELD_LEFT;
            ball.vx = -ball.vx;
        } else if ball.x + BALL_SIZE > FIELD_RIGHT {
            ball.x = FIELD_RIGHT - BALL_SIZE;
            ball.vx = -ball.vx;
        }
        if ball.y < FIELD_TOP {
            ball.y = FIELD_TOP;
            ball.vy = -ball.vy;
        }

        if let Some((row, col)) = brick_at(ball.x + BALL_SIZE / 2, ball.y + BALL_SIZE / 2) {
            if self.bricks[row][col] {
                self.bricks[row][col] = false;
                points += ROW_POINTS[row];
                ball.vy = -ball.vy;
            }
        }

        let over_paddle =
            ball.x + BALL_SIZE > self.paddle_x && ball.x < self.paddle_x + PADDLE_WIDTH;
        let at_paddle = ball.y + BALL_SIZE >= PADDLE_Y && ball.y < PADDLE_Y + PADDLE_HEIGHT;
        if ball.vy > 0 && over_paddle && at_paddle {
            ball.y = PADDLE_Y - BALL_SIZE;
            ball.vy = -ball.vy;
            let offset = ball.x + BALL_SIZE / 2 - (self.paddle_x + PADDLE_WIDTH / 2);
            ball.vx = match offset {
                i32::MIN..=-5 => -2,
                -4..=-1 => -1,
                0..=3 => 1,
                _ => 2,
            };
        }

        if ball.y >= FIELD_BOTTOM {
            self.ball = None;
            self.lives = self.lives.saturating_sub(1);
            debug!(lives = self.lives, "ball lost");
        } else {
            self.ball = Some(ball);
        }

        if self.bricks_left() == 0 {
            self.bricks = [[true; BRICK_COLS]; BRICK_ROWS];
        }
        points
    }

    fn render(&self) -> RawFrame {
        render::draw(self)
    }
}

fn brick_at(x: i32, y: i32) -> Option<(usize, usize)> {
    if x < FIELD_LEFT || x >= FIELD_RIGHT || y < BRICK_TOP {
        return None;
    }
    let row = usize::try_from((y - BRICK_TOP) / BRICK_HEIGHT).ok()?;
    let col = usize::try_from((x - FIELD_LEFT) / BRICK_WIDTH).ok()?;
    (row < BRICK_ROWS && col < BRICK_COLS).then_some((row, col))
}

impl RawEnv for Breakout {
    type Info = BreakoutInfo;

    fn reset(&mut self) -> Result<(RawFrame, BreakoutInfo)> {
        self.restart();
        Ok((self.render(), self.info()))
    }

    fn step(&mut self, action: usize) -> Result<RawStep<BreakoutInfo>> {
        let mut action = Action::try_from(action)?;
        if self.rng.f32() < self.config.sticky_action_probability {
            action = self.last_action;
        }
        self.last_action = action;
        self.episode_frame_number += 1;
        self.frame_number += 1;

        match action {
            Action::Noop => {}
            Action::Fire => {
                if self.ball.is_none() && self.lives > 0 {
                    self.serve();
                }
            }
            Action::Right => {
                self.paddle_x = (self.paddle_x + PADDLE_SPEED).min(FIELD_RIGHT - PADDLE_WIDTH);
            }
            Action::Left => {
                self.paddle_x = (self.paddle_x - PADDLE_SPEED).max(FIELD_LEFT);
            }
        }

        let points = self.advance_ball();
        self.score += points;

        let terminated = self.lives == 0;
        let truncated = !terminated
            && self
                .config
                .max_episode_frames
                .is_some_and(|max| self.episode_frame_number >= max);

        #[allow(clippy::cast_precision_loss)]
        let reward = points as f32;
        Ok(RawStep {
            observation: self.render(),
            reward,
            terminated,
            truncated,
            info: self.info(),
        })
    }

    fn action_count(&self) -> usize {
        Action::COUNT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Breakout {
        Breakout::new(BreakoutConfig {
            sticky_action_probability: 0.0,
            ..BreakoutConfig::default()
        })
    }

    #[test]
    fn missed_ball_costs_a_life() {
        let mut env = game();
        env.paddle_x = FIELD_RIGHT - PADDLE_WIDTH;
        env.ball = Some(Ball { x: FIELD_LEFT + 4, y: FIELD_BOTTOM - 2, vx: 0, vy: BALL_SPEED_Y });

        let step = env.step(Action::Noop as usize).unwrap();
        assert_eq!(step.info.lives, 4);
        assert!(!step.terminated);
        assert!(!env.ball_in_play());
    }

    #[test]
    fn last_life_terminates() {
        let mut env = game();
        env.lives = 1;
        env.paddle_x = FIELD_RIGHT - PADDLE_WIDTH;
        env.ball = Some(Ball { x: FIELD_LEFT + 4, y: FIELD_BOTTOM - 2, vx: 0, vy: BALL_SPEED_Y });

        let step = env.step(Action::Noop as usize).unwrap();
        assert!(step.terminated);
        assert_eq!(step.info.lives, 0);

        // FIRE cannot serve once the game is over.
        env.step(Action::Fire as usize).unwrap();
        assert!(!env.ball_in_play());
    }

    #[test]
    fn bottom_row_brick_scores_one() {
        let mut env = game();
        let below_wall = BRICK_TOP + BRICK_HEIGHT * 6;
        env.ball = Some(Ball { x: FIELD_LEFT + 1, y: below_wall, vx: 0, vy: -BALL_SPEED_Y });

        let step = env.step(Action::Noop as usize).unwrap();
        assert_eq!(step.reward, 1.0);
        assert!(!env.bricks[5][0]);
        assert_eq!(env.bricks_left(), BRICK_ROWS * BRICK_COLS - 1);
        assert!(env.ball.is_some_and(|b| b.vy > 0));
    }

    #[test]
    fn top_row_brick_scores_seven() {
        let mut env = game();
        env.bricks[1..].iter_mut().for_each(|row| *row = [false; BRICK_COLS]);
        env.ball = Some(Ball { x: FIELD_LEFT + 1, y: BRICK_TOP + 6, vx: 0, vy: -BALL_SPEED_Y });

        let step = env.step(Action::Noop as usize).unwrap();
        assert_eq!(step.reward, 7.0);
        assert_eq!(env.score(), 7);
    }

    #[test]
    fn paddle_returns_the_ball() {
        let mut env = game();
        let centre = env.paddle_x + PADDLE_WIDTH / 2;
        env.ball = Some(Ball { x: centre, y: PADDLE_Y - 3, vx: 0, vy: BALL_SPEED_Y });

        env.step(Action::Noop as usize).unwrap();
        let ball = env.ball.unwrap();
        assert!(ball.vy < 0);
        assert_eq!(ball.vx, 1);
        assert_eq!(env.lives(), 5);
    }

    #[test]
    fn cleared_wall_is_rebuilt() {
        let mut env = game();
        env.bricks = [[false; BRICK_COLS]; BRICK_ROWS];
        env.bricks[5][0] = true;
        let below_wall = BRICK_TOP + BRICK_HEIGHT * 6;
        env.ball = Some(Ball { x: FIELD_LEFT + 1, y: below_wall, vx: 0, vy: -BALL_SPEED_Y });

        env.step(Action::Noop as usize).unwrap();
        assert_eq!(env.bricks_left(), BRICK_ROWS * BRICK_COLS);
    }
}
