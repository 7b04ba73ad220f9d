//! Draws the game state onto a native-resolution RGB frame.

use frame::{RawFrame, ATARI_HEIGHT, ATARI_WIDTH};

use crate::breakout::{
    Breakout, BALL_SIZE, BRICK_COLS, BRICK_HEIGHT, BRICK_TOP, BRICK_WIDTH, FIELD_LEFT, FIELD_RIGHT,
    FIELD_TOP, PADDLE_HEIGHT, PADDLE_WIDTH, PADDLE_Y,
};

const BACKGROUND: [u8; 3] = [0, 0, 0];
const WALL: [u8; 3] = [142, 142, 142];
const PADDLE: [u8; 3] = [200, 72, 72];
const BALL: [u8; 3] = [200, 72, 72];

/// Top to bottom.
const ROW_COLORS: [[u8; 3]; 6] = [
    [200, 72, 72],
    [198, 108, 58],
    [180, 122, 48],
    [162, 162, 42],
    [72, 160, 72],
    [66, 72, 200],
];

const WALL_TOP: i32 = 17;

#[allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation
)]
pub(crate) fn draw(game: &Breakout) -> RawFrame {
    let mut out = RawFrame::filled(ATARI_HEIGHT, ATARI_WIDTH, BACKGROUND);
    let width = ATARI_WIDTH as i32;
    let side_height = (ATARI_HEIGHT as i32 - WALL_TOP) as u32;

    out.fill_rect(0, WALL_TOP, ATARI_WIDTH, (FIELD_TOP - WALL_TOP) as u32, WALL);
    out.fill_rect(0, WALL_TOP, FIELD_LEFT as u32, side_height, WALL);
    out.fill_rect(FIELD_RIGHT, WALL_TOP, (width - FIELD_RIGHT) as u32, side_height, WALL);

    for (row, bricks) in game.bricks.iter().enumerate() {
        let y = BRICK_TOP + BRICK_HEIGHT * row as i32;
        for col in (0..BRICK_COLS).filter(|&c| bricks[c]) {
            let x = FIELD_LEFT + BRICK_WIDTH * col as i32;
            out.fill_rect(x, y, BRICK_WIDTH as u32, BRICK_HEIGHT as u32, ROW_COLORS[row]);
        }
    }

    out.fill_rect(game.paddle_x, PADDLE_Y, PADDLE_WIDTH as u32, PADDLE_HEIGHT as u32, PADDLE);
    if let Some(ball) = game.ball {
        out.fill_rect(ball.x, ball.y, BALL_SIZE as u32, BALL_SIZE as u32, BALL);
    }
    out
}
