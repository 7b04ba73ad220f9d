use frame::{RawFrame, ATARI_HEIGHT, ATARI_WIDTH};

/// Deterministic pseudo-random native-resolution frame.
pub fn noise_frame(seed: u64) -> RawFrame {
    let rng = fastrand::Rng::with_seed(seed);
    let len = (ATARI_HEIGHT * ATARI_WIDTH * 3) as usize;
    let data = (0..len).map(|_| rng.u8(..)).collect();
    RawFrame::new(ATARI_HEIGHT, ATARI_WIDTH, data).unwrap()
}
