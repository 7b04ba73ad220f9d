use crate::FrameError;

/// Native emulator output height in pixels.
pub const ATARI_HEIGHT: u32 = 210;
/// Native emulator output width in pixels.
pub const ATARI_WIDTH: u32 = 160;

/// A rendered RGB observation, stored row-major as `height * width * 3` bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    height: u32,
    width: u32,
    data: Vec<u8>,
}

impl RawFrame {
    /// Wraps an RGB buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::BufferLength`] when `data` does not hold exactly
    /// `height * width * 3` bytes.
    pub fn new(height: u32, width: u32, data: Vec<u8>) -> Result<Self, FrameError> {
        let expected = height as usize * width as usize * 3;
        if data.len() != expected {
            return Err(FrameError::BufferLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { height, width, data })
    }

    /// A frame of a single colour.
    #[must_use]
    pub fn filled(height: u32, width: u32, rgb: [u8; 3]) -> Self {
        let data = rgb.repeat(height as usize * width as usize);
        Self { height, width, data }
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access for renderers drawing straight into the buffer.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// The buffer viewed as one `[r, g, b]` triple per pixel.
    #[must_use]
    pub fn pixels(&self) -> &[[u8; 3]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn pixels_mut(&mut self) -> &mut [[u8; 3]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// Pixel at column `x`, row `y`.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels()[(y * self.width + x) as usize]
    }

    /// Paints the axis-aligned rectangle `[x, x + w) × [y, y + h)`, clipped to
    /// the frame bounds.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, rgb: [u8; 3]) {
        let width = self.width;
        let x0 = x.max(0).unsigned_abs().min(width);
        let y0 = y.max(0).unsigned_abs().min(self.height);
        let x1 = (i64::from(x) + i64::from(w)).clamp(0, i64::from(width));
        let y1 = (i64::from(y) + i64::from(h)).clamp(0, i64::from(self.height));
        let pixels = self.pixels_mut();
        for row in i64::from(y0)..y1 {
            for col in i64::from(x0)..x1 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let idx = (row * i64::from(width) + col) as usize;
                pixels[idx] = rgb;
            }
        }
    }
}
