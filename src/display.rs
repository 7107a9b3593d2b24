pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// 64x32 monochrome screen, one byte per pixel, row-major, each 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: Vec<u8>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: vec![0; WIDTH * HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer.fill(0);
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    pub fn pixels(&self) -> &[u8] {
        &self.bit_buffer
    }

    /// XORs an 8-pixel-wide sprite onto the screen with its top-left corner at
    /// (`x`, `y`), wrapping around both edges. Each byte of `sprite` is one
    /// row, most significant bit leftmost.
    ///
    /// Returns true if any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        log::trace!("painting sprite at ({x}, {y}): {sprite:02x?}");
        let mut collision = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = (y as usize + i) % HEIGHT;
            for j in 0..8 {
                let bit = (row >> (7 - j)) & 1;
                if bit == 0 {
                    continue;
                }
                let nx = (x as usize + j) % WIDTH;
                let index = ny * WIDTH + nx;
                if self.bit_buffer[index] == 1 {
                    collision = true;
                }
                self.bit_buffer[index] ^= 1;
            }
        }
        collision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_sets_pixels_msb_first() {
        let mut fb = FrameBuffer::new();
        let collision = fb.paint(0, 0, &[0b1000_0001]);
        assert!(!collision);
        assert_eq!(fb.pixel(0, 0), 1);
        assert_eq!(fb.pixel(1, 0), 0);
        assert_eq!(fb.pixel(7, 0), 1);
    }

    #[test]
    fn paint_wraps_both_edges() {
        let mut fb = FrameBuffer::new();
        fb.paint(62, 31, &[0xF0, 0xF0]);
        assert_eq!(fb.pixel(62, 31), 1);
        assert_eq!(fb.pixel(63, 31), 1);
        assert_eq!(fb.pixel(0, 31), 1);
        assert_eq!(fb.pixel(1, 31), 1);
        assert_eq!(fb.pixel(62, 0), 1);
        assert_eq!(fb.pixel(1, 0), 1);
        assert_eq!(fb.pixel(2, 0), 0);
    }

    #[test]
    fn collision_only_when_lit_pixel_turns_off() {
        let mut fb = FrameBuffer::new();
        fb.paint(10, 10, &[0b1100_0000]);
        // overlapping only at x = 11
        assert!(fb.paint(11, 10, &[0b1000_0000]));
        assert_eq!(fb.pixel(11, 10), 0);
        // no overlap with what is still lit
        assert!(!fb.paint(20, 10, &[0xFF]));
    }

    #[test]
    fn clear_turns_everything_off() {
        let mut fb = FrameBuffer::new();
        fb.paint(0, 0, &[0xFF; 15]);
        fb.clear_buffer();
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }
}
