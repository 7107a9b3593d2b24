use anyhow::anyhow;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use chip8vm::{FrameBuffer, HEIGHT, KEY_COUNT, WIDTH};

const LIT: (u16, u16, u16) = (0, 127, 255);
const UNLIT: (u16, u16, u16) = (0, 0, 0);

/// Host keys in CHIP-8 keypad order, 0x0 through 0xF.
///
/// ```text
/// 1 2 3 C      1 2 3 4
/// 4 5 6 D      Q W E R
/// 7 8 9 E  <-  A S D F
/// A 0 B F      Z X C V
/// ```
const KEYMAP: [Key; KEY_COUNT] = [
    Key::X,    // 0
    Key::Key1, // 1
    Key::Key2, // 2
    Key::Key3, // 3
    Key::Q,    // 4
    Key::W,    // 5
    Key::E,    // 6
    Key::A,    // 7
    Key::S,    // 8
    Key::D,    // 9
    Key::Z,    // A
    Key::C,    // B
    Key::Key4, // C
    Key::R,    // D
    Key::F,    // E
    Key::V,    // F
];

/// The minifb window: shows the framebuffer and samples the keyboard.
pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
}

impl Screen {
    pub fn new(scale: Scale) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "chip8vm - ESC to exit, BACKSPACE to reset",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )
        .map_err(|e| anyhow!("failed to open window: {e}"))?;
        // pacing is done by the cycle loop
        window.limit_update_rate(None);
        Ok(Self {
            pixel_buffer: vec![from_u16_rgb(UNLIT); WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn reset_requested(&self) -> bool {
        self.window.is_key_pressed(Key::Backspace, KeyRepeat::No)
    }

    /// Current state of the 16 keypad keys.
    pub fn keypad(&self) -> [bool; KEY_COUNT] {
        let mut keys = [false; KEY_COUNT];
        for (state, key) in keys.iter_mut().zip(KEYMAP) {
            *state = self.window.is_key_down(key);
        }
        keys
    }

    /// Uploads a new frame, which also pumps window events.
    pub fn draw(&mut self, fb: &FrameBuffer) -> anyhow::Result<()> {
        for (pixel, &bit) in self.pixel_buffer.iter_mut().zip(fb.pixels()) {
            *pixel = match bit {
                0 => from_u16_rgb(UNLIT),
                _ => from_u16_rgb(LIT),
            };
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
            .map_err(|e| anyhow!("failed to present frame: {e}"))
    }

    /// Pumps window events without touching the picture.
    pub fn poll(&mut self) {
        self.window.update();
    }
}

fn from_u16_rgb((r, g, b): (u16, u16, u16)) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keymap_covers_sixteen_distinct_keys() {
        for (i, a) in KEYMAP.iter().enumerate() {
            for b in &KEYMAP[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn colours_pack_as_0rgb() {
        assert_eq!(from_u16_rgb(LIT), 0x00_7F_FF);
        assert_eq!(from_u16_rgb(UNLIT), 0);
    }
}
