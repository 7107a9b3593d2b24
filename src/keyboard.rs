pub const KEY_COUNT: usize = 16;

/// Mirror of the hex keypad, written by the host between cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; KEY_COUNT],
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    pub fn set_all(&mut self, keys: [bool; KEY_COUNT]) {
        self.keys = keys;
    }

    /// Key numbers past 0xF are not on the keypad and are ignored.
    pub fn set_key(&mut self, n: u8, pressed: bool) {
        match self.keys.get_mut(n as usize) {
            Some(key) => *key = pressed,
            None => log::warn!("ignoring key {n:#04x}: keypad keys are 0x0-0xF"),
        }
    }

    // a register can hold anything up to 0xFF; only the low nibble names a key
    pub fn get_key_status_from_num(&self, n: u8) -> bool {
        self.keys[(n & 0xF) as usize]
    }

    /// Lowest numbered key currently held, if any.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&k| k).map(|k| k as u8)
    }

    pub fn as_slice(&self) -> &[bool; KEY_COUNT] {
        &self.keys
    }
}
