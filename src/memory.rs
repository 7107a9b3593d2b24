use crate::error::Chip8Error;
use crate::registers::{IndexRegister, ProgramCounter};

pub type TypeAddr = u16; // in reality u12
type FontBytes = [u8; 5 * 16];

pub const MEMORY_SIZE: usize = 4096;
pub const ADDR_MASK: TypeAddr = 0x0FFF;
pub const PROGRAM_START: TypeAddr = 0x200;
pub const FONT_START: TypeAddr = 0x000;
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;
pub const STACK_DEPTH: usize = 16;

/// Bytes per glyph in the font table.
pub const GLYPH_HEIGHT: u16 = 5;

const DEFAULT_FONT: FontBytes = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

struct Font {
    data: FontBytes,
}

impl Default for Font {
    fn default() -> Self {
        Self { data: DEFAULT_FONT }
    }
}

/// 4 KiB of memory plus the registers that point into it.
///
/// Layout:
///   0x000-0x04F  font glyphs 0-F, 5 bytes each
///   0x050-0x1FF  reserved for the interpreter
///   0x200-0xFFF  program
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
    pub pc: ProgramCounter,
    pub index: IndexRegister,
    pub stack: Stack,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut mem = Self {
            bytes: [0; MEMORY_SIZE],
            pc: ProgramCounter::new(PROGRAM_START),
            index: IndexRegister::default(),
            stack: Stack::new(),
        };
        mem.load_font(&Font::default());
        mem
    }

    fn load_font(&mut self, font: &Font) {
        let start_index = FONT_START as usize;
        self.bytes[start_index..start_index + font.data.len()].copy_from_slice(&font.data);
    }

    // addresses wrap inside the 12-bit space, so `I + n` never leaves memory
    pub fn set(&mut self, addr: TypeAddr, val: u8) {
        self.bytes[(addr & ADDR_MASK) as usize] = val;
    }

    pub fn get(&self, addr: TypeAddr) -> u8 {
        self.bytes[(addr & ADDR_MASK) as usize]
    }

    /// Reads the big-endian opcode at `addr` without touching the PC.
    pub fn fetch(&self, addr: TypeAddr) -> Result<u16, Chip8Error> {
        let lo_addr = addr as usize + 1;
        if lo_addr >= MEMORY_SIZE {
            return Err(Chip8Error::AddressOutOfBounds {
                address: lo_addr as u32,
            });
        }
        let (l, r) = (self.bytes[addr as usize], self.bytes[lo_addr]);
        Ok(((l as u16) << 8) | r as u16)
    }

    /// Copies a program image to 0x200. Nothing is written if it does not fit.
    pub fn load_rom(&mut self, bytes: &[u8]) -> Result<(), Chip8Error> {
        if bytes.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        let start_index = PROGRAM_START as usize;
        self.bytes[start_index..start_index + bytes.len()].copy_from_slice(bytes);
        log::debug!("loaded {} byte rom at {:#05x}", bytes.len(), PROGRAM_START);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

/// Return addresses for `2nnn`/`00EE`, at most [`STACK_DEPTH`] deep.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    addresses: Vec<TypeAddr>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            addresses: Vec::with_capacity(STACK_DEPTH),
        }
    }

    /// Returns false, leaving the stack alone, when it is already full.
    #[must_use]
    pub fn push(&mut self, addr: TypeAddr) -> bool {
        if self.is_full() {
            return false;
        }
        self.addresses.push(addr);
        true
    }

    pub fn pop(&mut self) -> Option<TypeAddr> {
        self.addresses.pop()
    }

    pub fn peek(&self) -> Option<TypeAddr> {
        self.addresses.last().copied()
    }

    pub fn is_full(&self) -> bool {
        self.addresses.len() >= STACK_DEPTH
    }

    pub fn depth(&self) -> usize {
        self.addresses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_loaded_and_program_area_zeroed() {
        let mem = Memory::new();
        assert_eq!(&mem.as_slice()[..80], &DEFAULT_FONT[..]);
        assert!(mem.as_slice()[0x200..].iter().all(|&b| b == 0));
        assert_eq!(mem.pc.get(), 0x200);
    }

    #[test]
    fn rom_lands_at_0x200() {
        let mut mem = Memory::new();
        mem.load_rom(&[0x00, 0xE0, 0x12, 0x00]).unwrap();
        assert_eq!(mem.fetch(0x200).unwrap(), 0x00E0);
        assert_eq!(mem.fetch(0x202).unwrap(), 0x1200);
    }

    #[test]
    fn rom_filling_all_program_space_fits() {
        let mut mem = Memory::new();
        let rom = vec![0xAB; MAX_ROM_SIZE];
        mem.load_rom(&rom).unwrap();
        assert_eq!(mem.get(0xFFF), 0xAB);
    }

    #[test]
    fn oversized_rom_is_rejected_untouched() {
        let mut mem = Memory::new();
        let rom = vec![0xAB; MAX_ROM_SIZE + 1];
        assert_eq!(
            mem.load_rom(&rom),
            Err(Chip8Error::RomTooLarge {
                size: MAX_ROM_SIZE + 1,
                max_size: 0xE00
            })
        );
        assert!(mem.as_slice()[0x200..].iter().all(|&b| b == 0));
    }

    #[test]
    fn fetch_at_last_byte_fails() {
        let mem = Memory::new();
        assert!(mem.fetch(0xFFE).is_ok());
        assert_eq!(
            mem.fetch(0xFFF),
            Err(Chip8Error::AddressOutOfBounds { address: 0x1000 })
        );
    }

    #[test]
    fn accesses_wrap_at_4k() {
        let mut mem = Memory::new();
        mem.set(0x1005, 7);
        assert_eq!(mem.get(0x005), 7);
    }

    #[test]
    fn stack_holds_sixteen() {
        let mut stack = Stack::new();
        for i in 0..16 {
            assert!(stack.push(0x200 + i * 2));
        }
        assert!(stack.is_full());
        assert!(!stack.push(0x300));
        assert_eq!(stack.depth(), 16);
        assert_eq!(stack.pop(), Some(0x21E));
    }
}
