use thiserror::Error;

use crate::memory::TypeAddr;

/// Everything the core can report back to whoever drives the cycle loop.
///
/// `UnknownOpcode` is recoverable: the program counter has already moved past
/// the bad word. The other variants leave the machine exactly as it was
/// before the failing instruction.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip8Error {
    #[error("unknown opcode {opcode:#06x} at {address:#05x}")]
    UnknownOpcode { opcode: u16, address: TypeAddr },

    #[error("call stack overflow at {address:#05x}: 16 return addresses already stored")]
    StackOverflow { address: TypeAddr },

    #[error("call stack underflow at {address:#05x}: return with an empty stack")]
    StackUnderflow { address: TypeAddr },

    #[error("rom is too large ({size} bytes), max size is {max_size} bytes")]
    RomTooLarge { size: usize, max_size: usize },

    #[error("program counter would leave memory: {address:#06x}")]
    AddressOutOfBounds { address: u32 },
}

impl Chip8Error {
    /// Whether the session can keep running after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnknownOpcode { .. })
    }
}
