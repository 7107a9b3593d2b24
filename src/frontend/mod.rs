//! Host side of the emulator: everything the core leaves to its caller.

pub mod config;
pub mod sound;
pub mod window;
