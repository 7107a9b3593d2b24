// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits)
//
// Stack of up to 16 return addresses
//
// Delay timer & Sound timer: count down once per cycle until 0
// Beep while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// 35 opcodes, each are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// The core never touches a window, audio device or file. It takes a ROM as
// bytes and the keypad as 16 booleans, and hands back the framebuffer plus
// the redraw/sound flags after every cycle.

pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

pub use decode::{OpCodes, RawInstruction};
pub use display::{FrameBuffer, HEIGHT, WIDTH};
pub use emulator::{CycleFlags, Emulator};
pub use error::Chip8Error;
pub use keyboard::KEY_COUNT;
