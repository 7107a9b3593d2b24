use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{
    decode::OpCodes,
    display::FrameBuffer,
    error::Chip8Error,
    keyboard::{Keyboard, KEY_COUNT},
    memory::{Memory, TypeAddr, FONT_START, GLYPH_HEIGHT},
    registers::{ProgramCounter, Registers},
    timer::Timer,
};

/// Outputs of one cycle. Both start false at the top of every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleFlags {
    /// The framebuffer changed (`00E0` or `Dxyn` ran).
    pub redraw: bool,
    /// The sound timer was nonzero when this cycle's timers decayed.
    pub sound: bool,
}

/// The whole machine: memory, registers, timers, keypad and screen.
///
/// Drive it by calling [`Emulator::run_cycle`] once per tick; exactly one
/// instruction runs per call and the timers drop by one. Pacing is up to the
/// caller.
pub struct Emulator {
    fb: FrameBuffer,
    regs: Registers,
    mem: Memory,
    delay_timer: Timer,
    sound_timer: Timer,
    keyboard: Keyboard,
    flags: CycleFlags,
    rng: StdRng,
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Emulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Same as [`Emulator::new`] but with a fixed seed for `Cxnn`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            fb: FrameBuffer::new(),
            regs: Registers::new(),
            mem: Memory::new(),
            delay_timer: Timer::default(),
            sound_timer: Timer::default(),
            keyboard: Keyboard::new(),
            flags: CycleFlags::default(),
            rng,
        }
    }

    /// Puts the machine back to its power-on state. The loaded program is gone
    /// too; load it again to restart it.
    pub fn reset(&mut self) {
        log::debug!("resetting machine state");
        self.fb = FrameBuffer::new();
        self.regs = Registers::new();
        self.mem = Memory::new();
        self.delay_timer = Timer::default();
        self.sound_timer = Timer::default();
        self.keyboard.reset();
        self.flags = CycleFlags::default();
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Chip8Error> {
        self.mem.load_rom(rom)
    }

    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.keyboard.set_all(keys);
    }

    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.keyboard.set_key(key, pressed);
    }

    /// Fetches, decodes and executes the instruction at PC, then decays the
    /// timers.
    ///
    /// An unknown opcode is skipped over (PC += 2, timers still decay) and
    /// reported as an error. Stack and address errors leave the machine as it
    /// was before the cycle.
    pub fn run_cycle(&mut self) -> Result<CycleFlags, Chip8Error> {
        self.flags = CycleFlags::default();

        let address = self.mem.pc.get();
        let ins = self.mem.fetch(address)?;
        match OpCodes::decode_raw(ins) {
            Some(operation) => {
                log::trace!("{address:#05x}: {ins:04x}  {operation}");
                self.execute_ins(operation)?;
            }
            None => {
                log::warn!("unknown opcode {ins:#06x} at {address:#05x}");
                self.mem.pc.set_addr(self.mem.pc.offset(2))?;
                self.sync_timers();
                return Err(Chip8Error::UnknownOpcode {
                    opcode: ins,
                    address,
                });
            }
        }

        self.sync_timers();
        Ok(self.flags)
    }

    fn sync_timers(&mut self) {
        self.delay_timer.tick();
        if self.sound_timer.tick() {
            self.flags.sound = true;
        }
    }

    /// Works out where PC goes after `ins` without changing anything, so a
    /// failing instruction can bail out before it has side effects.
    fn next_pc(&self, ins: OpCodes) -> Result<TypeAddr, Chip8Error> {
        let pc = self.mem.pc;
        let address = pc.get();
        let skip_if = |cond: bool| if cond { pc.offset(4) } else { pc.offset(2) };

        let target = match ins {
            OpCodes::Jump(addr) => addr as u32,
            OpCodes::PushSubroutine(addr) => {
                // the return address has to be somewhere we can come back to
                ProgramCounter::check(pc.offset(2))?;
                addr as u32
            }
            OpCodes::PopSubroutine => match self.mem.stack.peek() {
                Some(addr) => addr as u32,
                None => return Err(Chip8Error::StackUnderflow { address }),
            },
            OpCodes::JumpWithOffset(addr) => addr as u32 + self.regs.get(0) as u32,
            OpCodes::SkipEqualConstant(vx, nn) => skip_if(self.regs.get(vx) == nn),
            OpCodes::SkipNotEqualConstant(vx, nn) => skip_if(self.regs.get(vx) != nn),
            OpCodes::SkipEqualRegister(vx, vy) => {
                skip_if(self.regs.get(vx) == self.regs.get(vy))
            }
            OpCodes::SkipNotEqualRegister(vx, vy) => {
                skip_if(self.regs.get(vx) != self.regs.get(vy))
            }
            OpCodes::SkipIfPressed(vx) => {
                skip_if(self.keyboard.get_key_status_from_num(self.regs.get(vx)))
            }
            OpCodes::SkipIfNotPressed(vx) => {
                skip_if(!self.keyboard.get_key_status_from_num(self.regs.get(vx)))
            }
            // no key yet: run the same instruction again next cycle
            OpCodes::GetKey(_) if self.keyboard.first_pressed().is_none() => address as u32,
            _ => pc.offset(2),
        };
        ProgramCounter::check(target)
    }

    /// Runs one decoded instruction, including its PC update.
    pub fn execute_ins(&mut self, ins: OpCodes) -> Result<(), Chip8Error> {
        let next = self.next_pc(ins)?;

        match ins {
            OpCodes::ClearScreen => {
                self.fb.clear_buffer();
                self.flags.redraw = true;
            }
            OpCodes::PushSubroutine(_) => {
                let address = self.mem.pc.get();
                if !self.mem.stack.push(address + 2) {
                    return Err(Chip8Error::StackOverflow { address });
                }
            }
            OpCodes::PopSubroutine => {
                self.mem.stack.pop();
            }
            OpCodes::SetRegister(vx, nn) => {
                self.regs.set_register(vx, nn);
            }
            OpCodes::AddToRegister(vx, nn) => {
                self.regs.add_to_register(vx, nn);
            }
            OpCodes::CopyRegister(vx, vy) => {
                self.regs.set_register(vx, self.regs.get(vy));
            }
            OpCodes::Or(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vy) | self.regs.get(vx));
            }
            OpCodes::And(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vy) & self.regs.get(vx));
            }
            OpCodes::XOr(vx, vy) => {
                self.regs
                    .set_register(vx, self.regs.get(vy) ^ self.regs.get(vx));
            }
            // VF is written last in all the ALU ops below, so it holds the
            // flag even when VF was the destination
            OpCodes::Add(vx, vy) => {
                let (z, carry) = self.regs.get(vx).overflowing_add(self.regs.get(vy));
                self.regs.set_register(vx, z);
                self.regs.set_flag(carry);
            }
            OpCodes::SubtractForward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, x.wrapping_sub(y));
                self.regs.set_flag(x >= y); // no borrow
            }
            OpCodes::SubtractBackward(vx, vy) => {
                let (x, y) = (self.regs.get(vx), self.regs.get(vy));
                self.regs.set_register(vx, y.wrapping_sub(x));
                self.regs.set_flag(y >= x); // no borrow
            }
            OpCodes::RightShift(vx, _) => {
                let vx_value = self.regs.get(vx);

                let vf = vx_value & 1;
                let vx_value = vx_value >> 1;

                self.regs.set_register(vx, vx_value);
                self.regs.set_register(0xf, vf);
            }
            OpCodes::LeftShift(vx, _) => {
                let vx_value = self.regs.get(vx);

                let vf = (vx_value >> 7) & 1;
                let vx_value = vx_value << 1;

                self.regs.set_register(vx, vx_value);
                self.regs.set_register(0xf, vf);
            }
            OpCodes::SetIndexRegister(addr) => self.mem.index.set_addr(addr),
            OpCodes::Random(vx, nn) => {
                let ransuu: u8 = self.rng.gen();
                self.regs.set_register(vx, nn & ransuu);
            }
            OpCodes::Display(reg_x, reg_y, height) => {
                let (x, y) = (self.regs.get(reg_x), self.regs.get(reg_y));
                let start = self.mem.index.get();
                let sprite: Vec<u8> = (0..height as u16)
                    .map(|row| self.mem.get(start + row))
                    .collect();

                let collision = self.fb.paint(x, y, &sprite);
                self.regs.set_flag(collision);
                self.flags.redraw = true;
            }
            OpCodes::CopyDelayToRegister(vx) => {
                self.regs.set_register(vx, self.delay_timer.count);
            }
            OpCodes::GetKey(vx) => {
                if let Some(key) = self.keyboard.first_pressed() {
                    self.regs.set_register(vx, key);
                }
            }
            OpCodes::CopyRegisterToDelay(vx) => self.delay_timer.set(self.regs.get(vx)),
            OpCodes::CopyRegisterToSound(vx) => self.sound_timer.set(self.regs.get(vx)),
            OpCodes::AddToIndex(vx) => {
                self.mem
                    .index
                    .set_addr(self.mem.index.get() + self.regs.get(vx) as u16);
            }
            OpCodes::PointChar(vx) => {
                let addr = FONT_START + self.regs.get(vx) as u16 * GLYPH_HEIGHT;
                self.mem.index.set_addr(addr);
            }
            OpCodes::ToDecimal(vx) => {
                let value = self.regs.get(vx);
                let index = self.mem.index.get();
                self.mem.set(index, value / 100);
                self.mem.set(index + 1, (value / 10) % 10);
                self.mem.set(index + 2, value % 10);
            }
            OpCodes::StoreRegisterToMemory(vx) => {
                let index = self.mem.index.get();
                for reg in 0..=vx {
                    self.mem.set(index + reg as u16, self.regs.get(reg));
                }
            }
            OpCodes::LoadRegisterFromMemory(vx) => {
                let index = self.mem.index.get();
                for reg in 0..=vx {
                    self.regs.set_register(reg, self.mem.get(index + reg as u16));
                }
            }
            // control flow only; handled by next_pc
            OpCodes::Jump(_)
            | OpCodes::JumpWithOffset(_)
            | OpCodes::SkipEqualConstant(..)
            | OpCodes::SkipNotEqualConstant(..)
            | OpCodes::SkipEqualRegister(..)
            | OpCodes::SkipNotEqualRegister(..)
            | OpCodes::SkipIfPressed(_)
            | OpCodes::SkipIfNotPressed(_) => {}
        }

        self.mem.pc.set_addr(next as u32)
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn flags(&self) -> CycleFlags {
        self.flags
    }

    pub fn redraw_needed(&self) -> bool {
        self.flags.redraw
    }

    pub fn sound_needed(&self) -> bool {
        self.flags.sound
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn pc(&self) -> TypeAddr {
        self.mem.pc.get()
    }

    pub fn index(&self) -> TypeAddr {
        self.mem.index.get()
    }

    pub fn stack_depth(&self) -> usize {
        self.mem.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.count
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.count
    }

    pub fn memory(&self) -> &[u8] {
        self.mem.as_slice()
    }

    pub fn keys(&self) -> &[bool; KEY_COUNT] {
        self.keyboard.as_slice()
    }
}
