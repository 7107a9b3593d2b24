use crate::error::Chip8Error;
use crate::memory::{TypeAddr, ADDR_MASK, MEMORY_SIZE};

/// Register holding the carry, borrow and collision flags.
///
/// `VF` is also an ordinary register that programs can read and write, but
/// `8xy4`..`8xyE` and `Dxyn` overwrite it as a side effect. Anything stored in
/// it does not survive those instructions.
pub const FLAG_REGISTER: u8 = 0xF;

/// The sixteen general purpose registers `V0`..`VF`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    registers: [u8; 16],
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}

impl Registers {
    pub fn new() -> Self {
        Self { registers: [0; 16] }
    }

    // register numbers come out of a nibble, so only the low four bits count
    pub fn set_register(&mut self, reg_num: u8, value: u8) {
        self.registers[(reg_num & 0xF) as usize] = value;
    }

    pub fn add_to_register(&mut self, reg_num: u8, value: u8) {
        let total = self.get(reg_num).wrapping_add(value);
        self.set_register(reg_num, total);
    }

    pub fn get(&self, reg_num: u8) -> u8 {
        self.registers[(reg_num & 0xF) as usize]
    }

    /// Writes `VF` as a 0/1 flag.
    pub fn set_flag(&mut self, flag: bool) {
        self.set_register(FLAG_REGISTER, flag as u8);
    }

    pub fn flag(&self) -> u8 {
        self.get(FLAG_REGISTER)
    }

    pub fn as_slice(&self) -> &[u8; 16] {
        &self.registers
    }
}

// Special registers

/// Address of the next opcode to fetch. Always inside memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramCounter(TypeAddr);

impl ProgramCounter {
    pub fn new(addr: TypeAddr) -> Self {
        Self(addr)
    }

    pub fn get(&self) -> TypeAddr {
        self.0
    }

    /// Address `by` bytes past the current one, without moving.
    pub fn offset(&self, by: u16) -> u32 {
        self.0 as u32 + by as u32
    }

    /// Moves to `addr`, refusing anything outside the 4 KiB address space.
    pub fn set_addr(&mut self, addr: u32) -> Result<(), Chip8Error> {
        let addr = Self::check(addr)?;
        self.0 = addr;
        Ok(())
    }

    pub fn check(addr: u32) -> Result<TypeAddr, Chip8Error> {
        if addr >= MEMORY_SIZE as u32 {
            return Err(Chip8Error::AddressOutOfBounds { address: addr });
        }
        Ok(addr as TypeAddr)
    }
}

/// The `I` register. Only its low 12 bits are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexRegister(TypeAddr);

impl IndexRegister {
    pub fn get(&self) -> TypeAddr {
        self.0
    }

    pub fn set_addr(&mut self, addr: TypeAddr) {
        self.0 = addr & ADDR_MASK;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_wraps_modulo_256() {
        let mut regs = Registers::new();
        regs.set_register(3, 0xF0);
        regs.add_to_register(3, 0x20);
        assert_eq!(regs.get(3), 0x10);
        // VF untouched by 7xnn
        assert_eq!(regs.flag(), 0);
    }

    #[test]
    fn index_is_masked_to_12_bits() {
        let mut i = IndexRegister::default();
        i.set_addr(0x1234);
        assert_eq!(i.get(), 0x234);
    }

    #[test]
    fn pc_refuses_addresses_past_memory() {
        let mut pc = ProgramCounter::new(0x200);
        assert_eq!(
            pc.set_addr(0x1000),
            Err(Chip8Error::AddressOutOfBounds { address: 0x1000 })
        );
        assert_eq!(pc.get(), 0x200);
        pc.set_addr(0xFFE).unwrap();
        assert_eq!(pc.get(), 0xFFE);
    }
}
