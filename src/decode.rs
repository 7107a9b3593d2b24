use std::fmt;

use crate::memory::TypeAddr;

/// A fetched 16-bit opcode and the operand fields carved out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInstruction {
    code: u16,
}

impl RawInstruction {
    pub fn new(code: u16) -> Self {
        RawInstruction { code }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    // n is starting digit, m is length
    fn nth_m_digits(&self, n: u8, m: u8) -> u16 {
        // 0110 1100 1111 0001
        // -------------------
        // 1111 1111 1111 1111
        //      1111 1111 1111
        //           1111 1111
        //                1111
        //
        // 4 - (m) - (n - 1)
        let shift_places = (4 - m - (n - 1)) * 4;
        let mask: u16 = if m >= 4 { 0xFFFF } else { (1 << (m * 4)) - 1 };
        (self.code >> shift_places) & mask
    }

    /// Top nibble: the instruction family.
    pub fn family(&self) -> u8 {
        self.nth_m_digits(1, 1) as u8
    }

    pub fn x(&self) -> u8 {
        self.nth_m_digits(2, 1) as u8
    }

    pub fn y(&self) -> u8 {
        self.nth_m_digits(3, 1) as u8
    }

    pub fn n(&self) -> u8 {
        self.nth_m_digits(4, 1) as u8
    }

    pub fn nn(&self) -> u8 {
        self.nth_m_digits(3, 2) as u8
    }

    pub fn nnn(&self) -> TypeAddr {
        self.nth_m_digits(2, 3)
    }
}

impl PartialEq<u16> for RawInstruction {
    fn eq(&self, ins: &u16) -> bool {
        ins.eq(&self.code)
    }
}

#[test]
fn test_bit_manip() {
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 1), 0xC);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(3, 1), 0xE);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 1), 0x4);

    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 2), 0x4C);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(2, 2), 0xCE);
    assert_eq!(RawInstruction::new(0x4CEE).nth_m_digits(1, 4), 0x4CEE);
}

#[test]
fn test_operand_fields() {
    let raw = RawInstruction::new(0xD12F);
    assert_eq!(raw.family(), 0xD);
    assert_eq!(raw.x(), 0x1);
    assert_eq!(raw.y(), 0x2);
    assert_eq!(raw.n(), 0xF);
    assert_eq!(raw.nn(), 0x2F);
    assert_eq!(raw.nnn(), 0x12F);
}

#[test]
fn test_fields_of_extreme_words() {
    for code in [0x0000, 0xFFFF] {
        let raw = RawInstruction::new(code);
        let nibble = (code & 0xF) as u8;
        assert_eq!(raw.family(), nibble);
        assert_eq!((raw.x(), raw.y(), raw.n()), (nibble, nibble, nibble));
        assert_eq!(raw.nn() as u16, code & 0xFF);
        assert_eq!(raw.nnn(), code & 0xFFF);
    }
}

/// Every instruction the interpreter understands, operands already extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCodes {
    // 00E0
    // turn all pixels to 0
    ClearScreen,
    // 00EE
    PopSubroutine,
    // 1NNN
    // set PC to address NNN, "jump" to memory location
    Jump(TypeAddr),
    // 2NNN
    PushSubroutine(TypeAddr),

    // 3XNN
    SkipEqualConstant(u8, u8),
    // 4XNN
    SkipNotEqualConstant(u8, u8),
    // 5XY0
    SkipEqualRegister(u8, u8),
    // 9XY0
    SkipNotEqualRegister(u8, u8),

    // 6XNN
    // set register VX to value NN
    SetRegister(u8, u8),
    // 7XNN
    // add value NN to VX, VF untouched
    AddToRegister(u8, u8),

    // 8XY0
    CopyRegister(u8, u8),
    // 8XY1
    Or(u8, u8),
    // 8XY2
    And(u8, u8),
    // 8XY3
    XOr(u8, u8),
    /// 8XY4
    Add(u8, u8),
    // 8XY5
    SubtractForward(u8, u8),
    // 8XY6
    RightShift(u8, u8),
    // 8XY7
    SubtractBackward(u8, u8),
    // 8XYE
    LeftShift(u8, u8),

    // ANNN
    // set index register I to address NNN
    SetIndexRegister(TypeAddr),
    // BNNN
    JumpWithOffset(TypeAddr),
    // CXNN
    Random(u8, u8),
    // DXYN
    // draw an N pixel tall sprite starting at I
    // at Coordinates (VX, VY)
    // XOR pixels on screen using sprite data
    // if pixels on screen were switched OFF: VF set to 1
    Display(u8, u8, u8),

    // EX9E
    SkipIfPressed(u8),
    // EXA1
    SkipIfNotPressed(u8),

    // FX07
    CopyDelayToRegister(u8),
    // FX0A
    GetKey(u8),
    // FX15
    CopyRegisterToDelay(u8),
    // FX18
    CopyRegisterToSound(u8),
    // FX1E
    AddToIndex(u8),
    // FX29
    PointChar(u8),
    // FX33
    ToDecimal(u8),
    // FX55
    StoreRegisterToMemory(u8),
    // FX65
    LoadRegisterFromMemory(u8),
}

impl OpCodes {
    /// Returns `None` for any word that is not one of the 35 instructions.
    pub fn decode_raw(ins: u16) -> Option<Self> {
        let raw = RawInstruction::new(ins);
        let (x, y) = (raw.x(), raw.y());

        let op = match raw.family() {
            0x0 => match ins {
                0x00E0 => Self::ClearScreen,
                0x00EE => Self::PopSubroutine,
                _ => return None,
            },
            0x1 => Self::Jump(raw.nnn()),
            0x2 => Self::PushSubroutine(raw.nnn()),
            0x3 => Self::SkipEqualConstant(x, raw.nn()),
            0x4 => Self::SkipNotEqualConstant(x, raw.nn()),
            0x5 if raw.n() == 0 => Self::SkipEqualRegister(x, y),
            0x6 => Self::SetRegister(x, raw.nn()),
            0x7 => Self::AddToRegister(x, raw.nn()),
            0x8 => match raw.n() {
                0x0 => Self::CopyRegister(x, y),
                0x1 => Self::Or(x, y),
                0x2 => Self::And(x, y),
                0x3 => Self::XOr(x, y),
                0x4 => Self::Add(x, y),
                0x5 => Self::SubtractForward(x, y),
                0x6 => Self::RightShift(x, y),
                0x7 => Self::SubtractBackward(x, y),
                0xE => Self::LeftShift(x, y),
                _ => return None,
            },
            0x9 if raw.n() == 0 => Self::SkipNotEqualRegister(x, y),
            0xA => Self::SetIndexRegister(raw.nnn()),
            0xB => Self::JumpWithOffset(raw.nnn()),
            0xC => Self::Random(x, raw.nn()),
            0xD => Self::Display(x, y, raw.n()),
            0xE => match raw.nn() {
                0x9E => Self::SkipIfPressed(x),
                0xA1 => Self::SkipIfNotPressed(x),
                _ => return None,
            },
            0xF => match raw.nn() {
                0x07 => Self::CopyDelayToRegister(x),
                0x0A => Self::GetKey(x),
                0x15 => Self::CopyRegisterToDelay(x),
                0x18 => Self::CopyRegisterToSound(x),
                0x1E => Self::AddToIndex(x),
                0x29 => Self::PointChar(x),
                0x33 => Self::ToDecimal(x),
                0x55 => Self::StoreRegisterToMemory(x),
                0x65 => Self::LoadRegisterFromMemory(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(op)
    }
}

impl fmt::Display for OpCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ClearScreen => write!(f, "CLS"),
            Self::PopSubroutine => write!(f, "RET"),
            Self::Jump(addr) => write!(f, "JP {addr:#05x}"),
            Self::PushSubroutine(addr) => write!(f, "CALL {addr:#05x}"),
            Self::SkipEqualConstant(x, nn) => write!(f, "SE V{x:X}, {nn:#04x}"),
            Self::SkipNotEqualConstant(x, nn) => write!(f, "SNE V{x:X}, {nn:#04x}"),
            Self::SkipEqualRegister(x, y) => write!(f, "SE V{x:X}, V{y:X}"),
            Self::SkipNotEqualRegister(x, y) => write!(f, "SNE V{x:X}, V{y:X}"),
            Self::SetRegister(x, nn) => write!(f, "LD V{x:X}, {nn:#04x}"),
            Self::AddToRegister(x, nn) => write!(f, "ADD V{x:X}, {nn:#04x}"),
            Self::CopyRegister(x, y) => write!(f, "LD V{x:X}, V{y:X}"),
            Self::Or(x, y) => write!(f, "OR V{x:X}, V{y:X}"),
            Self::And(x, y) => write!(f, "AND V{x:X}, V{y:X}"),
            Self::XOr(x, y) => write!(f, "XOR V{x:X}, V{y:X}"),
            Self::Add(x, y) => write!(f, "ADD V{x:X}, V{y:X}"),
            Self::SubtractForward(x, y) => write!(f, "SUB V{x:X}, V{y:X}"),
            Self::RightShift(x, y) => write!(f, "SHR V{x:X}, V{y:X}"),
            Self::SubtractBackward(x, y) => write!(f, "SUBN V{x:X}, V{y:X}"),
            Self::LeftShift(x, y) => write!(f, "SHL V{x:X}, V{y:X}"),
            Self::SetIndexRegister(addr) => write!(f, "LD I, {addr:#05x}"),
            Self::JumpWithOffset(addr) => write!(f, "JP V0, {addr:#05x}"),
            Self::Random(x, nn) => write!(f, "RND V{x:X}, {nn:#04x}"),
            Self::Display(x, y, n) => write!(f, "DRW V{x:X}, V{y:X}, {n}"),
            Self::SkipIfPressed(x) => write!(f, "SKP V{x:X}"),
            Self::SkipIfNotPressed(x) => write!(f, "SKNP V{x:X}"),
            Self::CopyDelayToRegister(x) => write!(f, "LD V{x:X}, DT"),
            Self::GetKey(x) => write!(f, "LD V{x:X}, K"),
            Self::CopyRegisterToDelay(x) => write!(f, "LD DT, V{x:X}"),
            Self::CopyRegisterToSound(x) => write!(f, "LD ST, V{x:X}"),
            Self::AddToIndex(x) => write!(f, "ADD I, V{x:X}"),
            Self::PointChar(x) => write!(f, "LD F, V{x:X}"),
            Self::ToDecimal(x) => write!(f, "LD B, V{x:X}"),
            Self::StoreRegisterToMemory(x) => write!(f, "LD [I], V{x:X}"),
            Self::LoadRegisterFromMemory(x) => write!(f, "LD V{x:X}, [I]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_every_family() {
        let cases = [
            (0x00E0, OpCodes::ClearScreen),
            (0x00EE, OpCodes::PopSubroutine),
            (0x1ABC, OpCodes::Jump(0xABC)),
            (0x2ABC, OpCodes::PushSubroutine(0xABC)),
            (0x3A12, OpCodes::SkipEqualConstant(0xA, 0x12)),
            (0x4A12, OpCodes::SkipNotEqualConstant(0xA, 0x12)),
            (0x5AB0, OpCodes::SkipEqualRegister(0xA, 0xB)),
            (0x6A12, OpCodes::SetRegister(0xA, 0x12)),
            (0x7A12, OpCodes::AddToRegister(0xA, 0x12)),
            (0x8AB0, OpCodes::CopyRegister(0xA, 0xB)),
            (0x8AB1, OpCodes::Or(0xA, 0xB)),
            (0x8AB2, OpCodes::And(0xA, 0xB)),
            (0x8AB3, OpCodes::XOr(0xA, 0xB)),
            (0x8AB4, OpCodes::Add(0xA, 0xB)),
            (0x8AB5, OpCodes::SubtractForward(0xA, 0xB)),
            (0x8AB6, OpCodes::RightShift(0xA, 0xB)),
            (0x8AB7, OpCodes::SubtractBackward(0xA, 0xB)),
            (0x8ABE, OpCodes::LeftShift(0xA, 0xB)),
            (0x9AB0, OpCodes::SkipNotEqualRegister(0xA, 0xB)),
            (0xA123, OpCodes::SetIndexRegister(0x123)),
            (0xB123, OpCodes::JumpWithOffset(0x123)),
            (0xCA0F, OpCodes::Random(0xA, 0x0F)),
            (0xDAB5, OpCodes::Display(0xA, 0xB, 5)),
            (0xEA9E, OpCodes::SkipIfPressed(0xA)),
            (0xEAA1, OpCodes::SkipIfNotPressed(0xA)),
            (0xFA07, OpCodes::CopyDelayToRegister(0xA)),
            (0xFA0A, OpCodes::GetKey(0xA)),
            (0xFA15, OpCodes::CopyRegisterToDelay(0xA)),
            (0xFA18, OpCodes::CopyRegisterToSound(0xA)),
            (0xFA1E, OpCodes::AddToIndex(0xA)),
            (0xFA29, OpCodes::PointChar(0xA)),
            (0xFA33, OpCodes::ToDecimal(0xA)),
            (0xFA55, OpCodes::StoreRegisterToMemory(0xA)),
            (0xFA65, OpCodes::LoadRegisterFromMemory(0xA)),
        ];
        for (word, expected) in cases {
            assert_eq!(OpCodes::decode_raw(word), Some(expected), "{word:#06x}");
        }
    }

    #[test]
    fn unknown_words_do_not_fall_into_other_families() {
        for word in [
            0x0000, 0x0123, 0x00E1, 0x5AB1, 0x8AB8, 0x8ABF, 0x9AB1, 0xEA9F, 0xFA00, 0xFAFF,
        ] {
            assert_eq!(OpCodes::decode_raw(word), None, "{word:#06x}");
        }
    }

    #[test]
    fn mnemonics() {
        assert_eq!(OpCodes::Jump(0x234).to_string(), "JP 0x234");
        assert_eq!(OpCodes::SetRegister(3, 0x1F).to_string(), "LD V3, 0x1f");
        assert_eq!(OpCodes::Display(0, 1, 5).to_string(), "DRW V0, V1, 5");
        assert_eq!(OpCodes::LoadRegisterFromMemory(0xF).to_string(), "LD VF, [I]");
    }
}
