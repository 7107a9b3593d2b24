mod common;

use chip8vm::{Chip8Error, CycleFlags, Emulator};
use common::{emu_with, run};

#[test]
fn add_two_registers_end_to_end() {
    let mut emu = emu_with(&[0x6005, 0x601A, 0x8014]);
    // 601A writes V0, not V1, so V1 is still 0 when 8014 runs
    run(&mut emu, 3);
    assert_eq!(emu.registers().get(0), 0x1A);
    assert_eq!(emu.pc(), 0x206);

    let mut emu = emu_with(&[0x6005, 0x611A, 0x8014]);
    run(&mut emu, 3);
    assert_eq!(emu.registers().get(0), 0x1F);
    assert_eq!(emu.registers().flag(), 0);
    assert_eq!(emu.pc(), 0x206);
}

#[test]
fn one_instruction_per_cycle() {
    let mut emu = emu_with(&[0x7001, 0x7001, 0x7001, 0x7001]);
    for expected in 1..=4u8 {
        emu.run_cycle().unwrap();
        assert_eq!(emu.registers().get(0), expected);
    }
}

#[test]
fn sound_flag_follows_sound_timer() {
    let mut emu = emu_with(&[0x6001, 0xF018, 0x1204]);
    run(&mut emu, 1);
    // ST := 1, then decays to 0 in the same cycle
    let flags = emu.run_cycle().unwrap();
    assert_eq!(
        flags,
        CycleFlags {
            redraw: false,
            sound: true
        }
    );
    assert_eq!(emu.sound_timer(), 0);
    assert!(!emu.run_cycle().unwrap().sound);
}

#[test]
fn sixteen_nested_calls_then_overflow() {
    let program: Vec<u16> = (0..17u16).map(|i| 0x2000 | (0x202 + i * 2)).collect();
    let mut emu = emu_with(&program);
    run(&mut emu, 16);
    assert_eq!(emu.stack_depth(), 16);

    let before_pc = emu.pc();
    let err = emu.run_cycle().unwrap_err();
    assert_eq!(err, Chip8Error::StackOverflow { address: before_pc });
    assert!(err.is_fatal());
    assert_eq!(emu.pc(), before_pc);
    assert_eq!(emu.stack_depth(), 16);
}

#[test]
fn unknown_opcode_is_not_fatal() {
    let mut emu = emu_with(&[0xFFFF, 0x6107]);
    let err = emu.run_cycle().unwrap_err();
    assert!(!err.is_fatal());
    run(&mut emu, 1);
    assert_eq!(emu.registers().get(1), 7);
}

#[test]
fn rom_too_large_is_rejected() {
    let mut emu = Emulator::new();
    let err = emu.load_rom(&vec![0; 4096 - 0x200 + 1]).unwrap_err();
    assert_eq!(
        err,
        Chip8Error::RomTooLarge {
            size: 3585,
            max_size: 3584
        }
    );
    assert!(emu.memory()[0x200..].iter().all(|&b| b == 0));
}

#[test]
fn running_off_the_end_of_memory_fails() {
    let mut emu = emu_with(&[0x1FFE]);
    run(&mut emu, 1);
    // 0x0000 at 0xFFE is not an instruction; PC would move to 0x1000
    assert_eq!(
        emu.run_cycle(),
        Err(Chip8Error::AddressOutOfBounds { address: 0x1000 })
    );
    assert_eq!(emu.pc(), 0xFFE);
}

#[test]
fn error_messages() {
    assert_eq!(
        Chip8Error::UnknownOpcode {
            opcode: 0x8AB9,
            address: 0x200
        }
        .to_string(),
        "unknown opcode 0x8ab9 at 0x200"
    );
    assert_eq!(
        Chip8Error::RomTooLarge {
            size: 4000,
            max_size: 3584
        }
        .to_string(),
        "rom is too large (4000 bytes), max size is 3584 bytes"
    );
}
