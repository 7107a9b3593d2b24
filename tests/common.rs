use chip8vm::Emulator;

/// Builds an emulator running `program`, one opcode per word.
pub fn emu_with(program: &[u16]) -> Emulator {
    let rom: Vec<u8> = program.iter().flat_map(|w| w.to_be_bytes()).collect();
    let mut emu = Emulator::with_seed(0xC8);
    emu.load_rom(&rom).expect("test rom fits");
    emu
}

pub fn run(emu: &mut Emulator, cycles: usize) {
    for _ in 0..cycles {
        emu.run_cycle().expect("cycle failed");
    }
}
