// Separately:
// CPU: one instruction per cycle, --hz cycles per second
// Timers: decay once per cycle
// Display: redrawn only on cycles that changed the framebuffer

use std::fs;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::LevelFilter;

use chip8vm::Emulator;
use frontend::{config::Config, sound::Sound, window::Screen};

mod frontend;

// keep the window responsive even when nothing is drawn
const POLL_INTERVAL: Duration = Duration::from_micros(16_600);

fn init_logging(config: &Config) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    if config.trace {
        builder.filter_module("chip8vm", LevelFilter::Trace);
    }
    builder.init();
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_logging(&config);

    let rom = fs::read(&config.rom)
        .with_context(|| format!("failed to read rom {}", config.rom.display()))?;
    let mut emu = Emulator::new();
    emu.load_rom(&rom)
        .with_context(|| format!("failed to load rom {}", config.rom.display()))?;
    log::info!("running {} at {} Hz", config.rom.display(), config.hz);

    let mut screen = Screen::new(config.scale.into())?;
    let mut sound = if config.mute {
        None
    } else {
        match Sound::new() {
            Ok(sound) => Some(sound),
            Err(e) => {
                log::warn!("sound disabled: {e:#}");
                None
            }
        }
    };

    let tick = Duration::from_secs_f64(1.0 / config.hz as f64);
    let mut next_tick = Instant::now();
    let mut last_poll = Instant::now();

    while screen.is_open() {
        if screen.reset_requested() {
            emu.reset();
            emu.load_rom(&rom)?;
        }
        emu.set_keys(screen.keypad());

        match emu.run_cycle() {
            Ok(_) => {}
            Err(e) if !e.is_fatal() && !config.halt_on_unknown => {}
            Err(e) => return Err(e).context(format!("halted at {:#05x}", emu.pc())),
        }

        if emu.redraw_needed() {
            screen.draw(emu.framebuffer())?;
            last_poll = Instant::now();
        } else if last_poll.elapsed() >= POLL_INTERVAL {
            screen.poll();
            last_poll = Instant::now();
        }
        if let Some(sound) = sound.as_mut() {
            sound.set_active(emu.sound_needed())?;
        }

        next_tick += tick;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            // running behind; don't try to catch up in a burst
            next_tick = now;
        }
    }

    Ok(())
}
