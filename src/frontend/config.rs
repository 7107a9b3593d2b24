use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use minifb::Scale;

pub const DEFAULT_HZ: u32 = 60;

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
pub struct Config {
    /// Path to the ROM image to run
    pub rom: PathBuf,

    /// Emulation cycles per second; each cycle runs one instruction and
    /// decays both timers once
    #[arg(long, default_value_t = DEFAULT_HZ, value_parser = clap::value_parser!(u32).range(1..))]
    pub hz: u32,

    /// Window scale factor
    #[arg(long, value_enum, default_value = "16")]
    pub scale: WindowScale,

    /// Never open an audio stream
    #[arg(long)]
    pub mute: bool,

    /// Log every executed instruction
    #[arg(long)]
    pub trace: bool,

    /// Stop at the first unknown opcode instead of skipping it
    #[arg(long)]
    pub halt_on_unknown: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowScale {
    #[value(name = "1")]
    X1,
    #[value(name = "2")]
    X2,
    #[value(name = "4")]
    X4,
    #[value(name = "8")]
    X8,
    #[value(name = "16")]
    X16,
    #[value(name = "32")]
    X32,
}

impl From<WindowScale> for Scale {
    fn from(scale: WindowScale) -> Self {
        match scale {
            WindowScale::X1 => Scale::X1,
            WindowScale::X2 => Scale::X2,
            WindowScale::X4 => Scale::X4,
            WindowScale::X8 => Scale::X8,
            WindowScale::X16 => Scale::X16,
            WindowScale::X32 => Scale::X32,
        }
    }
}
