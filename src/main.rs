//! NES CPU harness entry point.
//!
//! Loads an iNES cartridge and drives the CPU from the master clock: the NES
//! master clock runs at three times the CPU clock, so every 3rd master tick
//! is one CPU tick (see the NESdev
//! [cycle reference chart](https://www.nesdev.org/wiki/Cycle_reference_chart)).
//! Usage: `vesper <rom.nes> [master-ticks] [--trace]`

use std::env;
use std::process;

use ansi_term::Colour::{Green, Red};

use vesper::bus::NesBus;
use vesper::cartridge::Cartridge;
use vesper::cpu::cpu::Cpu;

/// CPU clock divider: one CPU tick per three master ticks.
const MASTER_TICKS_PER_CPU_TICK: u64 = 3;

/// Default run length: ~100k CPU cycles, plenty to watch a ROM boot.
const DEFAULT_MASTER_TICKS: u64 = 300_000;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let trace = args.iter().any(|a| a == "--trace");
    let positional: Vec<&String> = args.iter().filter(|a| !a.starts_with("--")).collect();

    let Some(path) = positional.first() else {
        eprintln!(
            "{} usage: vesper <rom.nes> [master-ticks] [--trace]",
            Red.bold().paint("ERROR")
        );
        process::exit(1);
    };

    let master_ticks = match positional.get(1) {
        Some(arg) => match arg.parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("{} invalid tick count: {arg}", Red.bold().paint("ERROR"));
                process::exit(1);
            }
        },
        None => DEFAULT_MASTER_TICKS,
    };

    let cart = match Cartridge::load(path) {
        Ok(cart) => cart,
        Err(err) => {
            eprintln!("{} {err}", Red.bold().paint("ERROR"));
            process::exit(1);
        }
    };

    println!(
        "{} loaded {} ({} KiB PRG, mapper {})",
        Green.bold().paint("INFO"),
        path,
        cart.prg_rom.len() / 1024,
        cart.mapper_id
    );

    let mut cpu = Cpu::new(NesBus::new(cart));
    cpu.reset();

    // Master clock loop. The PPU would run on every tick; the CPU runs on
    // every 3rd.
    for tick in 0..master_ticks {
        if tick % MASTER_TICKS_PER_CPU_TICK == 0 {
            if trace && cpu.instruction_complete() {
                println!("{}", cpu.trace_line());
            }
            cpu.step();
        }
    }

    println!(
        "{} halted after {} CPU cycles: PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
        Green.bold().paint("INFO"),
        cpu.cycles,
        cpu.pc,
        cpu.a,
        cpu.x,
        cpu.y,
        cpu.status,
        cpu.sp
    );
}
