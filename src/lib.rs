//! Vesper: a cycle-stepped emulator core for the NES CPU, written in Rust.
//!
//! Implements the 6502 core of the Ricoh 2A03 as documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/CPU): 151 documented opcodes across
//! 13 addressing modes, page-cross cycle penalties, the indirect JMP page-wrap
//! hardware bug, and vectored reset/[NMI](https://www.nesdev.org/wiki/NMI)/IRQ.
//! The 2A03 has no decimal mode; D is settable but never consulted.
//!
//! The CPU exposes a single-tick `step()` so a host can interleave it with the
//! rest of the machine from a master clock (on the NES, one CPU tick per three
//! master ticks).
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): `Bus`
//!   trait plus `NesBus` (2 KiB internal RAM mirror, cartridge PRG)
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) loading; NROM PRG mapping
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) core: 256-entry decode table,
//!   addressing-mode resolution, cycle stepper, interrupt latching

pub mod bus;
pub mod cartridge;
pub mod cpu;
