//! 6502 processor status register (P) flag bits.
//!
//! Bit layout from LSB: C Z I D B U V N.

pub const FLAG_CARRY: u8 = 1 << 0;
pub const FLAG_ZERO: u8 = 1 << 1;
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
pub const FLAG_DECIMAL: u8 = 1 << 3; // settable on the 2A03 but never consulted
pub const FLAG_BREAK: u8 = 1 << 4;   // 1 in bytes pushed by BRK/PHP, 0 from IRQ/NMI
pub const FLAG_UNUSED: u8 = 1 << 5;  // 1 in every pushed status byte
pub const FLAG_OVERFLOW: u8 = 1 << 6;
pub const FLAG_NEGATIVE: u8 = 1 << 7;
