//! 256-entry opcode decode table.
//!
//! Laid out as the canonical 6502 opcode matrix, 16 rows of 16 cells. Each
//! cell carries the mnemonic (for trace output), the operation tag, the
//! addressing-mode tag, and the base cycle count; page-cross and branch
//! penalties are added at execution time. Undocumented cells are decoded as
//! `"???"`/[`Op::Ill`]: the operation is a no-op, but the cell keeps its
//! matrix addressing mode — so operand bytes are still consumed and PC stays
//! in sync — and its conventional cycle cost.

use self::Mode::*;
use self::Op::*;

/// Addressing-mode tag. `Imp` covers both implied and accumulator operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Imp,
    Imm,
    Zp0,
    Zpx,
    Zpy,
    Rel,
    Abs,
    Abx,
    Aby,
    Ind,
    Izx,
    Izy,
}

/// Operation tag: the 56 documented operations plus the undocumented no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    /// Undocumented opcode: no register or memory effect, but the cell's
    /// addressing mode and cycle cost still apply.
    Ill,
}

/// One decode-table cell.
#[derive(Debug, Clone, Copy)]
pub struct Instruction {
    pub mnemonic: &'static str,
    pub op: Op,
    pub mode: Mode,
    pub cycles: u8,
}

const fn ins(mnemonic: &'static str, op: Op, mode: Mode, cycles: u8) -> Instruction {
    Instruction {
        mnemonic,
        op,
        mode,
        cycles,
    }
}

const fn ill(mode: Mode, cycles: u8) -> Instruction {
    ins("???", Ill, mode, cycles)
}

#[rustfmt::skip]
pub const OPCODES: [Instruction; 256] = [
    // $00
    ins("BRK", Brk, Imp, 7), ins("ORA", Ora, Izx, 6), ill(Imp, 2), ill(Izx, 8),
    ill(Zp0, 3), ins("ORA", Ora, Zp0, 3), ins("ASL", Asl, Zp0, 5), ill(Zp0, 5),
    ins("PHP", Php, Imp, 3), ins("ORA", Ora, Imm, 2), ins("ASL", Asl, Imp, 2), ill(Imm, 2),
    ill(Abs, 4), ins("ORA", Ora, Abs, 4), ins("ASL", Asl, Abs, 6), ill(Abs, 6),
    // $10
    ins("BPL", Bpl, Rel, 2), ins("ORA", Ora, Izy, 5), ill(Imp, 2), ill(Izy, 8),
    ill(Zpx, 4), ins("ORA", Ora, Zpx, 4), ins("ASL", Asl, Zpx, 6), ill(Zpx, 6),
    ins("CLC", Clc, Imp, 2), ins("ORA", Ora, Aby, 4), ill(Imp, 2), ill(Aby, 7),
    ill(Abx, 4), ins("ORA", Ora, Abx, 4), ins("ASL", Asl, Abx, 7), ill(Abx, 7),
    // $20
    ins("JSR", Jsr, Abs, 6), ins("AND", And, Izx, 6), ill(Imp, 2), ill(Izx, 8),
    ins("BIT", Bit, Zp0, 3), ins("AND", And, Zp0, 3), ins("ROL", Rol, Zp0, 5), ill(Zp0, 5),
    ins("PLP", Plp, Imp, 4), ins("AND", And, Imm, 2), ins("ROL", Rol, Imp, 2), ill(Imm, 2),
    ins("BIT", Bit, Abs, 4), ins("AND", And, Abs, 4), ins("ROL", Rol, Abs, 6), ill(Abs, 6),
    // $30
    ins("BMI", Bmi, Rel, 2), ins("AND", And, Izy, 5), ill(Imp, 2), ill(Izy, 8),
    ill(Zpx, 4), ins("AND", And, Zpx, 4), ins("ROL", Rol, Zpx, 6), ill(Zpx, 6),
    ins("SEC", Sec, Imp, 2), ins("AND", And, Aby, 4), ill(Imp, 2), ill(Aby, 7),
    ill(Abx, 4), ins("AND", And, Abx, 4), ins("ROL", Rol, Abx, 7), ill(Abx, 7),
    // $40
    ins("RTI", Rti, Imp, 6), ins("EOR", Eor, Izx, 6), ill(Imp, 2), ill(Izx, 8),
    ill(Zp0, 3), ins("EOR", Eor, Zp0, 3), ins("LSR", Lsr, Zp0, 5), ill(Zp0, 5),
    ins("PHA", Pha, Imp, 3), ins("EOR", Eor, Imm, 2), ins("LSR", Lsr, Imp, 2), ill(Imm, 2),
    ins("JMP", Jmp, Abs, 3), ins("EOR", Eor, Abs, 4), ins("LSR", Lsr, Abs, 6), ill(Abs, 6),
    // $50
    ins("BVC", Bvc, Rel, 2), ins("EOR", Eor, Izy, 5), ill(Imp, 2), ill(Izy, 8),
    ill(Zpx, 4), ins("EOR", Eor, Zpx, 4), ins("LSR", Lsr, Zpx, 6), ill(Zpx, 6),
    ins("CLI", Cli, Imp, 2), ins("EOR", Eor, Aby, 4), ill(Imp, 2), ill(Aby, 7),
    ill(Abx, 4), ins("EOR", Eor, Abx, 4), ins("LSR", Lsr, Abx, 7), ill(Abx, 7),
    // $60
    ins("RTS", Rts, Imp, 6), ins("ADC", Adc, Izx, 6), ill(Imp, 2), ill(Izx, 8),
    ill(Zp0, 3), ins("ADC", Adc, Zp0, 3), ins("ROR", Ror, Zp0, 5), ill(Zp0, 5),
    ins("PLA", Pla, Imp, 4), ins("ADC", Adc, Imm, 2), ins("ROR", Ror, Imp, 2), ill(Imm, 2),
    ins("JMP", Jmp, Ind, 5), ins("ADC", Adc, Abs, 4), ins("ROR", Ror, Abs, 6), ill(Abs, 6),
    // $70
    ins("BVS", Bvs, Rel, 2), ins("ADC", Adc, Izy, 5), ill(Imp, 2), ill(Izy, 8),
    ill(Zpx, 4), ins("ADC", Adc, Zpx, 4), ins("ROR", Ror, Zpx, 6), ill(Zpx, 6),
    ins("SEI", Sei, Imp, 2), ins("ADC", Adc, Aby, 4), ill(Imp, 2), ill(Aby, 7),
    ill(Abx, 4), ins("ADC", Adc, Abx, 4), ins("ROR", Ror, Abx, 7), ill(Abx, 7),
    // $80
    ill(Imm, 2), ins("STA", Sta, Izx, 6), ill(Imm, 2), ill(Izx, 6),
    ins("STY", Sty, Zp0, 3), ins("STA", Sta, Zp0, 3), ins("STX", Stx, Zp0, 3), ill(Zp0, 3),
    ins("DEY", Dey, Imp, 2), ill(Imm, 2), ins("TXA", Txa, Imp, 2), ill(Imm, 2),
    ins("STY", Sty, Abs, 4), ins("STA", Sta, Abs, 4), ins("STX", Stx, Abs, 4), ill(Abs, 4),
    // $90
    ins("BCC", Bcc, Rel, 2), ins("STA", Sta, Izy, 6), ill(Imp, 2), ill(Izy, 6),
    ins("STY", Sty, Zpx, 4), ins("STA", Sta, Zpx, 4), ins("STX", Stx, Zpy, 4), ill(Zpy, 4),
    ins("TYA", Tya, Imp, 2), ins("STA", Sta, Aby, 5), ins("TXS", Txs, Imp, 2), ill(Aby, 5),
    ill(Abx, 5), ins("STA", Sta, Abx, 5), ill(Aby, 5), ill(Aby, 5),
    // $A0
    ins("LDY", Ldy, Imm, 2), ins("LDA", Lda, Izx, 6), ins("LDX", Ldx, Imm, 2), ill(Izx, 6),
    ins("LDY", Ldy, Zp0, 3), ins("LDA", Lda, Zp0, 3), ins("LDX", Ldx, Zp0, 3), ill(Zp0, 3),
    ins("TAY", Tay, Imp, 2), ins("LDA", Lda, Imm, 2), ins("TAX", Tax, Imp, 2), ill(Imm, 2),
    ins("LDY", Ldy, Abs, 4), ins("LDA", Lda, Abs, 4), ins("LDX", Ldx, Abs, 4), ill(Abs, 4),
    // $B0
    ins("BCS", Bcs, Rel, 2), ins("LDA", Lda, Izy, 5), ill(Imp, 2), ill(Izy, 5),
    ins("LDY", Ldy, Zpx, 4), ins("LDA", Lda, Zpx, 4), ins("LDX", Ldx, Zpy, 4), ill(Zpy, 4),
    ins("CLV", Clv, Imp, 2), ins("LDA", Lda, Aby, 4), ins("TSX", Tsx, Imp, 2), ill(Aby, 4),
    ins("LDY", Ldy, Abx, 4), ins("LDA", Lda, Abx, 4), ins("LDX", Ldx, Aby, 4), ill(Aby, 4),
    // $C0
    ins("CPY", Cpy, Imm, 2), ins("CMP", Cmp, Izx, 6), ill(Imm, 2), ill(Izx, 8),
    ins("CPY", Cpy, Zp0, 3), ins("CMP", Cmp, Zp0, 3), ins("DEC", Dec, Zp0, 5), ill(Zp0, 5),
    ins("INY", Iny, Imp, 2), ins("CMP", Cmp, Imm, 2), ins("DEX", Dex, Imp, 2), ill(Imm, 2),
    ins("CPY", Cpy, Abs, 4), ins("CMP", Cmp, Abs, 4), ins("DEC", Dec, Abs, 6), ill(Abs, 6),
    // $D0
    ins("BNE", Bne, Rel, 2), ins("CMP", Cmp, Izy, 5), ill(Imp, 2), ill(Izy, 8),
    ill(Zpx, 4), ins("CMP", Cmp, Zpx, 4), ins("DEC", Dec, Zpx, 6), ill(Zpx, 6),
    ins("CLD", Cld, Imp, 2), ins("CMP", Cmp, Aby, 4), ill(Imp, 2), ill(Aby, 7),
    ill(Abx, 4), ins("CMP", Cmp, Abx, 4), ins("DEC", Dec, Abx, 7), ill(Abx, 7),
    // $E0
    ins("CPX", Cpx, Imm, 2), ins("SBC", Sbc, Izx, 6), ill(Imm, 2), ill(Izx, 8),
    ins("CPX", Cpx, Zp0, 3), ins("SBC", Sbc, Zp0, 3), ins("INC", Inc, Zp0, 5), ill(Zp0, 5),
    ins("INX", Inx, Imp, 2), ins("SBC", Sbc, Imm, 2), ins("NOP", Nop, Imp, 2), ill(Imm, 2),
    ins("CPX", Cpx, Abs, 4), ins("SBC", Sbc, Abs, 4), ins("INC", Inc, Abs, 6), ill(Abs, 6),
    // $F0
    ins("BEQ", Beq, Rel, 2), ins("SBC", Sbc, Izy, 5), ill(Imp, 2), ill(Izy, 8),
    ill(Zpx, 4), ins("SBC", Sbc, Zpx, 4), ins("INC", Inc, Zpx, 6), ill(Zpx, 6),
    ins("SED", Sed, Imp, 2), ins("SBC", Sbc, Aby, 4), ill(Imp, 2), ill(Aby, 7),
    ill(Abx, 4), ins("SBC", Sbc, Abx, 4), ins("INC", Inc, Abx, 7), ill(Abx, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cell_has_a_cycle_cost() {
        for (opcode, entry) in OPCODES.iter().enumerate() {
            assert!(entry.cycles > 0, "opcode ${opcode:02X} has no cycle cost");
        }
    }

    #[test]
    fn documented_count_matches_the_6502_matrix() {
        let documented = OPCODES.iter().filter(|e| !matches!(e.op, Op::Ill)).count();
        assert_eq!(documented, 151);
    }

    #[test]
    fn spot_check_well_known_cells() {
        assert_eq!(OPCODES[0xA9].mnemonic, "LDA");
        assert!(matches!(OPCODES[0xA9].mode, Mode::Imm));
        assert_eq!(OPCODES[0xA9].cycles, 2);

        assert_eq!(OPCODES[0x6C].mnemonic, "JMP");
        assert!(matches!(OPCODES[0x6C].mode, Mode::Ind));
        assert_eq!(OPCODES[0x6C].cycles, 5);

        assert_eq!(OPCODES[0x00].mnemonic, "BRK");
        assert_eq!(OPCODES[0x00].cycles, 7);
    }

    #[test]
    fn illegal_cells_keep_their_matrix_addressing_modes() {
        // Operand bytes must still be consumed for undocumented opcodes, so
        // each cell carries the matrix mode even though the op is a no-op.
        assert!(matches!(OPCODES[0x03].mode, Mode::Izx)); // SLO (d,X)
        assert!(matches!(OPCODES[0x04].mode, Mode::Zp0)); // NOP d
        assert!(matches!(OPCODES[0x0C].mode, Mode::Abs)); // NOP a
        assert!(matches!(OPCODES[0x1C].mode, Mode::Abx)); // NOP a,X
        assert!(matches!(OPCODES[0x80].mode, Mode::Imm)); // NOP #i
        assert!(matches!(OPCODES[0x97].mode, Mode::Zpy)); // SAX d,Y
        assert!(matches!(OPCODES[0xB3].mode, Mode::Izy)); // LAX (d),Y
        assert!(matches!(OPCODES[0xFB].mode, Mode::Aby)); // ISC a,Y
        assert!(matches!(OPCODES[0x02].mode, Mode::Imp)); // JAM has no operand
        for opcode in [0x03, 0x04, 0x0C, 0x1C, 0x80, 0x97, 0xB3, 0xFB, 0x02] {
            assert!(matches!(OPCODES[opcode].op, Op::Ill));
        }
    }
}
