//! Cycle-stepped 6502 core.
//!
//! `step()` models one CPU clock tick. The first tick of an instruction does
//! the whole fetch/decode/execute and loads a countdown of the instruction's
//! cycle cost; the remaining ticks only decrement the countdown. Bus traffic
//! is therefore batched into the first tick (instruction-accurate with
//! cycle-counted duration), which is what a master-clock host needs to
//! interleave the CPU with the rest of the machine.

use crate::bus::Bus;
use crate::cpu::flags::{
    FLAG_BREAK, FLAG_CARRY, FLAG_DECIMAL, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE, FLAG_OVERFLOW,
    FLAG_UNUSED, FLAG_ZERO,
};
use crate::cpu::table::{Mode, Op, OPCODES};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

pub struct Cpu<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    /// Total ticks consumed since reset.
    pub cycles: u64,
    pub bus: B,

    // Per-instruction transient state, recomputed at each instruction
    // boundary. Addressing modes and operations communicate through these
    // fields rather than threading them as parameters.
    opcode: u8,
    mode: Mode,
    addr_abs: u16,
    addr_rel: u16,
    fetched: u8,
    page_crossed: bool,
    cycles_remaining: u8,

    // Interrupt lines latched by the host, serviced at the next instruction
    // boundary.
    irq_pending: bool,
    nmi_pending: bool,
}

impl<B: Bus> Cpu<B> {
    /// A freshly constructed CPU is inert; call [`Cpu::reset`] to load PC from
    /// the reset vector before stepping.
    pub fn new(bus: B) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            pc: 0,
            status: 0,
            cycles: 0,
            bus,
            opcode: 0,
            mode: Mode::Imp,
            addr_abs: 0,
            addr_rel: 0,
            fetched: 0,
            page_crossed: false,
            cycles_remaining: 0,
            irq_pending: false,
            nmi_pending: false,
        }
    }

    /// Reset sequence: registers cleared, SP at $FD, I and U set, PC loaded
    /// from $FFFC/$FFFD. Takes 8 ticks before the first instruction runs.
    pub fn reset(&mut self) {
        self.pc = self.read_word(RESET_VECTOR);

        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.status = FLAG_INTERRUPT_DISABLE | FLAG_UNUSED;

        self.opcode = 0;
        self.mode = Mode::Imp;
        self.addr_abs = 0;
        self.addr_rel = 0;
        self.fetched = 0;
        self.page_crossed = false;
        self.irq_pending = false;
        self.nmi_pending = false;

        self.cycles_remaining = 8;
        self.cycles = 0;
    }

    /// Latch a maskable interrupt request. Serviced at the next instruction
    /// boundary unless I is set there, in which case the request is dropped.
    pub fn irq(&mut self) {
        self.irq_pending = true;
    }

    /// Latch a non-maskable interrupt request. Always serviced at the next
    /// instruction boundary.
    pub fn nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Advance one CPU clock tick.
    pub fn step(&mut self) {
        if self.cycles_remaining == 0 {
            if self.nmi_pending {
                self.nmi_pending = false;
                self.service_interrupt(NMI_VECTOR);
            } else if self.irq_pending {
                self.irq_pending = false;
                if self.status & FLAG_INTERRUPT_DISABLE == 0 {
                    self.service_interrupt(IRQ_VECTOR);
                } else {
                    self.begin_instruction();
                }
            } else {
                self.begin_instruction();
            }
        }

        self.cycles_remaining -= 1;
        self.cycles += 1;
    }

    /// True at an instruction boundary: the next `step()` begins a new
    /// instruction (or services a latched interrupt).
    pub fn instruction_complete(&self) -> bool {
        self.cycles_remaining == 0
    }

    pub fn flag(&self, mask: u8) -> bool {
        self.status & mask != 0
    }

    /// One nestest-style line for the instruction about to execute.
    pub fn trace_line(&mut self) -> String {
        let opcode = self.bus.read(self.pc);
        let entry = OPCODES[opcode as usize];
        format!(
            "{:04X}  {:02X}  {:>3}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            self.pc, opcode, entry.mnemonic, self.a, self.x, self.y, self.status, self.sp,
            self.cycles
        )
    }

    fn begin_instruction(&mut self) {
        self.addr_abs = 0;
        self.addr_rel = 0;
        self.fetched = 0;
        self.page_crossed = false;

        self.opcode = self.fetch_byte();
        let entry = OPCODES[self.opcode as usize];
        debug_assert!(entry.cycles > 0, "opcode ${:02X} decoded to 0 cycles", self.opcode);
        self.mode = entry.mode;
        self.cycles_remaining = entry.cycles;

        let mode_extra = self.resolve(entry.mode);
        let op_extra = self.execute(entry.op);
        // The page-cross penalty applies only when the operation is eligible
        // for it; branches account for their own penalties directly.
        if mode_extra && op_extra {
            self.cycles_remaining += 1;
        }
    }

    fn service_interrupt(&mut self, vector: u16) {
        self.push((self.pc >> 8) as u8);
        self.push((self.pc & 0x00FF) as u8);

        // Hardware interrupts push B clear; BRK is the only source that
        // pushes it set.
        self.push((self.status & !FLAG_BREAK) | FLAG_UNUSED);

        self.status |= FLAG_INTERRUPT_DISABLE;
        self.pc = self.read_word(vector);
        self.cycles_remaining = 7;
    }

    fn fetch_byte(&mut self) -> u8 {
        let byte = self.bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        byte
    }

    fn fetch_word(&mut self) -> u16 {
        let lo = self.fetch_byte() as u16;
        let hi = self.fetch_byte() as u16;
        (hi << 8) | lo
    }

    fn read_word(&mut self, addr: u16) -> u16 {
        let lo = self.bus.read(addr) as u16;
        let hi = self.bus.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    fn set_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.status |= mask;
        } else {
            self.status &= !mask;
        }
    }

    fn update_zero_and_negative_flags(&mut self, value: u8) {
        self.set_flag(FLAG_ZERO, value == 0);
        self.set_flag(FLAG_NEGATIVE, value & 0x80 != 0);
    }

    // ---- stack, fixed at $0100–$01FF ----

    fn push(&mut self, value: u8) {
        self.bus.write(0x0100 | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.bus.read(0x0100 | self.sp as u16)
    }

    // ---- addressing-mode resolution ----

    /// Consume operand bytes and compute the effective address. Returns true
    /// when the resolution crossed a page and may cost an extra cycle.
    fn resolve(&mut self, mode: Mode) -> bool {
        match mode {
            Mode::Imp => {
                self.fetched = self.a;
                false
            }
            Mode::Imm => {
                self.addr_abs = self.pc;
                self.pc = self.pc.wrapping_add(1);
                false
            }
            Mode::Zp0 => {
                self.addr_abs = self.fetch_byte() as u16;
                false
            }
            Mode::Zpx => {
                self.addr_abs = self.fetch_byte().wrapping_add(self.x) as u16;
                false
            }
            Mode::Zpy => {
                self.addr_abs = self.fetch_byte().wrapping_add(self.y) as u16;
                false
            }
            Mode::Rel => {
                self.addr_rel = self.fetch_byte() as i8 as u16; // sign-extended
                false
            }
            Mode::Abs => {
                self.addr_abs = self.fetch_word();
                false
            }
            Mode::Abx => {
                let base = self.fetch_word();
                self.addr_abs = base.wrapping_add(self.x as u16);
                self.page_crossed = base & 0xFF00 != self.addr_abs & 0xFF00;
                self.page_crossed
            }
            Mode::Aby => {
                let base = self.fetch_word();
                self.addr_abs = base.wrapping_add(self.y as u16);
                self.page_crossed = base & 0xFF00 != self.addr_abs & 0xFF00;
                self.page_crossed
            }
            Mode::Ind => {
                let ptr = self.fetch_word();
                let lo = self.bus.read(ptr) as u16;
                // Hardware bug: the pointer's high byte read never carries
                // into the next page.
                let hi = if ptr & 0x00FF == 0x00FF {
                    self.bus.read(ptr & 0xFF00) as u16
                } else {
                    self.bus.read(ptr.wrapping_add(1)) as u16
                };
                self.addr_abs = (hi << 8) | lo;
                false
            }
            Mode::Izx => {
                let zp = self.fetch_byte().wrapping_add(self.x);
                let lo = self.bus.read(zp as u16) as u16;
                let hi = self.bus.read(zp.wrapping_add(1) as u16) as u16;
                self.addr_abs = (hi << 8) | lo;
                false
            }
            Mode::Izy => {
                let zp = self.fetch_byte();
                let lo = self.bus.read(zp as u16) as u16;
                let hi = self.bus.read(zp.wrapping_add(1) as u16) as u16;
                let base = (hi << 8) | lo;
                self.addr_abs = base.wrapping_add(self.y as u16);
                self.page_crossed = base & 0xFF00 != self.addr_abs & 0xFF00;
                self.page_crossed
            }
        }
    }

    /// Load the operand byte for the current instruction. Implied/accumulator
    /// instructions operate on A directly; everything else reads through the
    /// bus at the effective address.
    fn fetch_operand(&mut self) -> u8 {
        if self.mode != Mode::Imp {
            self.fetched = self.bus.read(self.addr_abs);
        }
        self.fetched
    }

    /// Shift/rotate results go back to A in accumulator mode, otherwise to
    /// the effective address.
    fn store_shift_result(&mut self, value: u8) {
        if self.mode == Mode::Imp {
            self.a = value;
        } else {
            self.bus.write(self.addr_abs, value);
        }
    }

    // ---- operation dispatch ----

    /// Run the operation. Returns true when the operation is eligible for the
    /// addressing mode's page-cross penalty.
    fn execute(&mut self, op: Op) -> bool {
        match op {
            Op::Adc => self.adc(),
            Op::And => self.and(),
            Op::Asl => self.asl(),
            Op::Bcc => self.bcc(),
            Op::Bcs => self.bcs(),
            Op::Beq => self.beq(),
            Op::Bit => self.bit(),
            Op::Bmi => self.bmi(),
            Op::Bne => self.bne(),
            Op::Bpl => self.bpl(),
            Op::Brk => self.brk(),
            Op::Bvc => self.bvc(),
            Op::Bvs => self.bvs(),
            Op::Clc => self.clc(),
            Op::Cld => self.cld(),
            Op::Cli => self.cli(),
            Op::Clv => self.clv(),
            Op::Cmp => self.cmp(),
            Op::Cpx => self.cpx(),
            Op::Cpy => self.cpy(),
            Op::Dec => self.dec(),
            Op::Dex => self.dex(),
            Op::Dey => self.dey(),
            Op::Eor => self.eor(),
            Op::Inc => self.inc(),
            Op::Inx => self.inx(),
            Op::Iny => self.iny(),
            Op::Jmp => self.jmp(),
            Op::Jsr => self.jsr(),
            Op::Lda => self.lda(),
            Op::Ldx => self.ldx(),
            Op::Ldy => self.ldy(),
            Op::Lsr => self.lsr(),
            Op::Nop => false,
            Op::Ora => self.ora(),
            Op::Pha => self.pha(),
            Op::Php => self.php(),
            Op::Pla => self.pla(),
            Op::Plp => self.plp(),
            Op::Rol => self.rol(),
            Op::Ror => self.ror(),
            Op::Rti => self.rti(),
            Op::Rts => self.rts(),
            Op::Sbc => self.sbc(),
            Op::Sec => self.sec(),
            Op::Sed => self.sed(),
            Op::Sei => self.sei(),
            Op::Sta => self.sta(),
            Op::Stx => self.stx(),
            Op::Sty => self.sty(),
            Op::Tax => self.tax(),
            Op::Tay => self.tay(),
            Op::Tsx => self.tsx(),
            Op::Txa => self.txa(),
            Op::Txs => self.txs(),
            Op::Tya => self.tya(),
            Op::Ill => false,
        }
    }

    // ---- loads and stores ----

    fn lda(&mut self) -> bool {
        self.a = self.fetch_operand();
        self.update_zero_and_negative_flags(self.a);
        true
    }

    fn ldx(&mut self) -> bool {
        self.x = self.fetch_operand();
        self.update_zero_and_negative_flags(self.x);
        true
    }

    fn ldy(&mut self) -> bool {
        self.y = self.fetch_operand();
        self.update_zero_and_negative_flags(self.y);
        true
    }

    fn sta(&mut self) -> bool {
        self.bus.write(self.addr_abs, self.a);
        false
    }

    fn stx(&mut self) -> bool {
        self.bus.write(self.addr_abs, self.x);
        false
    }

    fn sty(&mut self) -> bool {
        self.bus.write(self.addr_abs, self.y);
        false
    }

    // ---- register transfers ----

    fn tax(&mut self) -> bool {
        self.x = self.a;
        self.update_zero_and_negative_flags(self.x);
        false
    }

    fn tay(&mut self) -> bool {
        self.y = self.a;
        self.update_zero_and_negative_flags(self.y);
        false
    }

    fn tsx(&mut self) -> bool {
        self.x = self.sp;
        self.update_zero_and_negative_flags(self.x);
        false
    }

    fn txa(&mut self) -> bool {
        self.a = self.x;
        self.update_zero_and_negative_flags(self.a);
        false
    }

    // TXS is the one transfer that touches no flags.
    fn txs(&mut self) -> bool {
        self.sp = self.x;
        false
    }

    fn tya(&mut self) -> bool {
        self.a = self.y;
        self.update_zero_and_negative_flags(self.a);
        false
    }

    // ---- stack operations ----

    fn pha(&mut self) -> bool {
        self.push(self.a);
        false
    }

    fn php(&mut self) -> bool {
        self.push(self.status | FLAG_BREAK | FLAG_UNUSED);
        self.status &= !(FLAG_BREAK | FLAG_UNUSED);
        false
    }

    fn pla(&mut self) -> bool {
        self.a = self.pop();
        self.update_zero_and_negative_flags(self.a);
        false
    }

    fn plp(&mut self) -> bool {
        self.status = self.pop() | FLAG_UNUSED;
        false
    }

    // ---- logical ----

    fn and(&mut self) -> bool {
        let value = self.fetch_operand();
        self.a &= value;
        self.update_zero_and_negative_flags(self.a);
        true
    }

    fn ora(&mut self) -> bool {
        let value = self.fetch_operand();
        self.a |= value;
        self.update_zero_and_negative_flags(self.a);
        true
    }

    fn eor(&mut self) -> bool {
        let value = self.fetch_operand();
        self.a ^= value;
        self.update_zero_and_negative_flags(self.a);
        true
    }

    fn bit(&mut self) -> bool {
        let value = self.fetch_operand();
        self.set_flag(FLAG_ZERO, self.a & value == 0);
        self.set_flag(FLAG_OVERFLOW, value & 0x40 != 0);
        self.set_flag(FLAG_NEGATIVE, value & 0x80 != 0);
        false
    }

    // ---- arithmetic ----
    // Binary only: the 2A03 ignores D entirely.

    fn adc(&mut self) -> bool {
        let value = self.fetch_operand();
        let carry_in = (self.status & FLAG_CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry_in;
        let result = sum as u8;

        self.set_flag(FLAG_CARRY, sum > 0xFF);
        // Overflow iff both inputs share a sign the result doesn't.
        self.set_flag(FLAG_OVERFLOW, (!(self.a ^ value) & (self.a ^ result)) & 0x80 != 0);

        self.a = result;
        self.update_zero_and_negative_flags(self.a);
        true
    }

    fn sbc(&mut self) -> bool {
        // A - M - (1-C) == A + !M + C
        let value = self.fetch_operand() ^ 0xFF;
        let carry_in = (self.status & FLAG_CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry_in;
        let result = sum as u8;

        self.set_flag(FLAG_CARRY, sum > 0xFF);
        self.set_flag(FLAG_OVERFLOW, ((result ^ self.a) & (result ^ value)) & 0x80 != 0);

        self.a = result;
        self.update_zero_and_negative_flags(self.a);
        true
    }

    // ---- compares ----

    fn cmp(&mut self) -> bool {
        let value = self.fetch_operand();
        self.set_flag(FLAG_CARRY, self.a >= value);
        self.update_zero_and_negative_flags(self.a.wrapping_sub(value));
        true
    }

    fn cpx(&mut self) -> bool {
        let value = self.fetch_operand();
        self.set_flag(FLAG_CARRY, self.x >= value);
        self.update_zero_and_negative_flags(self.x.wrapping_sub(value));
        false
    }

    fn cpy(&mut self) -> bool {
        let value = self.fetch_operand();
        self.set_flag(FLAG_CARRY, self.y >= value);
        self.update_zero_and_negative_flags(self.y.wrapping_sub(value));
        false
    }

    // ---- increments and decrements ----

    fn inc(&mut self) -> bool {
        let result = self.fetch_operand().wrapping_add(1);
        self.bus.write(self.addr_abs, result);
        self.update_zero_and_negative_flags(result);
        false
    }

    fn dec(&mut self) -> bool {
        let result = self.fetch_operand().wrapping_sub(1);
        self.bus.write(self.addr_abs, result);
        self.update_zero_and_negative_flags(result);
        false
    }

    fn inx(&mut self) -> bool {
        self.x = self.x.wrapping_add(1);
        self.update_zero_and_negative_flags(self.x);
        false
    }

    fn iny(&mut self) -> bool {
        self.y = self.y.wrapping_add(1);
        self.update_zero_and_negative_flags(self.y);
        false
    }

    fn dex(&mut self) -> bool {
        self.x = self.x.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.x);
        false
    }

    fn dey(&mut self) -> bool {
        self.y = self.y.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.y);
        false
    }

    // ---- shifts and rotates ----

    fn asl(&mut self) -> bool {
        let value = self.fetch_operand();
        let result = value << 1;
        self.set_flag(FLAG_CARRY, value & 0x80 != 0);
        self.update_zero_and_negative_flags(result);
        self.store_shift_result(result);
        false
    }

    fn lsr(&mut self) -> bool {
        let value = self.fetch_operand();
        let result = value >> 1;
        self.set_flag(FLAG_CARRY, value & 0x01 != 0);
        self.update_zero_and_negative_flags(result);
        self.store_shift_result(result);
        false
    }

    fn rol(&mut self) -> bool {
        let value = self.fetch_operand();
        let carry_in = self.status & FLAG_CARRY;
        let result = (value << 1) | carry_in;
        self.set_flag(FLAG_CARRY, value & 0x80 != 0);
        self.update_zero_and_negative_flags(result);
        self.store_shift_result(result);
        false
    }

    fn ror(&mut self) -> bool {
        let value = self.fetch_operand();
        let carry_in = (self.status & FLAG_CARRY) << 7;
        let result = (value >> 1) | carry_in;
        self.set_flag(FLAG_CARRY, value & 0x01 != 0);
        self.update_zero_and_negative_flags(result);
        self.store_shift_result(result);
        false
    }

    // ---- branches ----
    // Taken costs one extra cycle, two when the target is on a different
    // page than the instruction following the branch.

    fn branch(&mut self, taken: bool) -> bool {
        if taken {
            self.cycles_remaining += 1;
            self.addr_abs = self.pc.wrapping_add(self.addr_rel);
            if self.addr_abs & 0xFF00 != self.pc & 0xFF00 {
                self.cycles_remaining += 1;
            }
            self.pc = self.addr_abs;
        }
        false
    }

    fn bcc(&mut self) -> bool {
        self.branch(self.status & FLAG_CARRY == 0)
    }

    fn bcs(&mut self) -> bool {
        self.branch(self.status & FLAG_CARRY != 0)
    }

    fn beq(&mut self) -> bool {
        self.branch(self.status & FLAG_ZERO != 0)
    }

    fn bne(&mut self) -> bool {
        self.branch(self.status & FLAG_ZERO == 0)
    }

    fn bmi(&mut self) -> bool {
        self.branch(self.status & FLAG_NEGATIVE != 0)
    }

    fn bpl(&mut self) -> bool {
        self.branch(self.status & FLAG_NEGATIVE == 0)
    }

    fn bvc(&mut self) -> bool {
        self.branch(self.status & FLAG_OVERFLOW == 0)
    }

    fn bvs(&mut self) -> bool {
        self.branch(self.status & FLAG_OVERFLOW != 0)
    }

    // ---- jumps and returns ----

    fn jmp(&mut self) -> bool {
        self.pc = self.addr_abs;
        false
    }

    fn jsr(&mut self) -> bool {
        let return_addr = self.pc.wrapping_sub(1);
        self.push((return_addr >> 8) as u8);
        self.push((return_addr & 0x00FF) as u8);
        self.pc = self.addr_abs;
        false
    }

    fn rts(&mut self) -> bool {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        self.pc = ((hi << 8) | lo).wrapping_add(1);
        false
    }

    fn rti(&mut self) -> bool {
        let status = self.pop();
        self.status = (status & !FLAG_BREAK) | FLAG_UNUSED;
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        self.pc = (hi << 8) | lo; // stored PC, no +1
        false
    }

    // ---- flag operations ----

    fn clc(&mut self) -> bool {
        self.set_flag(FLAG_CARRY, false);
        false
    }

    fn sec(&mut self) -> bool {
        self.set_flag(FLAG_CARRY, true);
        false
    }

    fn cli(&mut self) -> bool {
        self.set_flag(FLAG_INTERRUPT_DISABLE, false);
        false
    }

    fn sei(&mut self) -> bool {
        self.set_flag(FLAG_INTERRUPT_DISABLE, true);
        false
    }

    fn cld(&mut self) -> bool {
        self.set_flag(FLAG_DECIMAL, false);
        false
    }

    fn sed(&mut self) -> bool {
        self.set_flag(FLAG_DECIMAL, true);
        false
    }

    fn clv(&mut self) -> bool {
        self.set_flag(FLAG_OVERFLOW, false);
        false
    }

    // ---- software interrupt ----

    fn brk(&mut self) -> bool {
        // The byte after BRK is padding; the pushed return address skips it.
        self.pc = self.pc.wrapping_add(1);
        self.push((self.pc >> 8) as u8);
        self.push((self.pc & 0x00FF) as u8);

        self.status |= FLAG_INTERRUPT_DISABLE;
        self.push(self.status | FLAG_BREAK | FLAG_UNUSED);
        self.status &= !FLAG_BREAK;

        self.pc = self.read_word(IRQ_VECTOR);
        false
    }
}
