// 6502 opcode table: mnemonic, addressing mode, instruction length, and
// base cycle cost for all 256 opcode bytes. This is the single source of
// truth `execute.rs` and the disassembler dispatch against.
//
// Unofficial opcodes are not implemented as distinct instructions; they are
// tabulated as a 1-byte, 2-cycle no-op so `step()` still advances the PC and
// cycle count correctly when one is encountered in the wild.

use crate::cpu::addressing::AddressingMode;

#[derive(Debug, Clone, Copy)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub mode: AddressingMode,
    pub bytes: u8,
    pub cycles: u8,
    /// Whether crossing a page boundary while computing the effective
    /// address adds one extra cycle.
    pub page_cycle: bool,
}

const fn op(
    mnemonic: &'static str,
    mode: AddressingMode,
    bytes: u8,
    cycles: u8,
    page_cycle: bool,
) -> OpcodeInfo {
    OpcodeInfo {
        mnemonic,
        mode,
        bytes,
        cycles,
        page_cycle,
    }
}

const UNOFFICIAL: OpcodeInfo = op("NOP", AddressingMode::Implied, 1, 2, false);

use AddressingMode::*;

pub static OPCODE_TABLE: [OpcodeInfo; 256] = [
    // 0x00
    op("BRK", Implied, 1, 7, false),
    op("ORA", IndexedIndirect, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("ORA", ZeroPage, 2, 3, false),
    op("ASL", ZeroPage, 2, 5, false),
    UNOFFICIAL,
    op("PHP", Implied, 1, 3, false),
    op("ORA", Immediate, 2, 2, false),
    op("ASL", Accumulator, 1, 2, false),
    UNOFFICIAL,
    UNOFFICIAL,
    op("ORA", Absolute, 3, 4, false),
    op("ASL", Absolute, 3, 6, false),
    UNOFFICIAL,
    // 0x10
    op("BPL", Relative, 2, 2, true),
    op("ORA", IndirectIndexed, 2, 5, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("ORA", ZeroPageX, 2, 4, false),
    op("ASL", ZeroPageX, 2, 6, false),
    UNOFFICIAL,
    op("CLC", Implied, 1, 2, false),
    op("ORA", AbsoluteY, 3, 4, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("ORA", AbsoluteX, 3, 4, true),
    op("ASL", AbsoluteX, 3, 7, false),
    UNOFFICIAL,
    // 0x20
    op("JSR", Absolute, 3, 6, false),
    op("AND", IndexedIndirect, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    op("BIT", ZeroPage, 2, 3, false),
    op("AND", ZeroPage, 2, 3, false),
    op("ROL", ZeroPage, 2, 5, false),
    UNOFFICIAL,
    op("PLP", Implied, 1, 4, false),
    op("AND", Immediate, 2, 2, false),
    op("ROL", Accumulator, 1, 2, false),
    UNOFFICIAL,
    op("BIT", Absolute, 3, 4, false),
    op("AND", Absolute, 3, 4, false),
    op("ROL", Absolute, 3, 6, false),
    UNOFFICIAL,
    // 0x30
    op("BMI", Relative, 2, 2, true),
    op("AND", IndirectIndexed, 2, 5, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("AND", ZeroPageX, 2, 4, false),
    op("ROL", ZeroPageX, 2, 6, false),
    UNOFFICIAL,
    op("SEC", Implied, 1, 2, false),
    op("AND", AbsoluteY, 3, 4, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("AND", AbsoluteX, 3, 4, true),
    op("ROL", AbsoluteX, 3, 7, false),
    UNOFFICIAL,
    // 0x40
    op("RTI", Implied, 1, 6, false),
    op("EOR", IndexedIndirect, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("EOR", ZeroPage, 2, 3, false),
    op("LSR", ZeroPage, 2, 5, false),
    UNOFFICIAL,
    op("PHA", Implied, 1, 3, false),
    op("EOR", Immediate, 2, 2, false),
    op("LSR", Accumulator, 1, 2, false),
    UNOFFICIAL,
    op("JMP", Absolute, 3, 3, false),
    op("EOR", Absolute, 3, 4, false),
    op("LSR", Absolute, 3, 6, false),
    UNOFFICIAL,
    // 0x50
    op("BVC", Relative, 2, 2, true),
    op("EOR", IndirectIndexed, 2, 5, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("EOR", ZeroPageX, 2, 4, false),
    op("LSR", ZeroPageX, 2, 6, false),
    UNOFFICIAL,
    op("CLI", Implied, 1, 2, false),
    op("EOR", AbsoluteY, 3, 4, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("EOR", AbsoluteX, 3, 4, true),
    op("LSR", AbsoluteX, 3, 7, false),
    UNOFFICIAL,
    // 0x60
    op("RTS", Implied, 1, 6, false),
    op("ADC", IndexedIndirect, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("ADC", ZeroPage, 2, 3, false),
    op("ROR", ZeroPage, 2, 5, false),
    UNOFFICIAL,
    op("PLA", Implied, 1, 4, false),
    op("ADC", Immediate, 2, 2, false),
    op("ROR", Accumulator, 1, 2, false),
    UNOFFICIAL,
    op("JMP", Indirect, 3, 5, false),
    op("ADC", Absolute, 3, 4, false),
    op("ROR", Absolute, 3, 6, false),
    UNOFFICIAL,
    // 0x70
    op("BVS", Relative, 2, 2, true),
    op("ADC", IndirectIndexed, 2, 5, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("ADC", ZeroPageX, 2, 4, false),
    op("ROR", ZeroPageX, 2, 6, false),
    UNOFFICIAL,
    op("SEI", Implied, 1, 2, false),
    op("ADC", AbsoluteY, 3, 4, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("ADC", AbsoluteX, 3, 4, true),
    op("ROR", AbsoluteX, 3, 7, false),
    UNOFFICIAL,
    // 0x80
    UNOFFICIAL,
    op("STA", IndexedIndirect, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    op("STY", ZeroPage, 2, 3, false),
    op("STA", ZeroPage, 2, 3, false),
    op("STX", ZeroPage, 2, 3, false),
    UNOFFICIAL,
    op("DEY", Implied, 1, 2, false),
    UNOFFICIAL,
    op("TXA", Implied, 1, 2, false),
    UNOFFICIAL,
    op("STY", Absolute, 3, 4, false),
    op("STA", Absolute, 3, 4, false),
    op("STX", Absolute, 3, 4, false),
    UNOFFICIAL,
    // 0x90
    op("BCC", Relative, 2, 2, true),
    op("STA", IndirectIndexed, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    op("STY", ZeroPageX, 2, 4, false),
    op("STA", ZeroPageX, 2, 4, false),
    op("STX", ZeroPageY, 2, 4, false),
    UNOFFICIAL,
    op("TYA", Implied, 1, 2, false),
    op("STA", AbsoluteY, 3, 5, false),
    op("TXS", Implied, 1, 2, false),
    UNOFFICIAL,
    UNOFFICIAL,
    op("STA", AbsoluteX, 3, 5, false),
    UNOFFICIAL,
    UNOFFICIAL,
    // 0xA0
    op("LDY", Immediate, 2, 2, false),
    op("LDA", IndexedIndirect, 2, 6, false),
    op("LDX", Immediate, 2, 2, false),
    UNOFFICIAL,
    op("LDY", ZeroPage, 2, 3, false),
    op("LDA", ZeroPage, 2, 3, false),
    op("LDX", ZeroPage, 2, 3, false),
    UNOFFICIAL,
    op("TAY", Implied, 1, 2, false),
    op("LDA", Immediate, 2, 2, false),
    op("TAX", Implied, 1, 2, false),
    UNOFFICIAL,
    op("LDY", Absolute, 3, 4, false),
    op("LDA", Absolute, 3, 4, false),
    op("LDX", Absolute, 3, 4, false),
    UNOFFICIAL,
    // 0xB0
    op("BCS", Relative, 2, 2, true),
    op("LDA", IndirectIndexed, 2, 5, true),
    UNOFFICIAL,
    UNOFFICIAL,
    op("LDY", ZeroPageX, 2, 4, false),
    op("LDA", ZeroPageX, 2, 4, false),
    op("LDX", ZeroPageY, 2, 4, false),
    UNOFFICIAL,
    op("CLV", Implied, 1, 2, false),
    op("LDA", AbsoluteY, 3, 4, true),
    op("TSX", Implied, 1, 2, false),
    UNOFFICIAL,
    op("LDY", AbsoluteX, 3, 4, true),
    op("LDA", AbsoluteX, 3, 4, true),
    op("LDX", AbsoluteY, 3, 4, true),
    UNOFFICIAL,
    // 0xC0
    op("CPY", Immediate, 2, 2, false),
    op("CMP", IndexedIndirect, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    op("CPY", ZeroPage, 2, 3, false),
    op("CMP", ZeroPage, 2, 3, false),
    op("DEC", ZeroPage, 2, 5, false),
    UNOFFICIAL,
    op("INY", Implied, 1, 2, false),
    op("CMP", Immediate, 2, 2, false),
    op("DEX", Implied, 1, 2, false),
    UNOFFICIAL,
    op("CPY", Absolute, 3, 4, false),
    op("CMP", Absolute, 3, 4, false),
    op("DEC", Absolute, 3, 6, false),
    UNOFFICIAL,
    // 0xD0
    op("BNE", Relative, 2, 2, true),
    op("CMP", IndirectIndexed, 2, 5, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("CMP", ZeroPageX, 2, 4, false),
    op("DEC", ZeroPageX, 2, 6, false),
    UNOFFICIAL,
    op("CLD", Implied, 1, 2, false),
    op("CMP", AbsoluteY, 3, 4, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("CMP", AbsoluteX, 3, 4, true),
    op("DEC", AbsoluteX, 3, 7, false),
    UNOFFICIAL,
    // 0xE0
    op("CPX", Immediate, 2, 2, false),
    op("SBC", IndexedIndirect, 2, 6, false),
    UNOFFICIAL,
    UNOFFICIAL,
    op("CPX", ZeroPage, 2, 3, false),
    op("SBC", ZeroPage, 2, 3, false),
    op("INC", ZeroPage, 2, 5, false),
    UNOFFICIAL,
    op("INX", Implied, 1, 2, false),
    op("SBC", Immediate, 2, 2, false),
    op("NOP", Implied, 1, 2, false),
    UNOFFICIAL,
    op("CPX", Absolute, 3, 4, false),
    op("SBC", Absolute, 3, 4, false),
    op("INC", Absolute, 3, 6, false),
    UNOFFICIAL,
    // 0xF0
    op("BEQ", Relative, 2, 2, true),
    op("SBC", IndirectIndexed, 2, 5, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("SBC", ZeroPageX, 2, 4, false),
    op("INC", ZeroPageX, 2, 6, false),
    UNOFFICIAL,
    op("SED", Implied, 1, 2, false),
    op("SBC", AbsoluteY, 3, 4, true),
    UNOFFICIAL,
    UNOFFICIAL,
    UNOFFICIAL,
    op("SBC", AbsoluteX, 3, 4, true),
    op("INC", AbsoluteX, 3, 7, false),
    UNOFFICIAL,
];
