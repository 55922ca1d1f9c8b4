use log::debug;

use crate::errors::NesError;
use crate::processor::instruction::{
    AddressingMode, Instruction, InstructionKind, MiscInstructionKind, Opcode,
};
use crate::processor::registers::Registers;
use crate::processor::status_register::{StatusRegister, StatusRegisterFlag};
use crate::settings::OpcodeFidelity;
use crate::utils;

use InstructionKind::*;
use MiscInstructionKind::*;
use StatusRegisterFlag::*;

macro_rules! op {
    ($opcode:expr, $name:expr, $kind:expr, $mode:ident, $cycles:expr) => {
        Instruction::new($opcode, $name, $kind, AddressingMode::$mode, $cycles)
    };
}

/// Decoding table covering the whole opcode space
pub struct InstructionSet {
    instructions: Vec<Instruction>,
}

impl InstructionSet {
    /// Build the table for a fidelity level. Documented opcodes are always
    /// present, undocumented ones are adapted to `fidelity`
    pub fn new(fidelity: OpcodeFidelity) -> Result<Self, NesError> {
        let undocumented = undocumented_opcodes()
            .into_iter()
            .map(|instruction| with_fidelity(instruction, fidelity));

        Self::from_instructions(documented_opcodes().into_iter().chain(undocumented))
    }

    /// Build a table from a list of instructions. The list must define every
    /// opcode exactly once
    pub fn from_instructions(
        instructions: impl IntoIterator<Item = Instruction>,
    ) -> Result<Self, NesError> {
        let mut table: Vec<Option<Instruction>> = vec![None; 256];

        for instruction in instructions {
            let slot = &mut table[instruction.opcode as usize];
            if slot.is_some() {
                return Err(NesError::DuplicateOpcode {
                    opcode: instruction.opcode,
                });
            }
            *slot = Some(instruction);
        }

        let instructions = table
            .into_iter()
            .enumerate()
            .map(|(opcode, slot)| {
                slot.ok_or(NesError::IncompleteOpcodeTable {
                    opcode: opcode as u8,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { instructions })
    }

    pub fn lookup(&self, opcode: Opcode) -> &Instruction {
        &self.instructions[opcode as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }
}

fn with_fidelity(instruction: Instruction, fidelity: OpcodeFidelity) -> Instruction {
    if matches!(instruction.kind, Jam | Unsupported) {
        return instruction;
    }

    match fidelity {
        OpcodeFidelity::Strict => Instruction {
            kind: Unsupported,
            ..instruction
        },
        OpcodeFidelity::NopStub => {
            debug!(
                "Undocumented opcode ${:0>2X} ({}) stubbed as NOP",
                instruction.opcode, instruction.name
            );
            Instruction {
                kind: Implied(nop),
                ..instruction
            }
        }
        OpcodeFidelity::Undocumented => instruction,
    }
}

#[rustfmt::skip]
fn documented_opcodes() -> Vec<Instruction> {
    vec![
        // Transfer instructions
        op!(0xA9, "LDA", Read(lda), Immediate, 2),
        op!(0xA5, "LDA", Read(lda), ZeroPage, 3),
        op!(0xB5, "LDA", Read(lda), ZeroPageX, 4),
        op!(0xAD, "LDA", Read(lda), Absolute, 4),
        op!(0xBD, "LDA", Read(lda), AbsoluteX, 4),
        op!(0xB9, "LDA", Read(lda), AbsoluteY, 4),
        op!(0xA1, "LDA", Read(lda), IndirectX, 6),
        op!(0xB1, "LDA", Read(lda), IndirectY, 5),

        op!(0xA2, "LDX", Read(ldx), Immediate, 2),
        op!(0xA6, "LDX", Read(ldx), ZeroPage, 3),
        op!(0xB6, "LDX", Read(ldx), ZeroPageY, 4),
        op!(0xAE, "LDX", Read(ldx), Absolute, 4),
        op!(0xBE, "LDX", Read(ldx), AbsoluteY, 4),

        op!(0xA0, "LDY", Read(ldy), Immediate, 2),
        op!(0xA4, "LDY", Read(ldy), ZeroPage, 3),
        op!(0xB4, "LDY", Read(ldy), ZeroPageX, 4),
        op!(0xAC, "LDY", Read(ldy), Absolute, 4),
        op!(0xBC, "LDY", Read(ldy), AbsoluteX, 4),

        op!(0x85, "STA", Write(sta), ZeroPage, 3),
        op!(0x95, "STA", Write(sta), ZeroPageX, 4),
        op!(0x8D, "STA", Write(sta), Absolute, 4),
        op!(0x9D, "STA", Write(sta), AbsoluteX, 5),
        op!(0x99, "STA", Write(sta), AbsoluteY, 5),
        op!(0x81, "STA", Write(sta), IndirectX, 6),
        op!(0x91, "STA", Write(sta), IndirectY, 6),

        op!(0x86, "STX", Write(stx), ZeroPage, 3),
        op!(0x96, "STX", Write(stx), ZeroPageY, 4),
        op!(0x8E, "STX", Write(stx), Absolute, 4),

        op!(0x84, "STY", Write(sty), ZeroPage, 3),
        op!(0x94, "STY", Write(sty), ZeroPageX, 4),
        op!(0x8C, "STY", Write(sty), Absolute, 4),

        op!(0xAA, "TAX", Implied(tax), Implied, 2),
        op!(0xA8, "TAY", Implied(tay), Implied, 2),
        op!(0xBA, "TSX", Implied(tsx), Implied, 2),
        op!(0x8A, "TXA", Implied(txa), Implied, 2),
        op!(0x9A, "TXS", Implied(txs), Implied, 2),
        op!(0x98, "TYA", Implied(tya), Implied, 2),

        // Stack instructions
        op!(0x48, "PHA", Misc(Push(pha)), Implied, 3),
        op!(0x08, "PHP", Misc(Push(php)), Implied, 3),
        op!(0x68, "PLA", Misc(Pull(pla)), Implied, 4),
        op!(0x28, "PLP", Misc(Pull(plp)), Implied, 4),

        // Decrements and increments
        op!(0xC6, "DEC", ReadModifyWrite(dec), ZeroPage, 5),
        op!(0xD6, "DEC", ReadModifyWrite(dec), ZeroPageX, 6),
        op!(0xCE, "DEC", ReadModifyWrite(dec), Absolute, 6),
        op!(0xDE, "DEC", ReadModifyWrite(dec), AbsoluteX, 7),
        op!(0xCA, "DEX", Implied(dex), Implied, 2),
        op!(0x88, "DEY", Implied(dey), Implied, 2),

        op!(0xE6, "INC", ReadModifyWrite(inc), ZeroPage, 5),
        op!(0xF6, "INC", ReadModifyWrite(inc), ZeroPageX, 6),
        op!(0xEE, "INC", ReadModifyWrite(inc), Absolute, 6),
        op!(0xFE, "INC", ReadModifyWrite(inc), AbsoluteX, 7),
        op!(0xE8, "INX", Implied(inx), Implied, 2),
        op!(0xC8, "INY", Implied(iny), Implied, 2),

        // Arithmetic operations
        op!(0x69, "ADC", Read(adc), Immediate, 2),
        op!(0x65, "ADC", Read(adc), ZeroPage, 3),
        op!(0x75, "ADC", Read(adc), ZeroPageX, 4),
        op!(0x6D, "ADC", Read(adc), Absolute, 4),
        op!(0x7D, "ADC", Read(adc), AbsoluteX, 4),
        op!(0x79, "ADC", Read(adc), AbsoluteY, 4),
        op!(0x61, "ADC", Read(adc), IndirectX, 6),
        op!(0x71, "ADC", Read(adc), IndirectY, 5),

        op!(0xE9, "SBC", Read(sbc), Immediate, 2),
        op!(0xE5, "SBC", Read(sbc), ZeroPage, 3),
        op!(0xF5, "SBC", Read(sbc), ZeroPageX, 4),
        op!(0xED, "SBC", Read(sbc), Absolute, 4),
        op!(0xFD, "SBC", Read(sbc), AbsoluteX, 4),
        op!(0xF9, "SBC", Read(sbc), AbsoluteY, 4),
        op!(0xE1, "SBC", Read(sbc), IndirectX, 6),
        op!(0xF1, "SBC", Read(sbc), IndirectY, 5),

        // Logical operations
        op!(0x29, "AND", Read(and), Immediate, 2),
        op!(0x25, "AND", Read(and), ZeroPage, 3),
        op!(0x35, "AND", Read(and), ZeroPageX, 4),
        op!(0x2D, "AND", Read(and), Absolute, 4),
        op!(0x3D, "AND", Read(and), AbsoluteX, 4),
        op!(0x39, "AND", Read(and), AbsoluteY, 4),
        op!(0x21, "AND", Read(and), IndirectX, 6),
        op!(0x31, "AND", Read(and), IndirectY, 5),

        op!(0x49, "EOR", Read(eor), Immediate, 2),
        op!(0x45, "EOR", Read(eor), ZeroPage, 3),
        op!(0x55, "EOR", Read(eor), ZeroPageX, 4),
        op!(0x4D, "EOR", Read(eor), Absolute, 4),
        op!(0x5D, "EOR", Read(eor), AbsoluteX, 4),
        op!(0x59, "EOR", Read(eor), AbsoluteY, 4),
        op!(0x41, "EOR", Read(eor), IndirectX, 6),
        op!(0x51, "EOR", Read(eor), IndirectY, 5),

        op!(0x09, "ORA", Read(ora), Immediate, 2),
        op!(0x05, "ORA", Read(ora), ZeroPage, 3),
        op!(0x15, "ORA", Read(ora), ZeroPageX, 4),
        op!(0x0D, "ORA", Read(ora), Absolute, 4),
        op!(0x1D, "ORA", Read(ora), AbsoluteX, 4),
        op!(0x19, "ORA", Read(ora), AbsoluteY, 4),
        op!(0x01, "ORA", Read(ora), IndirectX, 6),
        op!(0x11, "ORA", Read(ora), IndirectY, 5),

        // Shift and rotation instructions
        op!(0x0A, "ASL", ReadModifyWrite(asl), Accumulator, 2),
        op!(0x06, "ASL", ReadModifyWrite(asl), ZeroPage, 5),
        op!(0x16, "ASL", ReadModifyWrite(asl), ZeroPageX, 6),
        op!(0x0E, "ASL", ReadModifyWrite(asl), Absolute, 6),
        op!(0x1E, "ASL", ReadModifyWrite(asl), AbsoluteX, 7),

        op!(0x4A, "LSR", ReadModifyWrite(lsr), Accumulator, 2),
        op!(0x46, "LSR", ReadModifyWrite(lsr), ZeroPage, 5),
        op!(0x56, "LSR", ReadModifyWrite(lsr), ZeroPageX, 6),
        op!(0x4E, "LSR", ReadModifyWrite(lsr), Absolute, 6),
        op!(0x5E, "LSR", ReadModifyWrite(lsr), AbsoluteX, 7),

        op!(0x2A, "ROL", ReadModifyWrite(rol), Accumulator, 2),
        op!(0x26, "ROL", ReadModifyWrite(rol), ZeroPage, 5),
        op!(0x36, "ROL", ReadModifyWrite(rol), ZeroPageX, 6),
        op!(0x2E, "ROL", ReadModifyWrite(rol), Absolute, 6),
        op!(0x3E, "ROL", ReadModifyWrite(rol), AbsoluteX, 7),

        op!(0x6A, "ROR", ReadModifyWrite(ror), Accumulator, 2),
        op!(0x66, "ROR", ReadModifyWrite(ror), ZeroPage, 5),
        op!(0x76, "ROR", ReadModifyWrite(ror), ZeroPageX, 6),
        op!(0x6E, "ROR", ReadModifyWrite(ror), Absolute, 6),
        op!(0x7E, "ROR", ReadModifyWrite(ror), AbsoluteX, 7),

        // Flag instructions
        op!(0x18, "CLC", Implied(clc), Implied, 2),
        op!(0xD8, "CLD", Implied(cld), Implied, 2),
        op!(0x58, "CLI", Implied(cli), Implied, 2),
        op!(0xB8, "CLV", Implied(clv), Implied, 2),
        op!(0x38, "SEC", Implied(sec), Implied, 2),
        op!(0xF8, "SED", Implied(sed), Implied, 2),
        op!(0x78, "SEI", Implied(sei), Implied, 2),

        // Comparisons
        op!(0xC9, "CMP", Read(cmp), Immediate, 2),
        op!(0xC5, "CMP", Read(cmp), ZeroPage, 3),
        op!(0xD5, "CMP", Read(cmp), ZeroPageX, 4),
        op!(0xCD, "CMP", Read(cmp), Absolute, 4),
        op!(0xDD, "CMP", Read(cmp), AbsoluteX, 4),
        op!(0xD9, "CMP", Read(cmp), AbsoluteY, 4),
        op!(0xC1, "CMP", Read(cmp), IndirectX, 6),
        op!(0xD1, "CMP", Read(cmp), IndirectY, 5),

        op!(0xE0, "CPX", Read(cpx), Immediate, 2),
        op!(0xE4, "CPX", Read(cpx), ZeroPage, 3),
        op!(0xEC, "CPX", Read(cpx), Absolute, 4),

        op!(0xC0, "CPY", Read(cpy), Immediate, 2),
        op!(0xC4, "CPY", Read(cpy), ZeroPage, 3),
        op!(0xCC, "CPY", Read(cpy), Absolute, 4),

        // Conditional branch instructions
        op!(0x90, "BCC", Branch(bcc), Relative, 2),
        op!(0xB0, "BCS", Branch(bcs), Relative, 2),
        op!(0xF0, "BEQ", Branch(beq), Relative, 2),
        op!(0x30, "BMI", Branch(bmi), Relative, 2),
        op!(0xD0, "BNE", Branch(bne), Relative, 2),
        op!(0x10, "BPL", Branch(bpl), Relative, 2),
        op!(0x50, "BVC", Branch(bvc), Relative, 2),
        op!(0x70, "BVS", Branch(bvs), Relative, 2),

        // Jumps and subroutines
        op!(0x4C, "JMP", Misc(Jump), Absolute, 3),
        op!(0x6C, "JMP", Misc(Jump), Indirect, 5),
        op!(0x20, "JSR", Misc(Call), Absolute, 6),
        op!(0x60, "RTS", Misc(Return), Implied, 6),

        // Interrupts
        op!(0x00, "BRK", Misc(SoftwareInterrupt), Implied, 7),
        op!(0x40, "RTI", Misc(ReturnFromInterrupt), Implied, 6),

        // Other
        op!(0x24, "BIT", Read(bit), ZeroPage, 3),
        op!(0x2C, "BIT", Read(bit), Absolute, 4),
        op!(0xEA, "NOP", Implied(nop), Implied, 2),
    ]
}

/// The 105 opcodes left out of the 6502 documentation. The unstable ones
/// (results depend on analog effects) are never executable
#[rustfmt::skip]
fn undocumented_opcodes() -> Vec<Instruction> {
    let instructions = vec![
        // Halt the CPU
        op!(0x02, "JAM", Jam, Implied, 2),
        op!(0x12, "JAM", Jam, Implied, 2),
        op!(0x22, "JAM", Jam, Implied, 2),
        op!(0x32, "JAM", Jam, Implied, 2),
        op!(0x42, "JAM", Jam, Implied, 2),
        op!(0x52, "JAM", Jam, Implied, 2),
        op!(0x62, "JAM", Jam, Implied, 2),
        op!(0x72, "JAM", Jam, Implied, 2),
        op!(0x92, "JAM", Jam, Implied, 2),
        op!(0xB2, "JAM", Jam, Implied, 2),
        op!(0xD2, "JAM", Jam, Implied, 2),
        op!(0xF2, "JAM", Jam, Implied, 2),

        // NOPs with operands still perform their read
        op!(0x1A, "NOP", Implied(nop), Implied, 2),
        op!(0x3A, "NOP", Implied(nop), Implied, 2),
        op!(0x5A, "NOP", Implied(nop), Implied, 2),
        op!(0x7A, "NOP", Implied(nop), Implied, 2),
        op!(0xDA, "NOP", Implied(nop), Implied, 2),
        op!(0xFA, "NOP", Implied(nop), Implied, 2),
        op!(0x80, "NOP", Read(nop_read), Immediate, 2),
        op!(0x82, "NOP", Read(nop_read), Immediate, 2),
        op!(0x89, "NOP", Read(nop_read), Immediate, 2),
        op!(0xC2, "NOP", Read(nop_read), Immediate, 2),
        op!(0xE2, "NOP", Read(nop_read), Immediate, 2),
        op!(0x04, "NOP", Read(nop_read), ZeroPage, 3),
        op!(0x44, "NOP", Read(nop_read), ZeroPage, 3),
        op!(0x64, "NOP", Read(nop_read), ZeroPage, 3),
        op!(0x14, "NOP", Read(nop_read), ZeroPageX, 4),
        op!(0x34, "NOP", Read(nop_read), ZeroPageX, 4),
        op!(0x54, "NOP", Read(nop_read), ZeroPageX, 4),
        op!(0x74, "NOP", Read(nop_read), ZeroPageX, 4),
        op!(0xD4, "NOP", Read(nop_read), ZeroPageX, 4),
        op!(0xF4, "NOP", Read(nop_read), ZeroPageX, 4),
        op!(0x0C, "NOP", Read(nop_read), Absolute, 4),
        op!(0x1C, "NOP", Read(nop_read), AbsoluteX, 4),
        op!(0x3C, "NOP", Read(nop_read), AbsoluteX, 4),
        op!(0x5C, "NOP", Read(nop_read), AbsoluteX, 4),
        op!(0x7C, "NOP", Read(nop_read), AbsoluteX, 4),
        op!(0xDC, "NOP", Read(nop_read), AbsoluteX, 4),
        op!(0xFC, "NOP", Read(nop_read), AbsoluteX, 4),

        // Combined load and store
        op!(0xA7, "LAX", Read(lax), ZeroPage, 3),
        op!(0xB7, "LAX", Read(lax), ZeroPageY, 4),
        op!(0xAF, "LAX", Read(lax), Absolute, 4),
        op!(0xBF, "LAX", Read(lax), AbsoluteY, 4),
        op!(0xA3, "LAX", Read(lax), IndirectX, 6),
        op!(0xB3, "LAX", Read(lax), IndirectY, 5),

        op!(0x87, "SAX", Write(sax), ZeroPage, 3),
        op!(0x97, "SAX", Write(sax), ZeroPageY, 4),
        op!(0x8F, "SAX", Write(sax), Absolute, 4),
        op!(0x83, "SAX", Write(sax), IndirectX, 6),

        // Read-modify-write combined with an ALU operation
        op!(0xC7, "DCP", ReadModifyWrite(dcp), ZeroPage, 5),
        op!(0xD7, "DCP", ReadModifyWrite(dcp), ZeroPageX, 6),
        op!(0xCF, "DCP", ReadModifyWrite(dcp), Absolute, 6),
        op!(0xDF, "DCP", ReadModifyWrite(dcp), AbsoluteX, 7),
        op!(0xDB, "DCP", ReadModifyWrite(dcp), AbsoluteY, 7),
        op!(0xC3, "DCP", ReadModifyWrite(dcp), IndirectX, 8),
        op!(0xD3, "DCP", ReadModifyWrite(dcp), IndirectY, 8),

        op!(0xE7, "ISB", ReadModifyWrite(isb), ZeroPage, 5),
        op!(0xF7, "ISB", ReadModifyWrite(isb), ZeroPageX, 6),
        op!(0xEF, "ISB", ReadModifyWrite(isb), Absolute, 6),
        op!(0xFF, "ISB", ReadModifyWrite(isb), AbsoluteX, 7),
        op!(0xFB, "ISB", ReadModifyWrite(isb), AbsoluteY, 7),
        op!(0xE3, "ISB", ReadModifyWrite(isb), IndirectX, 8),
        op!(0xF3, "ISB", ReadModifyWrite(isb), IndirectY, 8),

        op!(0x07, "SLO", ReadModifyWrite(slo), ZeroPage, 5),
        op!(0x17, "SLO", ReadModifyWrite(slo), ZeroPageX, 6),
        op!(0x0F, "SLO", ReadModifyWrite(slo), Absolute, 6),
        op!(0x1F, "SLO", ReadModifyWrite(slo), AbsoluteX, 7),
        op!(0x1B, "SLO", ReadModifyWrite(slo), AbsoluteY, 7),
        op!(0x03, "SLO", ReadModifyWrite(slo), IndirectX, 8),
        op!(0x13, "SLO", ReadModifyWrite(slo), IndirectY, 8),

        op!(0x27, "RLA", ReadModifyWrite(rla), ZeroPage, 5),
        op!(0x37, "RLA", ReadModifyWrite(rla), ZeroPageX, 6),
        op!(0x2F, "RLA", ReadModifyWrite(rla), Absolute, 6),
        op!(0x3F, "RLA", ReadModifyWrite(rla), AbsoluteX, 7),
        op!(0x3B, "RLA", ReadModifyWrite(rla), AbsoluteY, 7),
        op!(0x23, "RLA", ReadModifyWrite(rla), IndirectX, 8),
        op!(0x33, "RLA", ReadModifyWrite(rla), IndirectY, 8),

        op!(0x47, "SRE", ReadModifyWrite(sre), ZeroPage, 5),
        op!(0x57, "SRE", ReadModifyWrite(sre), ZeroPageX, 6),
        op!(0x4F, "SRE", ReadModifyWrite(sre), Absolute, 6),
        op!(0x5F, "SRE", ReadModifyWrite(sre), AbsoluteX, 7),
        op!(0x5B, "SRE", ReadModifyWrite(sre), AbsoluteY, 7),
        op!(0x43, "SRE", ReadModifyWrite(sre), IndirectX, 8),
        op!(0x53, "SRE", ReadModifyWrite(sre), IndirectY, 8),

        op!(0x67, "RRA", ReadModifyWrite(rra), ZeroPage, 5),
        op!(0x77, "RRA", ReadModifyWrite(rra), ZeroPageX, 6),
        op!(0x6F, "RRA", ReadModifyWrite(rra), Absolute, 6),
        op!(0x7F, "RRA", ReadModifyWrite(rra), AbsoluteX, 7),
        op!(0x7B, "RRA", ReadModifyWrite(rra), AbsoluteY, 7),
        op!(0x63, "RRA", ReadModifyWrite(rra), IndirectX, 8),
        op!(0x73, "RRA", ReadModifyWrite(rra), IndirectY, 8),

        // Immediate ALU combinations
        op!(0x0B, "ANC", Read(anc), Immediate, 2),
        op!(0x2B, "ANC", Read(anc), Immediate, 2),
        op!(0x4B, "ALR", Read(alr), Immediate, 2),
        op!(0x6B, "ARR", Read(arr), Immediate, 2),
        op!(0xCB, "AXS", Read(axs), Immediate, 2),
        op!(0xEB, "SBC", Read(sbc), Immediate, 2),

        // Unstable
        op!(0x8B, "XAA", Unsupported, Immediate, 2),
        op!(0xAB, "LXA", Unsupported, Immediate, 2),
        op!(0x93, "AHX", Unsupported, IndirectY, 6),
        op!(0x9F, "AHX", Unsupported, AbsoluteY, 5),
        op!(0x9B, "TAS", Unsupported, AbsoluteY, 5),
        op!(0x9C, "SHY", Unsupported, AbsoluteX, 5),
        op!(0x9E, "SHX", Unsupported, AbsoluteY, 5),
        op!(0xBB, "LAS", Unsupported, AbsoluteY, 4),
    ];

    instructions
        .into_iter()
        .map(Instruction::undocumented)
        .collect()
}

//////////////////////////////////////////////////////////////////////
// Transfer instructions
//////////////////////////////////////////////////////////////////////

/// LDA - Load Accumulator with Memory
///
/// Operation:
/// M -> A
///
/// Status Register
/// N Z C I D V
/// + + - - - -
pub fn lda(cpu: &mut Registers, operand: u8) {
    cpu.acc = operand;
    cpu.sr.set_zn(cpu.acc);
}

/// LDX - Load Index X with Memory
///
/// Operation:
/// M -> X
///
/// Status Register
/// N Z C I D V
/// + + - - - -
pub fn ldx(cpu: &mut Registers, operand: u8) {
    cpu.x_reg = operand;
    cpu.sr.set_zn(cpu.x_reg);
}

/// LDY - Load Index Y with Memory
///
/// Operation:
/// M -> Y
///
/// Status Register
/// N Z C I D V
/// + + - - - -
pub fn ldy(cpu: &mut Registers, operand: u8) {
    cpu.y_reg = operand;
    cpu.sr.set_zn(cpu.y_reg);
}

/// STA - Store Accumulator in Memory
///
/// Operation:
/// A -> M
pub fn sta(cpu: &mut Registers) -> u8 {
    cpu.acc
}

/// STX - Store Index X in Memory
pub fn stx(cpu: &mut Registers) -> u8 {
    cpu.x_reg
}

/// STY - Store Index Y in Memory
pub fn sty(cpu: &mut Registers) -> u8 {
    cpu.y_reg
}

/// TAX - Transfer Accumulator to Index X
///
/// Operation:
/// A -> X
///
/// Status Register:
/// N Z C I D V
/// + + - - - -
pub fn tax(cpu: &mut Registers) {
    cpu.x_reg = cpu.acc;
    cpu.sr.set_zn(cpu.x_reg);
}

/// TAY - Transfer Accumulator to Index Y
pub fn tay(cpu: &mut Registers) {
    cpu.y_reg = cpu.acc;
    cpu.sr.set_zn(cpu.y_reg);
}

/// TSX - Transfer Stack Pointer to Index X
pub fn tsx(cpu: &mut Registers) {
    cpu.x_reg = cpu.sp;
    cpu.sr.set_zn(cpu.x_reg);
}

/// TXA - Transfer Index X to Accumulator
pub fn txa(cpu: &mut Registers) {
    cpu.acc = cpu.x_reg;
    cpu.sr.set_zn(cpu.acc);
}

/// TXS - Transfer Index X to Stack Pointer
///
/// Operation:
/// X -> SP
///
/// Status Register:
/// N Z C I D V
/// - - - - - -
pub fn txs(cpu: &mut Registers) {
    cpu.sp = cpu.x_reg;
}

/// TYA - Transfer Index Y to Accumulator
pub fn tya(cpu: &mut Registers) {
    cpu.acc = cpu.y_reg;
    cpu.sr.set_zn(cpu.acc);
}

//////////////////////////////////////////////////////////////////////
// Stack instructions
//////////////////////////////////////////////////////////////////////

/// PHA - Push Accumulator on Stack
pub fn pha(cpu: &Registers) -> u8 {
    cpu.acc
}

/// PHP - Push Processor Status on Stack
///
/// The status register will be pushed with the break flag and bit 5 set to 1.
pub fn php(cpu: &Registers) -> u8 {
    cpu.sr.to_stack(true)
}

/// PLA - Pull Accumulator from Stack
///
/// Status Register:
/// N Z C I D V
/// + + - - - -
pub fn pla(cpu: &mut Registers, value: u8) {
    cpu.acc = value;
    cpu.sr.set_zn(cpu.acc);
}

/// PLP - Pull Processor Status from Stack
///
/// The status register will be pulled with the break flag and bit 5 ignored.
pub fn plp(cpu: &mut Registers, value: u8) {
    cpu.sr = StatusRegister::from_stack(value);
}

//////////////////////////////////////////////////////////////////////
// Decrements and increments
//////////////////////////////////////////////////////////////////////

/// DEC - Decrement Memory by One
///
/// Operation:
/// M - 1 -> M
///
/// Status Register:
/// N Z C I D V
/// + + - - - -
pub fn dec(cpu: &mut Registers, operand: u8) -> u8 {
    let result = operand.wrapping_sub(1);
    cpu.sr.set_zn(result);
    result
}

pub fn dex(cpu: &mut Registers) {
    cpu.x_reg = cpu.x_reg.wrapping_sub(1);
    cpu.sr.set_zn(cpu.x_reg);
}

pub fn dey(cpu: &mut Registers) {
    cpu.y_reg = cpu.y_reg.wrapping_sub(1);
    cpu.sr.set_zn(cpu.y_reg);
}

/// INC - Increment Memory by One
///
/// Operation:
/// M + 1 -> M
///
/// Status Register:
/// N Z C I D V
/// + + - - - -
pub fn inc(cpu: &mut Registers, operand: u8) -> u8 {
    let result = operand.wrapping_add(1);
    cpu.sr.set_zn(result);
    result
}

pub fn inx(cpu: &mut Registers) {
    cpu.x_reg = cpu.x_reg.wrapping_add(1);
    cpu.sr.set_zn(cpu.x_reg);
}

pub fn iny(cpu: &mut Registers) {
    cpu.y_reg = cpu.y_reg.wrapping_add(1);
    cpu.sr.set_zn(cpu.y_reg);
}

//////////////////////////////////////////////////////////////////////
// Arithmetic operations
//////////////////////////////////////////////////////////////////////

/// ADC - Add Memory to Accumulator with Carry
///
/// Operation:
/// A + M + C -> A, C
///
/// Status Register:
/// N Z C I D V
/// + + + - - +
///
/// The decimal flag is ignored, the NES CPU has no BCD unit
pub fn adc(cpu: &mut Registers, operand: u8) {
    let carry = if cpu.sr.get(Carry) { 1 } else { 0 };
    let res = cpu.acc as u16 + operand as u16 + carry;
    let carry = (res & (1 << 8)) != 0;
    let res = res as u8;
    let overflow = utils::bv(cpu.acc, 7) == utils::bv(operand, 7)
        && utils::bv(operand, 7) != utils::bv(res, 7);

    cpu.acc = res;
    cpu.sr.set_zn(cpu.acc);
    cpu.sr.set_value(Carry, carry);
    cpu.sr.set_value(Overflow, overflow);
}

/// SBC - Subtract Memory from Accumulator with Borrow
///
/// Operation:
/// A - M - ~C -> A
///
/// Status Register:
/// N Z C I D V
/// + + + - - +
///
/// Carry clear means borrow. A - M - ~C is the same as A + ~M + C
pub fn sbc(cpu: &mut Registers, operand: u8) {
    adc(cpu, !operand)
}

//////////////////////////////////////////////////////////////////////
// Logical operations
//////////////////////////////////////////////////////////////////////

/// AND - AND Memory with Accumulator
///
/// Operation:
/// A AND M -> A
///
/// Status Register:
/// N Z C I D V
/// + + - - - -
pub fn and(cpu: &mut Registers, operand: u8) {
    cpu.acc &= operand;
    cpu.sr.set_zn(cpu.acc);
}

/// EOR - Exclusive-OR Memory with Accumulator
pub fn eor(cpu: &mut Registers, operand: u8) {
    cpu.acc ^= operand;
    cpu.sr.set_zn(cpu.acc);
}

/// ORA - OR Memory with Accumulator
pub fn ora(cpu: &mut Registers, operand: u8) {
    cpu.acc |= operand;
    cpu.sr.set_zn(cpu.acc);
}

//////////////////////////////////////////////////////////////////////
// Shift and rotation instructions
//////////////////////////////////////////////////////////////////////

/// ASL - Shift Left One Bit (Memory or Accumulator)
///
/// Operation:
/// C <- [76543210] <- 0
///
/// Status Register:
/// N Z C I D V
/// + + + - - -
pub fn asl(cpu: &mut Registers, operand: u8) -> u8 {
    let result = operand << 1;
    cpu.sr.set_value(Carry, utils::bv(operand, 7) != 0);
    cpu.sr.set_zn(result);
    result
}

/// LSR - Shift One Bit Right (Memory or Accumulator)
///
/// Operation:
/// 0 -> [76543210] -> C
pub fn lsr(cpu: &mut Registers, operand: u8) -> u8 {
    let result = operand >> 1;
    cpu.sr.set_value(Carry, utils::bv(operand, 0) != 0);
    cpu.sr.set_zn(result);
    result
}

/// ROL - Rotate One Bit Left (Memory or Accumulator)
///
/// Operation:
/// C <- [76543210] <- C
pub fn rol(cpu: &mut Registers, operand: u8) -> u8 {
    let curr_carry = if cpu.sr.get(Carry) { 1 } else { 0 };
    let result = operand << 1 | curr_carry;
    cpu.sr.set_value(Carry, utils::bv(operand, 7) != 0);
    cpu.sr.set_zn(result);
    result
}

/// ROR - Rotate One Bit Right (Memory or Accumulator)
///
/// Operation:
/// C -> [76543210] -> C
pub fn ror(cpu: &mut Registers, operand: u8) -> u8 {
    let curr_carry = if cpu.sr.get(Carry) { 1 } else { 0 };
    let result = operand >> 1 | (curr_carry << 7);
    cpu.sr.set_value(Carry, utils::bv(operand, 0) != 0);
    cpu.sr.set_zn(result);
    result
}

//////////////////////////////////////////////////////////////////////
// Flag instructions
//////////////////////////////////////////////////////////////////////

pub fn clc(cpu: &mut Registers) {
    cpu.sr.clear(Carry);
}

pub fn cld(cpu: &mut Registers) {
    cpu.sr.clear(Decimal);
}

pub fn cli(cpu: &mut Registers) {
    cpu.sr.clear(InterruptDisable);
}

pub fn clv(cpu: &mut Registers) {
    cpu.sr.clear(Overflow);
}

pub fn sec(cpu: &mut Registers) {
    cpu.sr.set(Carry);
}

pub fn sed(cpu: &mut Registers) {
    cpu.sr.set(Decimal);
}

pub fn sei(cpu: &mut Registers) {
    cpu.sr.set(InterruptDisable);
}

//////////////////////////////////////////////////////////////////////
// Comparisons
//////////////////////////////////////////////////////////////////////

fn compare(cpu: &mut Registers, register: u8, operand: u8) {
    let result = register.wrapping_sub(operand);
    cpu.sr.set_value(Carry, register >= operand);
    cpu.sr.set_zn(result);
}

/// CMP - Compare Memory with Accumulator
///
/// Operation:
/// A - M
///
/// Status Register:
/// N Z C I D V
/// + + + - - -
pub fn cmp(cpu: &mut Registers, operand: u8) {
    let acc = cpu.acc;
    compare(cpu, acc, operand);
}

/// CPX - Compare Memory and Index X
pub fn cpx(cpu: &mut Registers, operand: u8) {
    let x_reg = cpu.x_reg;
    compare(cpu, x_reg, operand);
}

/// CPY - Compare Memory and Index Y
pub fn cpy(cpu: &mut Registers, operand: u8) {
    let y_reg = cpu.y_reg;
    compare(cpu, y_reg, operand);
}

//////////////////////////////////////////////////////////////////////
// Conditional branch instructions
//////////////////////////////////////////////////////////////////////

/// BCC - Branch on Carry Clear
pub fn bcc(sr: &StatusRegister) -> bool {
    !sr.get(Carry)
}

/// BCS - Branch on Carry Set
pub fn bcs(sr: &StatusRegister) -> bool {
    sr.get(Carry)
}

/// BEQ - Branch on Result Zero
pub fn beq(sr: &StatusRegister) -> bool {
    sr.get(Zero)
}

/// BMI - Branch on Result Minus
pub fn bmi(sr: &StatusRegister) -> bool {
    sr.get(Negative)
}

/// BNE - Branch on Result not Zero
pub fn bne(sr: &StatusRegister) -> bool {
    !sr.get(Zero)
}

/// BPL - Branch on Result Plus
pub fn bpl(sr: &StatusRegister) -> bool {
    !sr.get(Negative)
}

/// BVC - Branch on Overflow Clear
pub fn bvc(sr: &StatusRegister) -> bool {
    !sr.get(Overflow)
}

/// BVS - Branch on Overflow Set
pub fn bvs(sr: &StatusRegister) -> bool {
    sr.get(Overflow)
}

//////////////////////////////////////////////////////////////////////
// Other
//////////////////////////////////////////////////////////////////////

/// BIT - Test Bits in Memory with Accumulator
///
/// Bits 7 and 6 of operand are transfered to bit 7 and 6 of SR (N,V); the
/// zero-flag is set according to the result of the operand AND the
/// accumulator (set, if the result is zero, unset otherwise).
///
/// Operation:
/// A AND M, M7 -> N, M6 -> V
///
/// Status Register:
/// N  Z C I D V
/// M7 + - - - M6
pub fn bit(cpu: &mut Registers, operand: u8) {
    cpu.sr.set_value(Zero, cpu.acc & operand == 0);
    cpu.sr.set_value(Negative, utils::bv(operand, 7) != 0);
    cpu.sr.set_value(Overflow, utils::bv(operand, 6) != 0);
}

/// NOP - No Operation
pub fn nop(_cpu: &mut Registers) {}

/// NOP with an operand. The read happens, the value is discarded
pub fn nop_read(_cpu: &mut Registers, _operand: u8) {}

//////////////////////////////////////////////////////////////////////
// Undocumented instructions
//////////////////////////////////////////////////////////////////////

/// LAX - LDA then TAX
pub fn lax(cpu: &mut Registers, operand: u8) {
    cpu.acc = operand;
    cpu.x_reg = operand;
    cpu.sr.set_zn(operand);
}

/// SAX - Store A AND X
pub fn sax(cpu: &mut Registers) -> u8 {
    cpu.acc & cpu.x_reg
}

/// DCP - DEC then CMP
pub fn dcp(cpu: &mut Registers, operand: u8) -> u8 {
    let result = operand.wrapping_sub(1);
    cmp(cpu, result);
    result
}

/// ISB - INC then SBC
pub fn isb(cpu: &mut Registers, operand: u8) -> u8 {
    let result = operand.wrapping_add(1);
    sbc(cpu, result);
    result
}

/// SLO - ASL then ORA
pub fn slo(cpu: &mut Registers, operand: u8) -> u8 {
    let result = asl(cpu, operand);
    ora(cpu, result);
    result
}

/// RLA - ROL then AND
pub fn rla(cpu: &mut Registers, operand: u8) -> u8 {
    let result = rol(cpu, operand);
    and(cpu, result);
    result
}

/// SRE - LSR then EOR
pub fn sre(cpu: &mut Registers, operand: u8) -> u8 {
    let result = lsr(cpu, operand);
    eor(cpu, result);
    result
}

/// RRA - ROR then ADC. The carry out of ROR feeds the addition
pub fn rra(cpu: &mut Registers, operand: u8) -> u8 {
    let result = ror(cpu, operand);
    adc(cpu, result);
    result
}

/// ANC - AND, then bit 7 is copied into carry
pub fn anc(cpu: &mut Registers, operand: u8) {
    and(cpu, operand);
    cpu.sr.set_value(Carry, cpu.sr.get(Negative));
}

/// ALR - AND then LSR A
pub fn alr(cpu: &mut Registers, operand: u8) {
    and(cpu, operand);
    let acc = cpu.acc;
    cpu.acc = lsr(cpu, acc);
}

/// ARR - AND then ROR A, with C from bit 6 and V from bit 6 XOR bit 5
pub fn arr(cpu: &mut Registers, operand: u8) {
    let carry = if cpu.sr.get(Carry) { 0x80 } else { 0 };
    let result = ((cpu.acc & operand) >> 1) | carry;
    cpu.acc = result;
    cpu.sr.set_zn(result);
    cpu.sr.set_value(Carry, utils::bv(result, 6) != 0);
    cpu.sr.set_value(Overflow, utils::bv(result, 6) ^ utils::bv(result, 5) != 0);
}

/// AXS - (A AND X) - M -> X, flags as CMP
pub fn axs(cpu: &mut Registers, operand: u8) {
    let value = cpu.acc & cpu.x_reg;
    cpu.x_reg = value.wrapping_sub(operand);
    cpu.sr.set_value(Carry, value >= operand);
    cpu.sr.set_zn(cpu.x_reg);
}
