use std::fmt;

use crate::processor::registers::Registers;
use crate::processor::status_register::StatusRegister;

pub type Opcode = u8;

#[derive(Clone, Copy)]
pub struct Instruction {
    pub opcode: Opcode,
    pub name: &'static str,
    pub kind: InstructionKind,
    pub addressing_mode: AddressingMode,
    pub bytes: u8,
    // base cycles, page crossing and branch penalties are added on execution
    pub cycles: u8,
    pub documented: bool,
}

impl Instruction {
    pub fn new(
        opcode: Opcode,
        name: &'static str,
        kind: InstructionKind,
        addressing_mode: AddressingMode,
        cycles: u8,
    ) -> Self {
        Self {
            opcode,
            name,
            kind,
            addressing_mode,
            bytes: addressing_mode.bytes(),
            cycles,
            documented: true,
        }
    }

    pub fn undocumented(mut self) -> Self {
        self.documented = false;
        self
    }

    /// Extra cycles charged when the effective address lands on another page
    /// than its base. Only indexed reads pay it, stores and read-modify-write
    /// instructions always take the long path
    pub fn page_crossing_cost(&self) -> u8 {
        match (self.kind, self.addressing_mode) {
            (
                InstructionKind::Read(_),
                AddressingMode::AbsoluteX | AddressingMode::AbsoluteY | AddressingMode::IndirectY,
            ) => 1,
            _ => 0,
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:0>2X} {} {:?} ({} bytes, {} cycles)",
            self.opcode, self.name, self.addressing_mode, self.bytes, self.cycles
        )
    }
}

#[derive(Clone, Copy)]
pub enum InstructionKind {
    /// Operates on registers only
    Implied(fn(&mut Registers)),
    /// Reads its operand from memory
    Read(fn(&mut Registers, u8)),
    /// Produces a value stored to memory
    Write(fn(&mut Registers) -> u8),
    /// Reads, modifies and writes back memory (or the accumulator)
    ReadModifyWrite(fn(&mut Registers, u8) -> u8),
    /// Relative jump taken when the condition holds
    Branch(fn(&StatusRegister) -> bool),
    Misc(MiscInstructionKind),
    /// Halts the CPU until reset
    Jam,
    /// Opcode not executable under the configured fidelity
    Unsupported,
}

/// Instructions that touch the stack or the program counter
#[derive(Clone, Copy)]
pub enum MiscInstructionKind {
    Push(fn(&Registers) -> u8),
    Pull(fn(&mut Registers, u8)),
    Jump,
    Call,
    Return,
    SoftwareInterrupt,
    ReturnFromInterrupt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,     // Implied Addressing
    Accumulator, // Accumulator Addressing
    Immediate,   // Immediate Addressing
    Absolute,    // Absolute Addressing
    ZeroPage,    // Zero Page Addressing
    AbsoluteX,   // Absolute Indexed Addressing (X)
    AbsoluteY,   // Absolute Indexed Addressing (Y)
    ZeroPageX,   // Zero Page Indexed Addressing (X)
    ZeroPageY,   // Zero Page Indexed Addressing (Y)
    IndirectX,   // Zero Page Indexed Indirect Addressing (X)
    IndirectY,   // Zero Page Indexed Indirect Addressing (Y)
    Relative,    // Relative Addressing (branch operations)
    Indirect,    // Indirect Addressing (jump operations)
}

impl AddressingMode {
    /// Instruction length, opcode included
    pub fn bytes(&self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndirectX
            | AddressingMode::IndirectY
            | AddressingMode::Relative => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        }
    }
}
