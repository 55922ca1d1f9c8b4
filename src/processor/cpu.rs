//! 6502 CPU (2A03 core without decimal mode)
//!
//! The CPU executes one instruction (or one interrupt sequence) per
//! [`Cpu::step`] and reports how many cycles it took. The caller is in charge
//! of spending those cycles on the rest of the system.

use log::{debug, info, trace};

use crate::errors::NesError;
use crate::hardware::{
    INTERRUPT_CYCLES, IRQ_VECTOR, NMI_VECTOR, RESET_CYCLES, RESET_VECTOR, STACK_PAGE,
};
use crate::interrupts::InterruptLines;
use crate::processor::instruction::{
    AddressingMode, Instruction, InstructionKind, MiscInstructionKind,
};
use crate::processor::instruction_set::InstructionSet;
use crate::processor::registers::Registers;
use crate::processor::status_register::{StatusRegister, StatusRegisterFlag};
use crate::settings::OpcodeFidelity;
use crate::types::SharedBus;
use crate::utils;


pub struct Cpu {
    regs: Registers,
    bus: SharedBus,
    instruction_set: InstructionSet,
    powered: bool,
}

/// Kind of memory access an addressing mode is resolved for. Indexed stores
/// and read-modify-write instructions always pay the dummy read
#[derive(Clone, Copy, PartialEq, Eq)]
enum Access {
    Read,
    Write,
}

/// Effective address of an instruction
struct Operand {
    address: u16,
    page_crossed: bool,
}

impl Operand {
    fn at(address: u16) -> Self {
        Self {
            address,
            page_crossed: false,
        }
    }
}

impl Cpu {
    pub fn new(bus: SharedBus, fidelity: OpcodeFidelity) -> Result<Self, NesError> {
        Ok(Self {
            regs: Registers::power_on(),
            bus,
            instruction_set: InstructionSet::new(fidelity)?,
            powered: false,
        })
    }

    /// Power-on (first call) or warm reset. Loads PC from the reset vector
    /// and returns the cycles the sequence takes
    pub fn reset(&mut self) -> u8 {
        if self.powered {
            self.regs.sp = self.regs.sp.wrapping_sub(3);
            self.regs.sr.set(StatusRegisterFlag::InterruptDisable);
        } else {
            self.regs = Registers::power_on();
            self.powered = true;
        }
        self.regs.pc = self.read_u16(RESET_VECTOR);
        info!("CPU reset, starting at ${:0>4X}", self.regs.pc);
        RESET_CYCLES
    }

    /// Execute one instruction, or service a pending interrupt instead. NMI is
    /// taken regardless of the interrupt disable flag, IRQ only when it's
    /// clear
    pub fn step(&mut self, lines: &mut InterruptLines) -> Result<u8, NesError> {
        if lines.take_nmi() {
            debug!("NMI at ${:0>4X}", self.regs.pc);
            self.interrupt(NMI_VECTOR, self.regs.pc, false);
            return Ok(INTERRUPT_CYCLES);
        }

        if lines.irq_asserted() && !self.regs.sr.get(StatusRegisterFlag::InterruptDisable) {
            debug!("IRQ at ${:0>4X}", self.regs.pc);
            self.interrupt(IRQ_VECTOR, self.regs.pc, false);
            return Ok(INTERRUPT_CYCLES);
        }

        let address = self.regs.pc;
        let opcode = self.read(address);
        let instruction = *self.instruction_set.lookup(opcode);
        trace!("${address:0>4X}: {instruction:?}");

        self.execute(&instruction, address)
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.regs
    }

    pub fn pc(&self) -> u16 {
        self.regs.pc
    }

    fn execute(&mut self, instruction: &Instruction, address: u16) -> Result<u8, NesError> {
        use InstructionKind::*;
        use MiscInstructionKind::*;

        let next_pc = address.wrapping_add(instruction.bytes as u16);
        let mut cycles = instruction.cycles;

        match instruction.kind {
            Implied(operation) => {
                self.regs.pc = next_pc;
                operation(&mut self.regs);
            }
            Read(operation) => {
                let operand = self.resolve(instruction.addressing_mode, Access::Read);
                self.regs.pc = next_pc;
                let value = self.read(operand.address);
                if operand.page_crossed {
                    cycles += instruction.page_crossing_cost();
                }
                operation(&mut self.regs, value);
            }
            Write(operation) => {
                let operand = self.resolve(instruction.addressing_mode, Access::Write);
                self.regs.pc = next_pc;
                let value = operation(&mut self.regs);
                self.write(operand.address, value);
            }
            ReadModifyWrite(operation) => {
                if instruction.addressing_mode == AddressingMode::Accumulator {
                    self.regs.pc = next_pc;
                    let acc = self.regs.acc;
                    self.regs.acc = operation(&mut self.regs, acc);
                } else {
                    let operand = self.resolve(instruction.addressing_mode, Access::Write);
                    self.regs.pc = next_pc;
                    let value = self.read(operand.address);
                    // the unmodified value is written back while the ALU works
                    self.write(operand.address, value);
                    let result = operation(&mut self.regs, value);
                    self.write(operand.address, result);
                }
            }
            Branch(condition) => {
                let offset = self.read(address.wrapping_add(1)) as i8;
                self.regs.pc = next_pc;
                if condition(&self.regs.sr) {
                    let target = next_pc.wrapping_add(offset as i16 as u16);
                    cycles += 1;
                    if utils::page_crossed(next_pc, target) {
                        cycles += 1;
                    }
                    self.regs.pc = target;
                }
            }
            Misc(Push(operation)) => {
                self.regs.pc = next_pc;
                let value = operation(&self.regs);
                self.push(value);
            }
            Misc(Pull(operation)) => {
                self.regs.pc = next_pc;
                let value = self.pull();
                operation(&mut self.regs, value);
            }
            Misc(Jump) => {
                let operand = self.resolve(instruction.addressing_mode, Access::Read);
                self.regs.pc = operand.address;
            }
            Misc(Call) => {
                let target = self.read_u16(address.wrapping_add(1));
                // JSR pushes the address of its last byte
                self.push_u16(next_pc.wrapping_sub(1));
                self.regs.pc = target;
            }
            Misc(Return) => {
                self.regs.pc = self.pull_u16().wrapping_add(1);
            }
            Misc(SoftwareInterrupt) => {
                // BRK skips a padding byte
                self.interrupt(IRQ_VECTOR, next_pc.wrapping_add(1), true);
            }
            Misc(ReturnFromInterrupt) => {
                let status = self.pull();
                self.regs.sr = StatusRegister::from_stack(status);
                self.regs.pc = self.pull_u16();
            }
            Jam => {
                return Err(NesError::CpuJammed {
                    opcode: instruction.opcode,
                    address,
                });
            }
            Unsupported => {
                return Err(NesError::UnsupportedOpcode {
                    opcode: instruction.opcode,
                    address,
                });
            }
        }

        Ok(cycles)
    }

    /// Compute the effective address for `mode`, PC still pointing at the
    /// opcode
    fn resolve(&mut self, mode: AddressingMode, access: Access) -> Operand {
        use AddressingMode::*;

        let operand = self.regs.pc.wrapping_add(1);

        match mode {
            Implied | Accumulator | Immediate | Relative => Operand::at(operand),
            ZeroPage => Operand::at(self.read(operand) as u16),
            ZeroPageX => Operand::at(self.read(operand).wrapping_add(self.regs.x_reg) as u16),
            ZeroPageY => Operand::at(self.read(operand).wrapping_add(self.regs.y_reg) as u16),
            Absolute => Operand::at(self.read_u16(operand)),
            AbsoluteX => {
                let base = self.read_u16(operand);
                self.indexed(base, self.regs.x_reg, access)
            }
            AbsoluteY => {
                let base = self.read_u16(operand);
                self.indexed(base, self.regs.y_reg, access)
            }
            Indirect => {
                let pointer = self.read_u16(operand);
                // the high byte is fetched without carrying into the pointer
                // high byte: JMP ($10FF) reads $10FF and $1000
                let lo = self.read(pointer);
                let hi = self.read((pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF));
                Operand::at(u16::from_le_bytes([lo, hi]))
            }
            IndirectX => {
                let pointer = self.read(operand).wrapping_add(self.regs.x_reg);
                Operand::at(self.read_zero_page_u16(pointer))
            }
            IndirectY => {
                let pointer = self.read(operand);
                let base = self.read_zero_page_u16(pointer);
                self.indexed(base, self.regs.y_reg, access)
            }
        }
    }

    fn indexed(&mut self, base: u16, index: u8, access: Access) -> Operand {
        let address = base.wrapping_add(index as u16);
        let page_crossed = utils::page_crossed(base, address);

        if page_crossed || access == Access::Write {
            // dummy read before the high byte is fixed
            self.read((base & 0xFF00) | (address & 0x00FF));
        }

        Operand {
            address,
            page_crossed,
        }
    }

    fn interrupt(&mut self, vector: u16, return_address: u16, brk: bool) {
        self.push_u16(return_address);
        let status = self.regs.sr.to_stack(brk);
        self.push(status);
        self.regs.sr.set(StatusRegisterFlag::InterruptDisable);
        self.regs.pc = self.read_u16(vector);
    }

    fn read(&mut self, address: u16) -> u8 {
        self.bus.borrow_mut().read(address)
    }

    fn write(&mut self, address: u16, data: u8) {
        self.bus.borrow_mut().write(address, data);
    }

    fn read_u16(&mut self, address: u16) -> u16 {
        let lo = self.read(address);
        let hi = self.read(address.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Pointers in page zero wrap around: ($FF) reads $FF and $00
    fn read_zero_page_u16(&mut self, pointer: u8) -> u16 {
        let lo = self.read(pointer as u16);
        let hi = self.read(pointer.wrapping_add(1) as u16);
        u16::from_le_bytes([lo, hi])
    }

    fn push(&mut self, data: u8) {
        self.write(STACK_PAGE | self.regs.sp as u16, data);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
    }

    fn pull(&mut self) -> u8 {
        self.regs.sp = self.regs.sp.wrapping_add(1);
        self.read(STACK_PAGE | self.regs.sp as u16)
    }

    fn push_u16(&mut self, data: u16) {
        let [lo, hi] = data.to_le_bytes();
        self.push(hi);
        self.push(lo);
    }

    fn pull_u16(&mut self) -> u16 {
        let lo = self.pull();
        let hi = self.pull();
        u16::from_le_bytes([lo, hi])
    }
}
