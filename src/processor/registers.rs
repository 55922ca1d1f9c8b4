use crate::processor::status_register::StatusRegister;

/// CPU register file. Instructions only ever see this, the bus is handled by
/// the [`Cpu`](crate::processor::cpu::Cpu) around them
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Registers {
    pub acc: u8,   // Accumulator
    pub x_reg: u8, // X register
    pub y_reg: u8, // Y register
    pub sp: u8,    // Stack Pointer
    pub pc: u16,   // Program Counter
    pub sr: StatusRegister,
}

impl Registers {
    pub fn power_on() -> Self {
        Self {
            acc: 0,
            x_reg: 0,
            y_reg: 0,
            sp: 0xFD,
            pc: 0,
            sr: StatusRegister::power_on(),
        }
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self {
            acc: 0,
            x_reg: 0,
            y_reg: 0,
            sp: 0,
            pc: 0,
            sr: StatusRegister::default(),
        }
    }
}
