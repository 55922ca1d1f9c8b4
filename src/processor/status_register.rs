use std::convert::From;
use std::fmt;

use crate::utils;

// Bring local enum variants to scope
use StatusRegisterFlag::*;

/// 6502 processor status (P). Bit 5 has no storage and always reads as 1. The
/// break flag only exists on the stack copy pushed by BRK/PHP, here it's kept
/// so pushes can be built from the register
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct StatusRegister {
    sr: u8,
}

impl Default for StatusRegister {
    fn default() -> Self {
        Self {
            sr: 1 << Unused as u8,
        }
    }
}

impl StatusRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Power-on value: interrupts disabled ($24)
    pub fn power_on() -> Self {
        let mut sr = Self::default();
        sr.set(InterruptDisable);
        sr
    }

    pub fn get(&self, flag: StatusRegisterFlag) -> bool {
        utils::bv(self.sr, flag as u8) > 0
    }

    pub fn set(&mut self, flag: StatusRegisterFlag) {
        self.sr |= 1 << flag as u8;
    }

    pub fn clear(&mut self, flag: StatusRegisterFlag) {
        if flag as u8 == Unused as u8 {
            return;
        }
        self.sr &= !(1 << flag as u8);
    }

    pub fn set_value(&mut self, flag: StatusRegisterFlag, condition: bool) {
        match condition {
            true => self.set(flag),
            false => self.clear(flag),
        }
    }

    /// Update zero and negative flags from `value`
    pub fn set_zn(&mut self, value: u8) {
        self.set_value(Zero, value == 0);
        self.set_value(Negative, (value as i8) < 0);
    }

    /// Value pushed on the stack. BRK and PHP push with break set, hardware
    /// interrupts without it
    pub fn to_stack(&self, brk: bool) -> u8 {
        let mut value = self.sr | 1 << Unused as u8;
        if brk {
            value |= 1 << Break as u8;
        } else {
            value &= !(1 << Break as u8);
        }
        value
    }

    /// Restore from a stack copy (PLP, RTI). Break and unused bits aren't
    /// real flip-flops and are ignored
    pub fn from_stack(value: u8) -> Self {
        let mut sr = Self {
            sr: value | 1 << Unused as u8,
        };
        sr.sr &= !(1 << Break as u8);
        sr
    }
}

impl From<u8> for StatusRegister {
    fn from(value: u8) -> Self {
        Self {
            sr: value | 1 << Unused as u8,
        }
    }
}

impl From<StatusRegister> for u8 {
    fn from(value: StatusRegister) -> Self {
        value.sr
    }
}

impl fmt::Debug for StatusRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (Negative, 'N'),
            (Overflow, 'V'),
            (Unused, '-'),
            (Break, 'B'),
            (Decimal, 'D'),
            (InterruptDisable, 'I'),
            (Zero, 'Z'),
            (Carry, 'C'),
        ];
        for (flag, name) in flags {
            let name = if self.get(flag) {
                name
            } else {
                name.to_ascii_lowercase()
            };
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StatusRegisterFlag {
    Negative = 7,
    Overflow = 6,
    Unused = 5, // always 1
    Break = 4,
    Decimal = 3, // no BCD unit on the NES, the flag is only stored
    InterruptDisable = 2,
    Zero = 1,
    Carry = 0,
}
