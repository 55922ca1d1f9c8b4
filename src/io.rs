//! APU and I/O registers
//!
//! Audio isn't emulated, but games write to these registers all the time and
//! the bus needs an owner for every address. Writes are dropped and reads
//! return 0, which for $4015 means no channel is playing and no IRQ pending.

use log::trace;

use crate::interfaces::Memory;

pub struct IoRegisters {
    name: &'static str,
    size: usize,
}

impl IoRegisters {
    pub fn new(name: &'static str, size: usize) -> Self {
        Self { name, size }
    }
}

impl Memory for IoRegisters {
    fn read(&mut self, _address: u16) -> u8 {
        0
    }

    fn write(&mut self, address: u16, data: u8) {
        trace!("{} write: {address:0>2X} <- {data:0>2X}", self.name);
    }

    fn size(&self) -> usize {
        self.size
    }
}
