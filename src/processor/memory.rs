use log::trace;

use crate::interfaces::Memory;
use crate::settings::RamPowerOn;

/// Plain random access memory. Addresses beyond its size wrap around, so a
/// small RAM attached to a large window repeats itself.
pub struct Ram {
    memory: Vec<u8>,
}

impl Ram {
    pub fn new(size: usize, power_on: RamPowerOn) -> Self {
        Self {
            memory: vec![power_on.value(); size],
        }
    }

    fn index(&self, address: u16) -> usize {
        address as usize % self.memory.len()
    }
}

impl Memory for Ram {
    fn read(&mut self, address: u16) -> u8 {
        self.memory[self.index(address)]
    }

    fn write(&mut self, address: u16, data: u8) {
        let index = self.index(address);
        trace!("RAM write: {index:0>4X} <- {data:0>2X}");
        self.memory[index] = data;
    }

    fn size(&self) -> usize {
        self.memory.len()
    }
}
