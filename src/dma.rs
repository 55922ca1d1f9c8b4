//! The NES had a primitive DMA which allowed data transfer between CPU and PPU
//! OAM and CPU and APU.
//!
//! Writing a page number to $4014 requests an OAM DMA transfer. The CPU is
//! halted while the 256 bytes of that page are copied into OAM, which is done
//! by the scheduler once the writing instruction finishes. [`DmaController`]
//! only latches the request.

use log::debug;

use crate::hardware::OAM_DMA_CYCLES;
use crate::interfaces::Memory;

/// Pending OAM DMA request
#[derive(Default)]
pub struct DmaController {
    /// high 8-bits of main bus address for OAM DMA transfer
    page: Option<u8>,
}

impl DmaController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the requested page, if any
    pub fn take_request(&mut self) -> Option<u8> {
        self.page.take()
    }

    /// CPU cycles the transfer stalls the CPU for. An extra alignment cycle is
    /// needed when it starts on an odd CPU cycle
    pub fn transfer_cycles(cpu_cycle: u64) -> u32 {
        OAM_DMA_CYCLES + (cpu_cycle & 1) as u32
    }
}

impl Memory for DmaController {
    // write only register, nothing drives the bus
    fn read(&mut self, _address: u16) -> u8 {
        0
    }

    fn write(&mut self, _address: u16, data: u8) {
        debug!("OAM DMA requested for page: ${data:0>2X}");
        self.page = Some(data);
    }

    fn size(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_is_taken_once() {
        let mut dma = DmaController::new();
        assert_eq!(dma.take_request(), None);

        dma.write(0, 0x02);
        assert_eq!(dma.read(0), 0);
        assert_eq!(dma.take_request(), Some(0x02));
        assert_eq!(dma.take_request(), None);
    }

    #[test]
    fn test_transfer_cycles() {
        assert_eq!(DmaController::transfer_cycles(100), 513);
        assert_eq!(DmaController::transfer_cycles(101), 514);
    }
}
