/// Nintendo Entertainment System (NES) abstraction.
///
/// This module defines the higher level abstraction to run the NES core. To
/// use it, build a `CartridgeImage` with a loader of your choice, create a
/// `Nes` with it and `step` or `run_frame` while a `PixelSink` collects the
/// video output.
///
/// CPU and PPU are two state machines advanced in strict alternation by
/// [`Nes::step`]: the CPU executes one instruction, then the PPU catches up
/// dot by dot with the cycles it took.
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use log::{debug, info};

use crate::cartridge::{Cartridge, CartridgeImage, ProgramSpace};
use crate::controller::ControllerPorts;
use crate::dma::DmaController;
use crate::errors::NesError;
use crate::graphics::ppu::Ppu;
use crate::graphics::{Pixel, PixelSink};
use crate::hardware::*;
use crate::interfaces::{AddressRange, Bus};
use crate::interrupts::InterruptLines;
use crate::io::IoRegisters;
use crate::processor::bus::{AddressFold, MainBus, MainBusBuilder};
use crate::processor::cpu::Cpu;
use crate::processor::memory::Ram;
use crate::settings::{ClockRatio, NesSettings};
use crate::types::{SharedCartridge, SharedControllers, SharedDma, SharedMainBus, SharedPpu};

pub struct Nes {
    cpu: Cpu,
    main_bus: SharedMainBus,
    interrupts: InterruptLines,

    ppu: SharedPpu,
    cartridge: SharedCartridge,
    controllers: SharedControllers,
    dma: SharedDma,

    clock_ratio: ClockRatio,
    // PPU dots owed, scaled by `clock_ratio.cycles`
    dot_remainder: u32,

    cpu_cycles: u64,
}

impl Nes {
    pub fn new(image: CartridgeImage, settings: NesSettings) -> Result<Self, NesError> {
        let timing = settings.region.timing();

        let cartridge = Rc::new(RefCell::new(Cartridge::new(image)?));
        let ppu = Rc::new(RefCell::new(Ppu::new(Rc::clone(&cartridge), timing)));
        let controllers = Rc::new(RefCell::new(ControllerPorts::new()));
        let dma = Rc::new(RefCell::new(DmaController::new()));

        let ppu_ptr = Rc::clone(&ppu);
        let dma_ptr = Rc::clone(&dma);
        let controllers_ptr = Rc::clone(&controllers);
        let program_space = Rc::new(RefCell::new(ProgramSpace::new(Rc::clone(&cartridge))));

        // Main Bus
        // ----------------------------------------------------------------------------------------

        let main_bus = MainBusBuilder::new("CPU")
            // Memory - 2 kB RAM mirrored 3 times. It's used by the CPU
            .attach(
                "RAM",
                Rc::new(RefCell::new(Ram::new(
                    RAM_SIZE as usize,
                    settings.ram_power_on,
                ))),
                AddressRange::new(RAM_START, RAM_END),
                AddressFold::Mirror { size: RAM_SIZE },
            )?
            // The 8 PPU registers are mirrored 1023 times
            .attach(
                "PPU registers",
                ppu_ptr,
                AddressRange::new(PPU_REGISTERS_START, PPU_REGISTERS_END),
                AddressFold::Mirror {
                    size: PPU_REGISTERS_SIZE,
                },
            )?
            .attach(
                "APU registers",
                Rc::new(RefCell::new(IoRegisters::new("APU", 0x14))),
                AddressRange::new(APU_REGISTERS_START, APU_REGISTERS_END),
                AddressFold::Offset,
            )?
            .attach(
                "OAM DMA",
                dma_ptr,
                AddressRange::new(OAM_DMA, OAM_DMA),
                AddressFold::Offset,
            )?
            .attach(
                "APU status",
                Rc::new(RefCell::new(IoRegisters::new("APU status", 1))),
                AddressRange::new(APU_STATUS, APU_STATUS),
                AddressFold::Offset,
            )?
            .attach(
                "Controllers",
                controllers_ptr,
                AddressRange::new(CONTROLLER_PORT_1, CONTROLLER_PORT_2),
                AddressFold::Offset,
            )?
            .attach(
                "APU test mode",
                Rc::new(RefCell::new(IoRegisters::new("APU test mode", 8))),
                AddressRange::new(APU_TEST_MODE_START, APU_TEST_MODE_END),
                AddressFold::Offset,
            )?
            // Cartridge expansion ROM, PRG RAM and PRG ROM. The mapper decides
            .attach(
                "Cartridge",
                program_space,
                AddressRange::new(CARTRIDGE_START, CARTRIDGE_END),
                AddressFold::Offset,
            )?
            .build()?;
        let main_bus = Rc::new(RefCell::new(main_bus));

        // ----------------------------------------------------------------------------------------

        let main_bus_ptr = Rc::clone(&main_bus);
        let cpu = Cpu::new(main_bus_ptr, settings.opcode_fidelity)?;

        info!(
            "NES powered on: {:?} timing, mapper {}",
            settings.region,
            cartridge.borrow().mapper_id()
        );

        let mut nes = Self {
            cpu,
            main_bus,
            interrupts: InterruptLines::new(),
            ppu,
            cartridge,
            controllers,
            dma,
            clock_ratio: timing.ppu_dots_per_cpu_cycle,
            dot_remainder: 0,
            cpu_cycles: 0,
        };
        nes.reset();
        Ok(nes)
    }

    /// Press the reset button. Power-on state the first time
    pub fn reset(&mut self) {
        self.interrupts = InterruptLines::new();
        self.dma.borrow_mut().take_request();
        self.ppu.borrow_mut().reset();
        self.dot_remainder = 0;

        let cycles = self.cpu.reset() as u32;
        // nothing is visible this early
        let mut discarded: Vec<Pixel> = Vec::new();
        self.clock_ppu(cycles, &mut discarded);
        self.cpu_cycles += cycles as u64;
    }

    /// Execute one CPU instruction (or interrupt sequence) and the OAM DMA it
    /// may have triggered, then catch up the PPU. Returns the CPU cycles
    /// consumed
    pub fn step(&mut self, presenter: &mut dyn PixelSink) -> Result<u32, NesError> {
        let mut cycles = self.cpu.step(&mut self.interrupts)? as u32;

        let request = self.dma.borrow_mut().take_request();
        if let Some(page) = request {
            cycles += self.oam_dma(page, self.cpu_cycles + cycles as u64);
        }

        self.clock_ppu(cycles, presenter);
        self.cpu_cycles += cycles as u64;

        Ok(cycles)
    }

    /// Step until the PPU completes a frame. Returns the CPU cycles it took
    pub fn run_frame(&mut self, presenter: &mut dyn PixelSink) -> Result<u64, NesError> {
        let start = self.cpu_cycles;
        loop {
            self.step(presenter)?;

            let mut ppu = self.ppu.borrow_mut();
            if ppu.frame_ready() {
                ppu.frame_accepted();
                break;
            }
        }
        Ok(self.cpu_cycles - start)
    }

    /// CPU cycles elapsed since power-on
    pub fn cpu_cycles(&self) -> u64 {
        self.cpu_cycles
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn ppu(&self) -> Ref<'_, Ppu> {
        self.ppu.borrow()
    }

    pub fn cartridge(&self) -> Ref<'_, Cartridge> {
        self.cartridge.borrow()
    }

    pub fn controllers(&self) -> RefMut<'_, ControllerPorts> {
        self.controllers.borrow_mut()
    }

    /// CPU address space, with the same side effects a CPU access has
    pub fn main_bus(&self) -> RefMut<'_, MainBus> {
        self.main_bus.borrow_mut()
    }

    pub fn interrupts(&self) -> &InterruptLines {
        &self.interrupts
    }

    pub fn interrupts_mut(&mut self) -> &mut InterruptLines {
        &mut self.interrupts
    }

    // Copy a whole page into OAM. Returns the cycles the CPU is halted
    fn oam_dma(&mut self, page: u8, start_cycle: u64) -> u32 {
        debug!("OAM DMA from page ${page:0>2X}");
        let base = (page as u16) << 8;
        for offset in 0..=0xFF {
            let data = self.main_bus.borrow_mut().read(base | offset);
            self.ppu.borrow_mut().oam_dma_write(data);
        }
        DmaController::transfer_cycles(start_cycle)
    }

    fn clock_ppu(&mut self, cycles: u32, presenter: &mut dyn PixelSink) {
        self.dot_remainder += cycles * self.clock_ratio.dots;
        while self.dot_remainder >= self.clock_ratio.cycles {
            self.dot_remainder -= self.clock_ratio.cycles;
            self.tick_ppu(presenter);
        }
    }

    // NMI is forwarded right after the dot that raised it, the CPU sees it on
    // its next step
    fn tick_ppu(&mut self, presenter: &mut dyn PixelSink) {
        let mut ppu = self.ppu.borrow_mut();
        if let Some(pixel) = ppu.tick() {
            presenter.put_pixel(pixel);
        }

        if ppu.is_nmi_requested() {
            ppu.nmi_accepted();
            self.interrupts.raise_nmi();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Region;

    // JMP $8000 forever
    fn looping_image() -> CartridgeImage {
        let mut program = vec![0xEA; 0x4000];
        program[0..3].copy_from_slice(&[0x4C, 0x00, 0x80]);
        program[0x3FFC] = 0x00;
        program[0x3FFD] = 0x80;
        CartridgeImage::new(program)
    }

    fn nes(region: Region) -> Nes {
        let settings = NesSettings {
            region,
            ..Default::default()
        };
        Nes::new(looping_image(), settings).unwrap()
    }

    fn dots_elapsed(nes: &Nes) -> u64 {
        let ppu = nes.ppu();
        let dots_per_frame = match nes.clock_ratio.dots {
            3 => 341 * 262,
            _ => 341 * 312,
        };
        ppu.frame_count() * dots_per_frame + ppu.scanline() as u64 * 341 + ppu.dot() as u64
    }

    #[test]
    fn test_reset_runs_reset_sequence() {
        let nes = nes(Region::Ntsc);
        assert_eq!(nes.cpu().pc(), 0x8000);
        assert_eq!(nes.cpu_cycles(), 7);
        assert_eq!(nes.ppu().dot(), 21);
    }

    #[test]
    fn test_ntsc_three_dots_per_cycle() {
        let mut nes = nes(Region::Ntsc);
        let mut pixels: Vec<Pixel> = Vec::new();
        for _ in 0..100 {
            nes.step(&mut pixels).unwrap();
        }
        assert_eq!(dots_elapsed(&nes), nes.cpu_cycles() * 3);
    }

    #[test]
    fn test_pal_ratio_does_not_drift() {
        let mut nes = nes(Region::Pal);
        let mut pixels: Vec<Pixel> = Vec::new();
        for _ in 0..10_000 {
            nes.step(&mut pixels).unwrap();
        }
        let expected = nes.cpu_cycles() * 16 / 5;
        assert_eq!(dots_elapsed(&nes), expected);
    }

    #[test]
    fn test_run_frame() {
        let mut nes = nes(Region::Ntsc);
        let mut pixels: Vec<Pixel> = Vec::new();
        // the first dots of frame 0 went by during the reset sequence
        nes.run_frame(&mut pixels).unwrap();
        assert_eq!(pixels.len(), 256 * 240 - 20);
        assert!(!nes.ppu().frame_ready());

        pixels.clear();
        let cycles = nes.run_frame(&mut pixels).unwrap();
        assert_eq!(pixels.len(), 256 * 240);
        // 89342 dots per frame, give or take an instruction
        assert!((29_776..=29_786).contains(&cycles));
    }

    #[test]
    fn test_invalid_cartridge_is_rejected() {
        let result = Nes::new(CartridgeImage::new(vec![0; 0x1000]), NesSettings::default());
        assert!(matches!(result, Err(NesError::Cartridge(_))));
    }
}
