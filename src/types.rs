use std::cell::RefCell;
use std::rc::Rc;

use crate::cartridge::Cartridge;
use crate::controller::ControllerPorts;
use crate::dma::DmaController;
use crate::graphics::ppu::Ppu;
use crate::interfaces::{Bus, Memory};
use crate::processor::bus::MainBus;

pub type SharedPpu = Rc<RefCell<Ppu>>;
pub type SharedBus = Rc<RefCell<dyn Bus>>;
pub type SharedMainBus = Rc<RefCell<MainBus>>;
pub type SharedMemory = Rc<RefCell<dyn Memory>>;
pub type SharedCartridge = Rc<RefCell<Cartridge>>;
pub type SharedControllers = Rc<RefCell<ControllerPorts>>;
pub type SharedDma = Rc<RefCell<DmaController>>;
