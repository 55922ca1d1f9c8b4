//! NES emulator core
//!
//! CPU, main bus, PPU and cartridge of a Nintendo Entertainment System,
//! advanced in lockstep by [`Nes`]. Loading ROM files, presenting pixels and
//! reading input devices are left to the host: it hands a [`CartridgeImage`]
//! in, gets [`Pixel`]s out through a [`PixelSink`] and feeds the controllers.

pub mod cartridge;
pub mod controller;
pub mod dma;
pub mod errors;
pub mod graphics;
pub mod hardware;
pub mod interfaces;
pub mod interrupts;
pub mod io;
pub mod mappers;
pub mod nes;
pub mod processor;
pub mod settings;
pub mod types;
pub mod utils;

pub use cartridge::{Cartridge, CartridgeImage, GraphicsMemory, Mirroring};
pub use controller::Buttons;
pub use errors::NesError;
pub use graphics::{Frame, Pixel, PixelSink};
pub use nes::Nes;
pub use settings::{NesSettings, OpcodeFidelity, RamPowerOn, Region};
