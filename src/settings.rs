//! NES configuration options
//!
//! Everything here is plain data. Timing variants are selected by [`Region`]
//! and consumed by the scheduler and the PPU state machine, neither of which
//! branches on the region itself.

use crate::hardware::{NTSC_SCANLINES, PAL_SCANLINES, VBLANK_SCANLINE};

pub struct NesSettings {
    /// Console timing variant
    pub region: Region,

    /// How undocumented opcodes are handled by the CPU
    pub opcode_fidelity: OpcodeFidelity,

    /// Contents of CPU RAM at power-on
    pub ram_power_on: RamPowerOn,
}

impl Default for NesSettings {
    fn default() -> Self {
        Self {
            region: Region::Ntsc,
            opcode_fidelity: OpcodeFidelity::Strict,
            ram_power_on: RamPowerOn::Zeroed,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Ntsc,
    Pal,
}

impl Region {
    pub fn timing(&self) -> FrameTiming {
        match self {
            Region::Ntsc => FrameTiming {
                scanlines: NTSC_SCANLINES,
                vblank_scanline: VBLANK_SCANLINE,
                prerender_scanline: NTSC_SCANLINES - 1,
                odd_frame_skip: true,
                ppu_dots_per_cpu_cycle: ClockRatio { dots: 3, cycles: 1 },
            },
            Region::Pal => FrameTiming {
                scanlines: PAL_SCANLINES,
                vblank_scanline: VBLANK_SCANLINE,
                prerender_scanline: PAL_SCANLINES - 1,
                odd_frame_skip: false,
                ppu_dots_per_cpu_cycle: ClockRatio {
                    dots: 16,
                    cycles: 5,
                },
            },
        }
    }
}

/// Frame shape of a timing variant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTiming {
    /// Total scanlines per frame, pre-render line included
    pub scanlines: u16,

    /// First vblank scanline. Vblank flag is set on its dot 1
    pub vblank_scanline: u16,

    /// Last scanline of the frame, prepares rendering of scanline 0
    pub prerender_scanline: u16,

    /// Whether odd frames are one dot shorter when rendering is enabled
    pub odd_frame_skip: bool,

    pub ppu_dots_per_cpu_cycle: ClockRatio,
}

/// Rational CPU cycle to PPU dot ratio: `dots` PPU dots every `cycles` CPU
/// cycles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockRatio {
    pub dots: u32,
    pub cycles: u32,
}

/// Fidelity level for the 105 opcodes the 6502 documentation leaves undefined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpcodeFidelity {
    /// Undocumented opcodes stop the CPU with an unsupported opcode error
    #[default]
    Strict,

    /// Undocumented opcodes behave as NOPs with their real length and base
    /// cycle count
    NopStub,

    /// Stable undocumented opcodes are executed. Unstable ones are still
    /// unsupported
    Undocumented,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RamPowerOn {
    #[default]
    Zeroed,
    Filled(u8),
}

impl RamPowerOn {
    pub fn value(&self) -> u8 {
        match self {
            RamPowerOn::Zeroed => 0,
            RamPowerOn::Filled(value) => *value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_timing_ntsc() {
        let timing = Region::Ntsc.timing();
        assert_eq!(timing.scanlines, 262);
        assert_eq!(timing.prerender_scanline, 261);
        assert!(timing.odd_frame_skip);
        assert_eq!(timing.ppu_dots_per_cpu_cycle, ClockRatio { dots: 3, cycles: 1 });
    }

    #[test]
    fn test_region_timing_pal() {
        let timing = Region::Pal.timing();
        assert_eq!(timing.scanlines, 312);
        assert_eq!(timing.prerender_scanline, 311);
        assert!(!timing.odd_frame_skip);
        let ratio = timing.ppu_dots_per_cpu_cycle;
        assert_eq!(ratio.dots as f64 / ratio.cycles as f64, 3.2);
    }

    #[test]
    fn test_default_settings() {
        let settings = NesSettings::default();
        assert_eq!(settings.region, Region::Ntsc);
        assert_eq!(settings.opcode_fidelity, OpcodeFidelity::Strict);
        assert_eq!(settings.ram_power_on.value(), 0);
    }
}
