//! NES hardware constants

// Main bus
// --------
//
// Main address space for the NES. The CPU sees RAM, PPU registers, APU/IO
// registers and the cartridge through it.

// Memory - 2 kB RAM mirrored 3 times (used by the CPU)
pub const RAM_START: u16 = 0x0000;
pub const RAM_END: u16 = 0x1FFF;
pub const RAM_SIZE: u16 = 0x0800;

// PPU registers - 8 registers mirrored 1023 times
pub const PPU_REGISTERS_START: u16 = 0x2000;
pub const PPU_REGISTERS_END: u16 = 0x3FFF;
pub const PPU_REGISTERS_SIZE: u16 = 8;

pub const PPUCTRL: u16 = 0x2000;
pub const PPUMASK: u16 = 0x2001;
pub const PPUSTATUS: u16 = 0x2002;
pub const OAMADDR: u16 = 0x2003;
pub const OAMDATA: u16 = 0x2004;
pub const PPUSCROLL: u16 = 0x2005;
pub const PPUADDR: u16 = 0x2006;
pub const PPUDATA: u16 = 0x2007;

// APU and I/O registers. Audio is not emulated but the addresses still belong
// to someone
pub const APU_REGISTERS_START: u16 = 0x4000;
pub const APU_REGISTERS_END: u16 = 0x4013;
pub const APU_STATUS: u16 = 0x4015;
pub const APU_TEST_MODE_START: u16 = 0x4018;
pub const APU_TEST_MODE_END: u16 = 0x401F;

// DMA
pub const OAM_DMA: u16 = 0x4014;

// Controllers
pub const CONTROLLER_PORT_1: u16 = 0x4016;
pub const CONTROLLER_PORT_2: u16 = 0x4017;

// Cartridge PRG ROM and RAM space
pub const CARTRIDGE_START: u16 = 0x4020;
pub const CARTRIDGE_END: u16 = 0xFFFF;

pub const CARTRIDGE_EXPANSION_ROM_START: u16 = 0x4020;
pub const CARTRIDGE_EXPANSION_ROM_END: u16 = 0x5FFF;

pub const CARTRIDGE_RAM_START: u16 = 0x6000;
pub const CARTRIDGE_RAM_END: u16 = 0x7FFF;

pub const CARTRIDGE_ROM_START: u16 = 0x8000;
pub const CARTRIDGE_ROM_END: u16 = 0xFFFF;

// Interrupt vectors
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

// Stack lives in page one
pub const STACK_PAGE: u16 = 0x0100;

// Graphics bus
// ------------
//
// Address space for the PPU and graphics. It's a 14-bit address space
// completely separated from the main bus (used by the CPU).

pub const GRAPHICS_ADDRESS_MASK: u16 = 0x3FFF;

// Pattern tables - area of memory that defines the shapes of tiles that make up
// backgrounds and sprites. Also known as CHR, provided by the cartridge
pub const PATTERN_TABLES_START: u16 = 0x0000;
pub const PATTERN_TABLES_END: u16 = 0x1FFF;
pub const CHR_MEMORY_SIZE: usize = 0x2000;
pub const PATTERN_TABLE_SIZE: u16 = 0x1000;

// Nametables - also known as VRAM. Four logical 1 kB tables backed by 2 kB
// (or 4 kB for four-screen boards)
pub const NAMETABLES_START: u16 = 0x2000;
pub const NAMETABLES_END: u16 = 0x3EFF;
pub const NAMETABLE_SIZE: u16 = 0x0400;
pub const ATTRIBUTE_TABLE_OFFSET: u16 = 0x03C0;

// Palettes - 32 bytes mirrored up to $3FFF
pub const PALETTE_MEMORY_START: u16 = 0x3F00;
pub const PALETTE_MEMORY_END: u16 = 0x3FFF;
pub const PALETTE_MEMORY_SIZE: u16 = 0x20;

// OAM
pub const OAM_SIZE: usize = 256;
pub const OAM_SPRITES: usize = 64;
pub const SPRITES_PER_LINE: usize = 8;
pub const SPRITE_HEIGHT: u16 = 8;
pub const TALL_SPRITE_HEIGHT: u16 = 16;

// Screen
// ------

pub const SCREEN_HEIGHT: usize = 240;
pub const SCREEN_WIDTH: usize = 256;

// Timing
// ------

pub const DOTS_PER_SCANLINE: u16 = 341;
pub const LAST_DOT: u16 = DOTS_PER_SCANLINE - 1;
pub const VISIBLE_SCANLINES: u16 = 240;
pub const VBLANK_SCANLINE: u16 = 241;

pub const NTSC_SCANLINES: u16 = 262;
pub const PAL_SCANLINES: u16 = 312;

pub const RESET_CYCLES: u8 = 7;
pub const INTERRUPT_CYCLES: u8 = 7;
pub const OAM_DMA_CYCLES: u32 = 513;
