use nes_core::errors::NesError;
use nes_core::interfaces::Bus;
use nes_core::processor::registers::Registers;
use nes_core::processor::status_register::StatusRegisterFlag;
use nes_core::{Buttons, CartridgeImage, Nes, NesSettings, OpcodeFidelity, Pixel, Region};

const CODE: u16 = 0x8000;
const NMI_HANDLER: u16 = 0x9000;

/// 16 kB NROM image with `code` at $8000 and `nmi` at $9000
fn image(code: &[u8], nmi: &[u8]) -> CartridgeImage {
    let mut program = vec![0xEA; 0x4000];
    program[..code.len()].copy_from_slice(code);
    let handler = (NMI_HANDLER - CODE) as usize;
    program[handler..handler + nmi.len()].copy_from_slice(nmi);

    let vectors = [NMI_HANDLER, CODE, NMI_HANDLER];
    for (i, vector) in vectors.iter().enumerate() {
        program[0x3FFA + 2 * i] = *vector as u8;
        program[0x3FFB + 2 * i] = (*vector >> 8) as u8;
    }
    CartridgeImage::new(program)
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn nes(code: &[u8]) -> Nes {
    init_logging();
    Nes::new(image(code, &[0x40]), NesSettings::default()).unwrap()
}

fn steps(nes: &mut Nes, count: usize) -> u32 {
    let mut pixels: Vec<Pixel> = Vec::new();
    (0..count).map(|_| nes.step(&mut pixels).unwrap()).sum()
}

#[test]
fn test_lda_sta_nop() {
    // LDA #$01; STA $0200; NOP
    let mut nes = nes(&[0xA9, 0x01, 0x8D, 0x00, 0x02, 0xEA]);

    assert_eq!(steps(&mut nes, 3), 2 + 4 + 2);
    assert_eq!(nes.cpu().registers().acc, 1);
    assert_eq!(nes.main_bus().read(0x0200), 1);
    assert_eq!(nes.cpu().pc(), 0x8006);
}

#[test]
fn test_ram_mirroring() {
    // LDA #$5A; STA $0123; LDX $1923; LDY $0923
    let mut nes = nes(&[
        0xA9, 0x5A, 0x8D, 0x23, 0x01, 0xAE, 0x23, 0x19, 0xAC, 0x23, 0x09,
    ]);
    steps(&mut nes, 4);
    assert_eq!(nes.cpu().registers().x_reg, 0x5A);
    assert_eq!(nes.cpu().registers().y_reg, 0x5A);

    let mut bus = nes.main_bus();
    for base in (0x0000..0x0800).step_by(0x7F) {
        bus.write(base, base as u8 ^ 0xFF);
        for mirror in [0x0800, 0x1000, 0x1800] {
            assert_eq!(bus.read(base + mirror), base as u8 ^ 0xFF);
        }
    }
}

#[test]
fn test_ppu_status_double_read() {
    // JMP $8000
    let mut nes = nes(&[0x4C, 0x00, 0x80]);
    let mut pixels: Vec<Pixel> = Vec::new();
    nes.run_frame(&mut pixels).unwrap();

    let mut bus = nes.main_bus();
    assert_eq!(bus.read(0x2002) & 0x80, 0x80);
    assert_eq!(bus.read(0x2002) & 0x80, 0);
    // registers are mirrored every 8 bytes
    assert_eq!(bus.read(0x3FFA) & 0x80, 0);
}

#[test]
fn test_scroll_latch_order() {
    // LDA #$7D; STA $2005; LDA $2002; LDA #$20; STA $2005; LDA #$48; STA $2005
    let mut nes = nes(&[
        0xA9, 0x7D, 0x8D, 0x05, 0x20, 0xAD, 0x02, 0x20, 0xA9, 0x20, 0x8D, 0x05, 0x20, 0xA9,
        0x48, 0x8D, 0x05, 0x20,
    ]);
    steps(&mut nes, 7);

    let ppu = nes.ppu();
    assert_eq!(ppu.scroll().x(), 0x20);
    assert_eq!(ppu.scroll().y(), 0x48);
}

#[test]
fn test_nmi_preempts_interrupt_disable() {
    // SEI; LDA #$80; STA $2000; JMP $8006
    let code = [0x78, 0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x06, 0x80];
    // INX; RTI
    let mut nes = Nes::new(image(&code, &[0xE8, 0x40]), NesSettings::default()).unwrap();
    let mut pixels: Vec<Pixel> = Vec::new();
    nes.run_frame(&mut pixels).unwrap();
    assert!(nes.interrupts().nmi_pending());

    let before: Registers = *nes.cpu().registers();
    assert!(before.sr.get(StatusRegisterFlag::InterruptDisable));

    assert_eq!(nes.step(&mut pixels).unwrap(), 7);
    assert_eq!(nes.cpu().pc(), NMI_HANDLER);

    steps(&mut nes, 2);
    let after = nes.cpu().registers();
    assert_eq!(after.pc, before.pc);
    assert_eq!(after.sp, before.sp);
    assert_eq!(u8::from(after.sr), u8::from(before.sr));
    assert_eq!(after.acc, before.acc);
    assert_eq!(after.x_reg, before.x_reg + 1);
}

#[test]
fn test_oam_dma() {
    // LDA #$02; STA $4014
    let mut nes = nes(&[0xA9, 0x02, 0x8D, 0x14, 0x40]);
    for offset in 0..=0xFF {
        nes.main_bus().write(0x0200 + offset, offset as u8);
    }

    steps(&mut nes, 1);
    let start = nes.cpu_cycles() + 4;
    let cycles = steps(&mut nes, 1);
    assert_eq!(cycles as u64, 4 + 513 + (start & 1));

    let ppu = nes.ppu();
    let sprite = ppu.oam().sprite(0);
    assert_eq!((sprite.y, sprite.tile, sprite.attributes, sprite.x), (0, 1, 2, 3));
    assert_eq!(ppu.oam().sprite(63).x, 0xFF);
}

// Opaque tile 1 for sprite 0 at (20, 10), over an opaque or empty background
fn sprite_zero_nes(opaque_background: bool) -> Nes {
    let nes = nes(&[0x4C, 0x00, 0x80]);
    {
        let mut bus = nes.main_bus();
        let mut write_vram = |address: u16, data: &[u8]| {
            bus.write(0x2006, (address >> 8) as u8);
            bus.write(0x2006, address as u8);
            for byte in data {
                bus.write(0x2007, *byte);
            }
        };
        write_vram(0x0010, &[0xFF; 8]);
        if opaque_background {
            write_vram(0x2000, &[0x01; 960]);
        }
        write_vram(0x3F00, &[0x0F, 0x01]);
        write_vram(0x3F11, &[0x21]);

        bus.write(0x2003, 0);
        for byte in [9, 1, 0, 20] {
            bus.write(0x2004, byte);
        }
        bus.write(0x2006, 0);
        bus.write(0x2006, 0);
        bus.write(0x2001, 0x1E);
    }
    nes
}

#[test]
fn test_sprite_zero_hit_fixture() {
    let mut pixels: Vec<Pixel> = Vec::new();

    let mut nes = sprite_zero_nes(true);
    nes.run_frame(&mut pixels).unwrap();
    assert!(nes.ppu().registers().sprite_0_hit());
    assert_eq!(nes.main_bus().read(0x2002) & 0x40, 0x40);

    let hit_line: Vec<u8> = pixels
        .iter()
        .filter(|pixel| pixel.y == 10 && (19..=28).contains(&pixel.x))
        .map(|pixel| pixel.color_index)
        .collect();
    assert_eq!(
        hit_line,
        vec![0x01, 0x21, 0x21, 0x21, 0x21, 0x21, 0x21, 0x21, 0x21, 0x01]
    );

    let mut nes = sprite_zero_nes(false);
    nes.run_frame(&mut pixels).unwrap();
    assert!(!nes.ppu().registers().sprite_0_hit());
}

#[test]
fn test_controller_through_bus() {
    let nes = nes(&[0x4C, 0x00, 0x80]);
    nes.controllers().one.set_buttons(Buttons::A | Buttons::RIGHT);

    let mut bus = nes.main_bus();
    bus.write(0x4016, 1);
    bus.write(0x4016, 0);
    let reads: Vec<u8> = (0..8).map(|_| bus.read(0x4016)).collect();
    assert_eq!(reads, vec![0x41, 0x40, 0x40, 0x40, 0x40, 0x40, 0x40, 0x41]);
}

// Enables rendering and NMI, then counts frames in $10 from the NMI handler
fn busy_program() -> CartridgeImage {
    let code = [
        0xA9, 0x1E, 0x8D, 0x01, 0x20, // LDA #$1E; STA $2001
        0xA9, 0x80, 0x8D, 0x00, 0x20, // LDA #$80; STA $2000
        0xE8, 0x4C, 0x0A, 0x80, // INX; JMP $800A
    ];
    // INC $10; RTI
    image(&code, &[0xE6, 0x10, 0x40])
}

fn trace(frames: usize) -> (Vec<Registers>, Vec<Pixel>) {
    let mut nes = Nes::new(busy_program(), NesSettings::default()).unwrap();
    let mut registers = Vec::new();
    let mut pixels: Vec<Pixel> = Vec::new();
    while nes.ppu().frame_count() < frames as u64 {
        nes.step(&mut pixels).unwrap();
        registers.push(*nes.cpu().registers());
    }
    (registers, pixels)
}

#[test]
fn test_determinism() {
    let (registers, pixels) = trace(3);
    let (registers_again, pixels_again) = trace(3);

    assert_eq!(registers, registers_again);
    assert_eq!(pixels, pixels_again);
    assert!(pixels.len() >= 2 * 256 * 240);
}

#[test]
fn test_nmi_handler_runs_once_per_frame() {
    let mut nes = Nes::new(busy_program(), NesSettings::default()).unwrap();
    let mut pixels: Vec<Pixel> = Vec::new();
    for _ in 0..5 {
        nes.run_frame(&mut pixels).unwrap();
    }
    // the last NMI is still pending
    steps(&mut nes, 3);
    assert_eq!(nes.main_bus().read(0x0010), 5);
}

#[test]
fn test_pal_frame_length() {
    let settings = NesSettings {
        region: Region::Pal,
        ..Default::default()
    };
    let mut nes = Nes::new(image(&[0x4C, 0x00, 0x80], &[0x40]), settings).unwrap();
    let mut pixels: Vec<Pixel> = Vec::new();
    nes.run_frame(&mut pixels).unwrap();

    // 341 * 312 dots at 3.2 dots per cycle
    let cycles = nes.run_frame(&mut pixels).unwrap();
    assert!((33_245..=33_251).contains(&cycles));
}

#[test]
fn test_strict_fidelity_reports_undocumented_opcodes() {
    // LAX $10
    let mut nes = nes(&[0xA7, 0x10]);
    let mut pixels: Vec<Pixel> = Vec::new();
    assert!(matches!(
        nes.step(&mut pixels),
        Err(NesError::UnsupportedOpcode {
            opcode: 0xA7,
            address: 0x8000
        })
    ));

    let settings = NesSettings {
        opcode_fidelity: OpcodeFidelity::NopStub,
        ..Default::default()
    };
    let mut nes = Nes::new(image(&[0xA7, 0x10], &[0x40]), settings).unwrap();
    assert_eq!(nes.step(&mut pixels).unwrap(), 3);
    assert_eq!(nes.cpu().pc(), 0x8002);
}

#[test]
fn test_jam_stops_the_cpu() {
    let mut nes = nes(&[0x02]);
    let mut pixels: Vec<Pixel> = Vec::new();
    assert!(matches!(
        nes.step(&mut pixels),
        Err(NesError::CpuJammed { opcode: 0x02, .. })
    ));
}

#[test]
fn test_unsupported_mapper() {
    let mut image = image(&[], &[]);
    image.mapper_id = 1;
    assert!(matches!(
        Nes::new(image, NesSettings::default()),
        Err(NesError::UnsupportedMapper(1))
    ));
}
