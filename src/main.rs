use std::env;
use std::fs;

use anyhow::{bail, Context, Result};
use log::info;

use nes_core::{CartridgeImage, Frame, Nes, NesSettings, Region};

const DEFAULT_FRAMES: u64 = 60;

/// Headless runner: loads a raw program ROM (16 or 32 kB, no header), runs a
/// number of frames and logs a summary of the last one
fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: nes-core <program.bin> [frames] [--pal]");
    };

    let mut frames = DEFAULT_FRAMES;
    let mut settings = NesSettings::default();
    for arg in args {
        match arg.as_str() {
            "--pal" => settings.region = Region::Pal,
            count => {
                frames = count
                    .parse()
                    .with_context(|| format!("invalid frame count '{count}'"))?
            }
        }
    }

    let program = fs::read(&path).with_context(|| format!("can't read program ROM {path}"))?;
    let mut nes = Nes::new(CartridgeImage::new(program), settings)?;

    let mut frame = Frame::default();
    for _ in 0..frames {
        nes.run_frame(&mut frame)?;
    }

    let checksum = frame
        .iter()
        .flatten()
        .fold(0u32, |hash, color| hash.rotate_left(5) ^ *color as u32);
    info!(
        "{frames} frames, {} CPU cycles, PC ${:0>4X}, frame checksum {checksum:0>8X}",
        nes.cpu_cycles(),
        nes.cpu().pc()
    );

    Ok(())
}
