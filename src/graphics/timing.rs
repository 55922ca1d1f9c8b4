//! PPU raster position
//!
//! Scanline and dot counters plus frame parity. The frame shape comes from a
//! [`FrameTiming`], so NTSC and PAL share all the code.

use crate::hardware::{LAST_DOT, VISIBLE_SCANLINES};
use crate::settings::FrameTiming;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterPosition {
    pub scanline: u16,
    pub dot: u16,
    pub frame: u64,
}

impl RasterPosition {
    pub fn is_visible_line(&self) -> bool {
        self.scanline < VISIBLE_SCANLINES
    }

    pub fn is_prerender_line(&self, timing: &FrameTiming) -> bool {
        self.scanline == timing.prerender_scanline
    }

    pub fn is_odd_frame(&self) -> bool {
        self.frame & 1 == 1
    }

    /// Move to the next dot. `short_frame` skips the last dot of the
    /// pre-render line (odd NTSC frames while rendering)
    pub fn advance(&mut self, timing: &FrameTiming, short_frame: bool) {
        let skip = short_frame
            && self.is_prerender_line(timing)
            && self.dot == LAST_DOT - 1;

        if self.dot < LAST_DOT && !skip {
            self.dot += 1;
            return;
        }

        self.dot = 0;
        self.scanline += 1;
        if self.scanline == timing.scanlines {
            self.scanline = 0;
            self.frame += 1;
        }
    }
}
