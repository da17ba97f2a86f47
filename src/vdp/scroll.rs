use super::error::{RenderError, UnsupportedMode};
use super::memory::VideoMemory;
use super::registers::{HScrollMode, Registers};

const SCROLL_MASK: u16 = 0x3FF;

/// Scroll values for Plane A and Plane B, already masked to 10 bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollPair {
    pub a: u16,
    pub b: u16,
}

/// Row of the horizontal scroll table used for `line`.
pub fn hscroll_table_index(mode: HScrollMode, line: usize) -> usize {
    match mode {
        HScrollMode::FullScreen => 0,
        HScrollMode::FirstEightLines => line & 7,
        HScrollMode::PerCellRow => line & !7,
        HScrollMode::PerLine => line,
    }
}

/// Reads the horizontal scroll for both planes. Each table row is 4 bytes:
/// the Plane A word followed by the Plane B word.
pub fn fetch_hscroll<M: VideoMemory + ?Sized>(mem: &M, regs: &Registers, line: usize) -> ScrollPair {
    let index = hscroll_table_index(regs.hscroll_mode(), line);
    let slot = regs.hscroll_table_base().wrapping_add((index * 4) as u16);
    ScrollPair {
        a: mem.vram_word(slot) & SCROLL_MASK,
        b: mem.vram_word(slot.wrapping_add(2)) & SCROLL_MASK,
    }
}

/// Reads the full-screen vertical scroll from VSRAM slots 0 (A) and 1 (B).
pub fn fetch_vscroll<M: VideoMemory + ?Sized>(
    mem: &M,
    regs: &Registers,
) -> Result<ScrollPair, RenderError> {
    if regs.column_vscroll() {
        return Err(UnsupportedMode::ColumnVerticalScroll.into());
    }
    Ok(ScrollPair {
        a: mem.vsram_word(0) & SCROLL_MASK,
        b: mem.vsram_word(1) & SCROLL_MASK,
    })
}
