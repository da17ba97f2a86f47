use super::memory::VideoMemory;
use super::pixel::LineBuffer;
use super::registers::{bit, bits};

pub const TILE_BYTES: u16 = 32;
const TILE_ROW_BYTES: u16 = 4;
const TILE_INDEX_MASK: u16 = 0x07FF;

/// Nametable entry / sprite pattern reference.
///
/// `p cc v h tttttttttttt`: priority, palette row, v-flip, h-flip, tile index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameEntry(pub u16);

impl NameEntry {
    #[inline]
    pub fn tile_index(self) -> u16 {
        bits(self.0, 0, 11)
    }

    #[inline]
    pub fn flip_h(self) -> bool {
        bit(self.0, 11)
    }

    #[inline]
    pub fn flip_v(self) -> bool {
        bit(self.0, 12)
    }

    #[inline]
    pub fn palette_row(self) -> u8 {
        bits(self.0, 13, 2) as u8
    }

    #[inline]
    pub fn priority(self) -> u8 {
        bits(self.0, 15, 1) as u8
    }

    /// Same attributes with the tile index advanced by `delta` cells. The
    /// index wraps inside its 11-bit field.
    pub fn offset_tile(self, delta: i32) -> Self {
        let index = (self.tile_index() as i32 + delta).rem_euclid(TILE_INDEX_MASK as i32 + 1);
        NameEntry((self.0 & !TILE_INDEX_MASK) | index as u16)
    }
}

/// Draws row `sub_row` (0..8) of the tile referenced by `entry` at screen `x`.
/// Colour index 0 is transparent and leaves the buffer untouched.
pub fn draw_pattern<M: VideoMemory + ?Sized>(
    buf: &mut LineBuffer,
    mem: &M,
    x: i32,
    entry: NameEntry,
    sub_row: u8,
) {
    let sub_row = (sub_row & 7) as u16;
    let row = if entry.flip_v() { 7 - sub_row } else { sub_row };
    let row_addr = (entry.tile_index() * TILE_BYTES).wrapping_add(row * TILE_ROW_BYTES);
    let palette_base = entry.palette_row() * 16;
    let priority = entry.priority();
    let flip_h = entry.flip_h();

    for i in 0..TILE_ROW_BYTES {
        let src = if flip_h { TILE_ROW_BYTES - 1 - i } else { i };
        let byte = mem.vram_byte(row_addr.wrapping_add(src));
        let (left, right) = if flip_h {
            (byte & 0x0F, byte >> 4)
        } else {
            (byte >> 4, byte & 0x0F)
        };

        let px = x + (i as i32) * 2;
        if left != 0 {
            buf.draw(px, mem.cram_word(palette_base + left), priority);
        }
        if right != 0 {
            buf.draw(px + 1, mem.cram_word(palette_base + right), priority);
        }
    }
}

/// Draws `columns` consecutive nametable entries starting at VRAM `addr`,
/// left to right from screen `x`.
pub fn draw_nametable<M: VideoMemory + ?Sized>(
    buf: &mut LineBuffer,
    mem: &M,
    x: i32,
    addr: u16,
    columns: usize,
    sub_row: u8,
) {
    for col in 0..columns {
        let entry = NameEntry(mem.vram_word(addr.wrapping_add((col * 2) as u16)));
        draw_pattern(buf, mem, x + (col as i32) * 8, entry, sub_row);
    }
}
