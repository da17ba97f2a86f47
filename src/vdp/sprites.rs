use super::memory::VideoMemory;
use super::pattern::{draw_pattern, NameEntry};
use super::pixel::LineBuffer;
use super::registers::{bits, Registers};
use super::SCREEN_WIDTH;

/// Entries in the sprite attribute table; also the hard bound on a chain walk.
pub const SPRITE_TABLE_CAPACITY: usize = 64;
pub const MAX_SPRITES_PER_LINE: usize = 16;
pub const MAX_SPRITE_PIXELS_PER_LINE: usize = 256;

const SPRITE_ENTRY_BYTES: u16 = 8;
// Sprite coordinates are stored with this bias.
const SPRITE_ORIGIN: i32 = 128;

/// One decoded 8-byte sprite attribute entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteEntry {
    pub y: i32,
    /// Height in cells, 1..=4.
    pub height: i32,
    /// Width in cells, 1..=4.
    pub width: i32,
    pub link: u8,
    pub pattern: NameEntry,
    pub x: i32,
}

impl SpriteEntry {
    pub fn read<M: VideoMemory + ?Sized>(mem: &M, table: u16, index: u8) -> Self {
        let addr = table.wrapping_add(index as u16 * SPRITE_ENTRY_BYTES);
        let size = mem.vram_byte(addr.wrapping_add(2)) as u16;

        Self {
            y: bits(mem.vram_word(addr), 0, 10) as i32 - SPRITE_ORIGIN,
            height: bits(size, 0, 2) as i32 + 1,
            width: bits(size, 2, 2) as i32 + 1,
            link: bits(mem.vram_byte(addr.wrapping_add(3)) as u16, 0, 7) as u8,
            pattern: NameEntry(mem.vram_word(addr.wrapping_add(4))),
            x: bits(mem.vram_word(addr.wrapping_add(6)), 0, 10) as i32 - SPRITE_ORIGIN,
        }
    }

    pub fn covers_line(&self, line: i32) -> bool {
        line >= self.y && line < self.y + self.height * 8
    }

    pub fn on_screen_horizontally(&self) -> bool {
        self.x > -self.width * 8 && self.x < SCREEN_WIDTH as i32
    }
}

/// Table indices in link order, starting at entry 0.
#[derive(Debug, Clone)]
pub struct SpriteChain {
    indices: [u8; SPRITE_TABLE_CAPACITY],
    len: usize,
}

impl SpriteChain {
    /// Follows the link fields from entry 0. The entry whose link is 0 ends
    /// the chain and is included, so it is drawn like any other entry; a
    /// cyclic chain stops after `SPRITE_TABLE_CAPACITY` entries.
    pub fn walk<M: VideoMemory + ?Sized>(mem: &M, table: u16) -> Self {
        let mut chain = Self {
            indices: [0; SPRITE_TABLE_CAPACITY],
            len: 0,
        };
        let mut index = 0u8;
        while chain.len < SPRITE_TABLE_CAPACITY {
            chain.indices[chain.len] = index;
            chain.len += 1;

            let link = SpriteEntry::read(mem, table, index).link;
            if link == 0 {
                break;
            }
            index = link;
        }
        chain
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.indices[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

/// Which per-line limit stopped sprite rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteLimit {
    SpriteCount,
    PixelBudget,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteStats {
    /// Sprites covering the line that were processed, including ones clipped
    /// horizontally.
    pub visible: usize,
    /// Sprite pixels emitted, 8 per cell column, transparent or not.
    pub pixels: usize,
    pub limit: Option<SpriteLimit>,
}

/// Draws every sprite on `line`.
///
/// The chain is processed tail first so entry 0 is drawn last and wins
/// priority ties. Processing stops as soon as 256 pixels have been emitted
/// (even mid-sprite) or 16 covering sprites have been counted.
pub fn draw_sprites<M: VideoMemory + ?Sized>(
    buf: &mut LineBuffer,
    mem: &M,
    regs: &Registers,
    line: usize,
) -> SpriteStats {
    let table = regs.sprite_table_base();
    let chain = SpriteChain::walk(mem, table);
    let line = line as i32;
    let mut stats = SpriteStats::default();

    if line == 0 && crate::debug_flags::trace_sprites() {
        log::trace!("sprite chain ({} entries): {:?}", chain.len(), chain.as_slice());
    }

    for &index in chain.as_slice().iter().rev() {
        let sprite = SpriteEntry::read(mem, table, index);

        if line == 0 && crate::debug_flags::trace_sprites() {
            log::trace!(
                "sprite {}: x={} y={} size={}x{} name=0x{:04X}",
                index,
                sprite.x,
                sprite.y,
                sprite.width,
                sprite.height,
                sprite.pattern.0
            );
        }

        if !sprite.covers_line(line) {
            continue;
        }

        let offset = line - sprite.y;
        let sub_row = (offset & 7) as u8;
        let mut row = offset >> 3;
        if sprite.pattern.flip_v() {
            row = sprite.height - 1 - row;
        }

        if sprite.on_screen_horizontally() {
            // Cells are stored column-major: one column to the right is
            // `height` tiles further on.
            let mut pattern = sprite.pattern.offset_tile(row);
            let step = if sprite.pattern.flip_h() {
                pattern = pattern.offset_tile(sprite.height * (sprite.width - 1));
                -sprite.height
            } else {
                sprite.height
            };

            for col in 0..sprite.width {
                draw_pattern(buf, mem, sprite.x + col * 8, pattern, sub_row);
                stats.pixels += 8;
                if stats.pixels >= MAX_SPRITE_PIXELS_PER_LINE {
                    stats.limit = Some(SpriteLimit::PixelBudget);
                    return stats;
                }
                pattern = pattern.offset_tile(step);
            }
        }

        stats.visible += 1;
        if stats.visible >= MAX_SPRITES_PER_LINE {
            stats.limit = Some(SpriteLimit::SpriteCount);
            return stats;
        }
    }

    stats
}
