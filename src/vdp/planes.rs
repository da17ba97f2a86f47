use super::error::RenderError;
use super::memory::VideoMemory;
use super::pattern::draw_nametable;
use super::pixel::LineBuffer;
use super::registers::{Registers, REG_PLANE_SIZE};
use super::{SCREEN_COLUMNS, SCREEN_WIDTH};

/// Window rows are always 40 entries wide.
const WINDOW_ROW_BYTES: usize = SCREEN_COLUMNS * 2;

/// Scrollable plane dimensions in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneSize {
    pub width: usize,
    pub height: usize,
}

fn tiles_for_code(code: u8) -> Option<usize> {
    match code {
        0 => Some(32),
        1 => Some(64),
        3 => Some(128),
        _ => None,
    }
}

impl PlaneSize {
    /// Decodes register 16. Code 2 is reserved on either axis.
    pub fn from_registers(regs: &Registers) -> Result<Self, RenderError> {
        let (w, h) = regs.plane_size_codes();
        match (tiles_for_code(w), tiles_for_code(h)) {
            (Some(width), Some(height)) => Ok(Self { width, height }),
            _ => Err(RenderError::InvalidConfiguration {
                register: REG_PLANE_SIZE,
                value: regs.raw(REG_PLANE_SIZE),
            }),
        }
    }
}

/// Draws one line of Plane A or B.
///
/// The plane is treated as a horizontally repeating strip. The first pass
/// draws from plane column 0 at `scrollx`; the second draws the part of the
/// strip that wraps in from the left, starting at the tile under screen x = 0.
pub fn draw_plane<M: VideoMemory + ?Sized>(
    buf: &mut LineBuffer,
    mem: &M,
    size: PlaneSize,
    line: usize,
    base: u16,
    hscroll: u16,
    vscroll: u16,
) {
    let width_px = size.width * 8;
    let height_px = size.height * 8;

    let y = (vscroll as usize + line) % height_px;
    let sub_row = (y & 7) as u8;
    let row_addr = base.wrapping_add(((y >> 3) * size.width * 2) as u16);

    let scrollx = hscroll as usize % width_px;

    // A 32-cell plane is narrower than the display and repeats within the line.
    let mut start = scrollx;
    while start < SCREEN_WIDTH {
        let columns = ((SCREEN_WIDTH - start + 7) / 8).min(size.width);
        draw_nametable(buf, mem, start as i32, row_addr, columns, sub_row);
        start += width_px;
    }

    if scrollx > 0 {
        let left_px = width_px - scrollx;
        let col = left_px / 8;
        let fine = (left_px & 7) as i32;
        // One screen width of pixels; a fine offset exposes part of a 41st column.
        let columns = (size.width - col).min(SCREEN_COLUMNS + 1);
        draw_nametable(
            buf,
            mem,
            -fine,
            row_addr.wrapping_add((col * 2) as u16),
            columns,
            sub_row,
        );
    }
}

/// Draws one line of the window plane. The window never scrolls.
pub fn draw_window<M: VideoMemory + ?Sized>(buf: &mut LineBuffer, mem: &M, base: u16, line: usize) {
    let row_addr = base.wrapping_add(((line >> 3) * WINDOW_ROW_BYTES) as u16);
    draw_nametable(buf, mem, 0, row_addr, SCREEN_COLUMNS, (line & 7) as u8);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vdp::memory::VdpSnapshot;
    use crate::vdp::pattern::TILE_BYTES;
    use crate::vdp::pixel::Rgb;

    const BASE: u16 = 0xC000;
    const TILE_PIXELS: [[u8; 8]; 2] = [[1, 2, 3, 4, 5, 6, 7, 8], [9, 10, 11, 12, 13, 14, 15, 1]];

    fn unique_color(i: u8) -> u16 {
        (((i & 7) as u16) << 1) | ((((i >> 3) & 7) as u16) << 5)
    }

    fn pack_row(pixels: &[u8; 8]) -> [u8; 4] {
        let mut out = [0u8; 4];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = (pixels[i * 2] << 4) | pixels[i * 2 + 1];
        }
        out
    }

    fn column_entry(col: usize) -> (usize, u8) {
        (col % 2, ((col / 2) % 3) as u8)
    }

    // Every tile row of tiles 1 and 2 is the same, so any vertical position works.
    fn striped_plane(width: usize) -> VdpSnapshot {
        let mut snap = VdpSnapshot::new();
        for i in 0..64u8 {
            snap.write_cram(i, unique_color(i));
        }
        for (t, pixels) in TILE_PIXELS.iter().enumerate() {
            for row in 0..8u16 {
                snap.write_vram((t as u16 + 1) * TILE_BYTES + row * 4, &pack_row(pixels));
            }
        }
        for col in 0..width {
            let (tile, palette) = column_entry(col);
            let entry = ((palette as u16) << 13) | (tile as u16 + 1);
            snap.write_vram_word(BASE + (col * 2) as u16, entry);
        }
        snap
    }

    fn expected_plane_pixel(snap: &VdpSnapshot, p: usize) -> Rgb {
        let (tile, palette) = column_entry(p / 8);
        let index = palette * 16 + TILE_PIXELS[tile][p % 8];
        Rgb::from_cram(snap.cram_word(index))
    }

    #[test]
    fn test_plane_size_codes() {
        let mut raw = [0u8; crate::vdp::registers::REGISTER_COUNT];
        raw[REG_PLANE_SIZE] = 0x31;
        assert_eq!(
            PlaneSize::from_registers(&Registers::new(raw)),
            Ok(PlaneSize { width: 64, height: 128 })
        );

        raw[REG_PLANE_SIZE] = 0x02;
        assert_eq!(
            PlaneSize::from_registers(&Registers::new(raw)),
            Err(RenderError::InvalidConfiguration { register: REG_PLANE_SIZE, value: 0x02 })
        );

        raw[REG_PLANE_SIZE] = 0x20;
        assert!(PlaneSize::from_registers(&Registers::new(raw)).is_err());
    }

    #[test]
    fn test_wraparound_has_no_gaps_or_overdraw() {
        for (width, hscroll) in [0u16, 1, 7, 8, 100, 125, 255, 256, 319, 320, 511, 637, 1023]
            .iter()
            .flat_map(|&h| [32usize, 64, 128].map(|w| (w, h)))
        {
            let size = PlaneSize { width, height: 32 };
            let snap = striped_plane(size.width);
            let width_px = size.width * 8;
            let mut buf = LineBuffer::new();
            draw_plane(&mut buf, &snap, size, 0, BASE, hscroll, 0);
            let row = buf.visible();
            let scrollx = hscroll as usize % width_px;

            for (x, &pixel) in row.iter().enumerate() {
                let p = (x + width_px - scrollx) % width_px;
                assert_eq!(
                    pixel,
                    expected_plane_pixel(&snap, p),
                    "hscroll {} screen x {} plane x {}",
                    hscroll,
                    x,
                    p
                );
            }
        }
    }

    #[test]
    fn test_scroll_637_on_64_wide_plane() {
        let size = PlaneSize { width: 64, height: 32 };
        let snap = striped_plane(size.width);
        let mut buf = LineBuffer::new();
        draw_plane(&mut buf, &snap, size, 0, BASE, 637, 0);
        let row = buf.visible();

        // 637 mod 512 = 125: plane column 0 starts at x = 125 and x = 0 shows
        // plane pixel 387 (column 48, pixel 3).
        assert_eq!(row[125], expected_plane_pixel(&snap, 0));
        assert_eq!(row[124], expected_plane_pixel(&snap, 511));
        assert_eq!(row[0], expected_plane_pixel(&snap, 387));
    }

    #[test]
    fn test_narrow_plane_repeats_across_screen() {
        let size = PlaneSize { width: 32, height: 32 };
        let snap = striped_plane(size.width);
        let mut buf = LineBuffer::new();
        draw_plane(&mut buf, &snap, size, 0, BASE, 0, 0);
        let row = buf.visible();
        assert_eq!(row[256], expected_plane_pixel(&snap, 0));
        assert_eq!(row[319], expected_plane_pixel(&snap, 63));
    }

    #[test]
    fn test_vertical_scroll_wraps() {
        let mut snap = VdpSnapshot::new();
        snap.write_cram(1, 0x000E);
        // Tile 3 only has pixels on its row 4.
        snap.write_vram(3 * TILE_BYTES + 4 * 4, &[0x11, 0x11, 0x11, 0x11]);
        snap.write_vram_word(BASE, 0x0003);

        let size = PlaneSize { width: 32, height: 32 };
        let mut buf = LineBuffer::new();
        // (250 + 10) mod 256 = 4: row 0, sub-row 4.
        draw_plane(&mut buf, &snap, size, 10, BASE, 0, 250);
        let row = buf.visible();
        assert!(row[..8].iter().all(|&p| p == Rgb::from_cram(0x000E)));
        assert_eq!(row[8], Rgb::BLACK);
    }

    #[test]
    fn test_window_uses_fixed_forty_entry_rows() {
        let mut snap = VdpSnapshot::new();
        snap.write_cram(2, 0x00E0);
        snap.write_vram(TILE_BYTES + 3 * 4, &[0x22, 0x22, 0x22, 0x22]);
        // Row 5 (lines 40..48), last column.
        snap.write_vram_word(0xB000 + (5 * 80 + 39 * 2) as u16, 0x0001);

        let mut buf = LineBuffer::new();
        draw_window(&mut buf, &snap, 0xB000, 43);
        let row = buf.visible();
        assert!(row[312..].iter().all(|&p| p == Rgb::from_cram(0x00E0)));
        assert!(row[..312].iter().all(|&p| p == Rgb::BLACK));
    }
}
