use super::registers::bits;
use super::{LINE_PADDING, SCREEN_WIDTH};

/// 8-bit per channel output colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Decodes a CRAM word (`----BBB-GGG-RRR-`).
    pub fn from_cram(color: u16) -> Self {
        Self {
            r: expand_channel(bits(color, 1, 3) as u8),
            g: expand_channel(bits(color, 5, 3) as u8),
            b: expand_channel(bits(color, 9, 3) as u8),
        }
    }
}

/// 3-bit channel to 8-bit: 0..7 -> 0, 36, 73, 109, 146, 182, 219, 255.
#[inline]
pub fn expand_channel(v3: u8) -> u8 {
    let v3 = v3 & 7;
    (v3 << 5) | (v3 << 2) | (v3 >> 1)
}

/// One cell of the line buffer. The priority never leaves the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pixel {
    pub rgb: Rgb,
    pub priority: u8,
}

const PADDED_WIDTH: usize = LINE_PADDING + SCREEN_WIDTH + LINE_PADDING;

/// Line buffer with `LINE_PADDING` spare cells on both sides of the visible
/// 320 pixels. Screen x is signed; x = 0 is the first visible pixel.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    cells: [Pixel; PADDED_WIDTH],
}

impl LineBuffer {
    pub fn new() -> Self {
        Self {
            cells: [Pixel::default(); PADDED_WIDTH],
        }
    }

    /// Priority-gated write: the cell takes `color` iff `priority` is at least
    /// the priority already stored there, so equal priorities go to the later
    /// draw. Writes past the padding are dropped.
    #[inline]
    pub fn draw(&mut self, x: i32, color: u16, priority: u8) {
        let index = x + LINE_PADDING as i32;
        if index < 0 {
            return;
        }
        if let Some(cell) = self.cells.get_mut(index as usize) {
            if priority >= cell.priority {
                cell.rgb = Rgb::from_cram(color);
                cell.priority = priority;
            }
        }
    }

    /// Paints every visible cell through the compositor.
    pub fn fill(&mut self, color: u16, priority: u8) {
        for x in 0..SCREEN_WIDTH as i32 {
            self.draw(x, color, priority);
        }
    }

    pub fn pixel(&self, x: i32) -> Option<Pixel> {
        let index = x + LINE_PADDING as i32;
        if index < 0 {
            return None;
        }
        self.cells.get(index as usize).copied()
    }

    /// Copies the visible window out, dropping priorities.
    pub fn visible(&self) -> [Rgb; SCREEN_WIDTH] {
        let mut row = [Rgb::BLACK; SCREEN_WIDTH];
        for (out, cell) in row
            .iter_mut()
            .zip(&self.cells[LINE_PADDING..LINE_PADDING + SCREEN_WIDTH])
        {
            *out = cell.rgb;
        }
        row
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}
