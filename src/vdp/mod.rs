pub mod error;
pub mod memory;
pub mod pattern;
pub mod pixel;
pub mod planes;
pub mod registers;
pub mod renderer;
pub mod scroll;
pub mod sprites;


pub use error::{RenderError, UnsupportedMode};
pub use memory::{VdpSnapshot, VideoMemory};
pub use pixel::Rgb;
pub use renderer::{render_frame, render_scanline};

/// Active display width in pixels (40 cells).
pub const SCREEN_WIDTH: usize = 320;
/// Number of 8-pixel columns across the display.
pub const SCREEN_COLUMNS: usize = SCREEN_WIDTH / 8;
/// Lines with active display; later lines are never rendered.
pub const VISIBLE_LINES: usize = 224;
/// Extra cells on each side of the line buffer so wrapped planes and
/// partially off-screen sprites can be written without clipping.
pub const LINE_PADDING: usize = 32;
