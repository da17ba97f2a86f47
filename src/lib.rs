//! Scanline renderer for a tile and sprite based video display processor.
//!
//! The renderer is a pure function of the line number and a read-only view of
//! video memory (see [`vdp::VideoMemory`]). Nothing is carried between calls.

pub mod debug_flags;
pub mod vdp;

pub use vdp::{
    render_frame, render_scanline, RenderError, Rgb, UnsupportedMode, VdpSnapshot, VideoMemory,
    SCREEN_WIDTH, VISIBLE_LINES,
};
