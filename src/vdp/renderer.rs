use super::error::{RenderError, UnsupportedMode};
use super::memory::VideoMemory;
use super::pixel::{LineBuffer, Rgb};
use super::planes::{draw_plane, draw_window, PlaneSize};
use super::registers::{Registers, REG_WINDOW_H};
use super::scroll::{fetch_hscroll, fetch_vscroll};
use super::sprites::draw_sprites;
use super::{SCREEN_WIDTH, VISIBLE_LINES};

/// Layer drawn above Plane B for a whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontLayer {
    Window,
    PlaneA,
}

/// Chooses between the window and Plane A from the vertical window trigger.
/// Both comparisons include the boundary line `threshold * 8`.
pub fn select_front_layer(regs: &Registers, line: usize) -> FrontLayer {
    let trigger = regs.window_v();
    if !trigger.is_configured() {
        return FrontLayer::PlaneA;
    }
    let edge = trigger.threshold as usize * 8;
    let in_window = if trigger.far_edge {
        line >= edge
    } else {
        line <= edge
    };
    if in_window {
        FrontLayer::Window
    } else {
        FrontLayer::PlaneA
    }
}

/// Renders one visible line.
///
/// Layers are composited back to front: backdrop, Plane B, then the window
/// or Plane A, then sprites. Occlusion comes entirely from the priority rule
/// in [`LineBuffer::draw`].
pub fn render_scanline<M: VideoMemory + ?Sized>(
    mem: &M,
    line: usize,
) -> Result<[Rgb; SCREEN_WIDTH], RenderError> {
    if line >= VISIBLE_LINES {
        return Err(RenderError::LineOutOfRange(line));
    }

    let regs = mem.registers();
    let interlace = regs.interlace_mode();
    if interlace != 0 {
        return Err(UnsupportedMode::Interlace(interlace).into());
    }

    if line == 0 && crate::debug_flags::render_verbose() {
        let wh = regs.window_h();
        let wv = regs.window_v();
        log::debug!(
            "A(addr:{:04X}) B(addr:{:04X}) W(addr:{:04X}) S(addr:{:04X})",
            regs.plane_a_base(),
            regs.plane_b_base(),
            regs.window_base(),
            regs.sprite_table_base()
        );
        log::debug!(
            "W(h:{}, right:{}, v:{}, down:{})",
            wh.threshold,
            wh.far_edge,
            wv.threshold,
            wv.far_edge
        );
    }

    let mut buf = LineBuffer::new();

    if regs.display_disabled() {
        return Ok(buf.visible());
    }

    buf.fill(mem.cram_word(regs.backdrop_index()), 0);

    if !regs.planes_enabled() {
        return Ok(buf.visible());
    }

    let hscroll = fetch_hscroll(mem, &regs, line);
    let vscroll = fetch_vscroll(mem, &regs)?;
    if regs.window_h().is_configured() {
        return Err(UnsupportedMode::ColumnWindow(regs.raw(REG_WINDOW_H)).into());
    }
    let size = PlaneSize::from_registers(&regs)?;

    draw_plane(&mut buf, mem, size, line, regs.plane_b_base(), hscroll.b, vscroll.b);

    let front = select_front_layer(&regs, line);
    match front {
        FrontLayer::Window => draw_window(&mut buf, mem, regs.window_base(), line),
        FrontLayer::PlaneA => {
            draw_plane(&mut buf, mem, size, line, regs.plane_a_base(), hscroll.a, vscroll.a)
        }
    }

    let sprites = draw_sprites(&mut buf, mem, &regs, line);

    if crate::debug_flags::render_verbose() {
        log::debug!(
            "line {}: {:?} hs=({}, {}) vs=({}, {}) sprites={} px={} limit={:?}",
            line,
            front,
            hscroll.a,
            hscroll.b,
            vscroll.a,
            vscroll.b,
            sprites.visible,
            sprites.pixels,
            sprites.limit
        );
    }

    Ok(buf.visible())
}

/// Renders all visible lines in increasing order into a row-major
/// `SCREEN_WIDTH * VISIBLE_LINES` buffer. Stops at the first fault.
pub fn render_frame<M: VideoMemory + ?Sized>(mem: &M) -> Result<Vec<Rgb>, RenderError> {
    let mut frame = Vec::with_capacity(SCREEN_WIDTH * VISIBLE_LINES);
    for line in 0..VISIBLE_LINES {
        frame.extend_from_slice(&render_scanline(mem, line)?);
    }
    Ok(frame)
}
