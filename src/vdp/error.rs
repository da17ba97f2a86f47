use std::fmt;

/// Display modes that exist on the chip but are not reproduced by this renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsupportedMode {
    /// Interlace mode requested through register 12 (carries the 2-bit mode).
    Interlace(u8),
    /// Per two-cell-column vertical scrolling requested through register 11.
    ColumnVerticalScroll,
    /// Column-ranged window requested through register 17 (carries the raw value).
    ColumnWindow(u8),
}

/// Fault raised while rendering a scanline.
///
/// All variants are recoverable: the line is not rendered and the caller
/// decides whether to skip the feature or stop the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    UnsupportedMode(UnsupportedMode),
    /// A register holds a reserved value (plane size code 2).
    InvalidConfiguration { register: usize, value: u8 },
    /// Only lines `0..VISIBLE_LINES` can be rendered.
    LineOutOfRange(usize),
}

impl fmt::Display for UnsupportedMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnsupportedMode::Interlace(mode) => write!(f, "interlace mode {} is not supported", mode),
            UnsupportedMode::ColumnVerticalScroll => {
                write!(f, "per-column vertical scrolling is not supported")
            }
            UnsupportedMode::ColumnWindow(value) => {
                write!(f, "column-ranged window (register 17 = 0x{:02X}) is not supported", value)
            }
        }
    }
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RenderError::UnsupportedMode(mode) => write!(f, "unsupported mode: {}", mode),
            RenderError::InvalidConfiguration { register, value } => write!(
                f,
                "invalid configuration: register {} holds reserved value 0x{:02X}",
                register, value
            ),
            RenderError::LineOutOfRange(line) => {
                write!(f, "line {} is outside the visible display", line)
            }
        }
    }
}

impl std::error::Error for RenderError {}

impl From<UnsupportedMode> for RenderError {
    fn from(mode: UnsupportedMode) -> Self {
        RenderError::UnsupportedMode(mode)
    }
}
