use bitflags::bitflags;

pub const REGISTER_COUNT: usize = 24;

pub const REG_MODE1: usize = 0;
pub const REG_MODE2: usize = 1;
pub const REG_PLANE_A: usize = 2;
pub const REG_WINDOW: usize = 3;
pub const REG_PLANE_B: usize = 4;
pub const REG_SPRITE_TABLE: usize = 5;
pub const REG_BACKDROP: usize = 7;
pub const REG_MODE3: usize = 11;
pub const REG_MODE4: usize = 12;
pub const REG_HSCROLL_TABLE: usize = 13;
pub const REG_PLANE_SIZE: usize = 16;
pub const REG_WINDOW_H: usize = 17;
pub const REG_WINDOW_V: usize = 18;

/// Extracts `width` bits of `word` starting at bit `start`.
#[inline]
pub fn bits(word: u16, start: u32, width: u32) -> u16 {
    (word >> start) & ((1u16 << width) - 1)
}

#[inline]
pub fn bit(word: u16, n: u32) -> bool {
    bits(word, n, 1) != 0
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeSet1: u8 {
        const DISPLAY_DISABLE = 0b00000001;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeSet2: u8 {
        const DISPLAY_ENABLE = 0b01000000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeSet3: u8 {
        const HSCROLL_MODE = 0b00000011;
        const VSCROLL_COLUMN = 0b00000100;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModeSet4: u8 {
        const INTERLACE = 0b00000110;
    }
}

/// How the horizontal scroll table is indexed per line (register 11 bits 0..1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HScrollMode {
    FullScreen,
    FirstEightLines,
    PerCellRow,
    PerLine,
}

impl HScrollMode {
    pub fn from_bits(mode: u8) -> Self {
        match mode & 3 {
            0 => HScrollMode::FullScreen,
            1 => HScrollMode::FirstEightLines,
            2 => HScrollMode::PerCellRow,
            _ => HScrollMode::PerLine,
        }
    }
}

/// Window split position from register 17 or 18, in units of 8 pixels
/// (vertical) or 16 pixels (horizontal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTrigger {
    pub threshold: u8,
    /// Down (vertical) or right (horizontal) edge selected.
    pub far_edge: bool,
}

impl WindowTrigger {
    fn from_register(value: u8) -> Self {
        Self {
            threshold: value & 0x1F,
            far_edge: value & 0x80 != 0,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.threshold != 0
    }
}

/// Copy of the indexed register file taken at the start of a scanline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    raw: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new(raw: [u8; REGISTER_COUNT]) -> Self {
        Self { raw }
    }

    pub fn from_fn(mut read: impl FnMut(usize) -> u8) -> Self {
        let mut raw = [0u8; REGISTER_COUNT];
        for (index, value) in raw.iter_mut().enumerate() {
            *value = read(index);
        }
        Self { raw }
    }

    #[inline]
    pub fn raw(&self, index: usize) -> u8 {
        self.raw.get(index).copied().unwrap_or(0)
    }

    pub fn mode1(&self) -> ModeSet1 {
        ModeSet1::from_bits_truncate(self.raw(REG_MODE1))
    }

    pub fn mode2(&self) -> ModeSet2 {
        ModeSet2::from_bits_truncate(self.raw(REG_MODE2))
    }

    pub fn mode3(&self) -> ModeSet3 {
        ModeSet3::from_bits_truncate(self.raw(REG_MODE3))
    }

    pub fn mode4(&self) -> ModeSet4 {
        ModeSet4::from_bits_truncate(self.raw(REG_MODE4))
    }

    pub fn display_disabled(&self) -> bool {
        self.mode1().contains(ModeSet1::DISPLAY_DISABLE)
    }

    /// Plane and sprite output enable; when clear only the backdrop is shown.
    pub fn planes_enabled(&self) -> bool {
        self.mode2().contains(ModeSet2::DISPLAY_ENABLE)
    }

    /// 2-bit interlace mode; 0 means progressive.
    pub fn interlace_mode(&self) -> u8 {
        (self.mode4() & ModeSet4::INTERLACE).bits() >> 1
    }

    pub fn column_vscroll(&self) -> bool {
        self.mode3().contains(ModeSet3::VSCROLL_COLUMN)
    }

    pub fn hscroll_mode(&self) -> HScrollMode {
        HScrollMode::from_bits((self.mode3() & ModeSet3::HSCROLL_MODE).bits())
    }

    pub fn plane_a_base(&self) -> u16 {
        ((self.raw(REG_PLANE_A) & 0x38) as u16) << 10
    }

    pub fn plane_b_base(&self) -> u16 {
        ((self.raw(REG_PLANE_B) & 0x07) as u16) << 13
    }

    // Bit 1 is ignored in 40-cell mode.
    pub fn window_base(&self) -> u16 {
        ((self.raw(REG_WINDOW) & 0x3C) as u16) << 10
    }

    pub fn sprite_table_base(&self) -> u16 {
        ((self.raw(REG_SPRITE_TABLE) & 0x7F) as u16) << 9
    }

    pub fn hscroll_table_base(&self) -> u16 {
        ((self.raw(REG_HSCROLL_TABLE) & 0x3F) as u16) << 10
    }

    /// Raw 2-bit (width, height) plane size codes.
    pub fn plane_size_codes(&self) -> (u8, u8) {
        let value = self.raw(REG_PLANE_SIZE) as u16;
        (bits(value, 0, 2) as u8, bits(value, 4, 2) as u8)
    }

    /// CRAM index of the backdrop colour.
    pub fn backdrop_index(&self) -> u8 {
        self.raw(REG_BACKDROP) & 0x3F
    }

    pub fn window_h(&self) -> WindowTrigger {
        WindowTrigger::from_register(self.raw(REG_WINDOW_H))
    }

    pub fn window_v(&self) -> WindowTrigger {
        WindowTrigger::from_register(self.raw(REG_WINDOW_V))
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new([0; REGISTER_COUNT])
    }
}
