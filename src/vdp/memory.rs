use super::registers::{Registers, REGISTER_COUNT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const VRAM_SIZE: usize = 0x10000;
pub const CRAM_ENTRIES: usize = 64;
pub const VSRAM_ENTRIES: usize = 40;

/// Read-only view of video memory and the register file.
///
/// Implementations must never panic for any address: VRAM is addressed with
/// a 16-bit value so every offset is in range by construction.
pub trait VideoMemory {
    fn vram_byte(&self, addr: u16) -> u8;
    /// Colour word `----BBB-GGG-RRR-`; `index` is taken modulo 64.
    fn cram_word(&self, index: u8) -> u16;
    fn vsram_word(&self, index: usize) -> u16;
    fn register(&self, index: usize) -> u8;

    /// Big-endian word at `addr`; the second byte wraps around VRAM.
    fn vram_word(&self, addr: u16) -> u16 {
        ((self.vram_byte(addr) as u16) << 8) | self.vram_byte(addr.wrapping_add(1)) as u16
    }

    fn registers(&self) -> Registers {
        Registers::from_fn(|index| self.register(index))
    }
}

/// Owned copy of VRAM, CRAM, VSRAM and registers.
///
/// This is the collaborator handed to the renderer in tests and by the
/// `render_frame` tool; an emulator core can implement [`VideoMemory`]
/// directly over its own storage instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VdpSnapshot {
    pub vram: Vec<u8>,
    pub cram: Vec<u16>,
    pub vsram: Vec<u16>,
    pub registers: [u8; REGISTER_COUNT],
}

impl VdpSnapshot {
    pub fn new() -> Self {
        Self {
            vram: vec![0; VRAM_SIZE],
            cram: vec![0; CRAM_ENTRIES],
            vsram: vec![0; VSRAM_ENTRIES],
            registers: [0; REGISTER_COUNT],
        }
    }

    pub fn set_register(&mut self, index: usize, value: u8) {
        if let Some(reg) = self.registers.get_mut(index) {
            *reg = value;
        }
    }

    pub fn write_vram(&mut self, addr: u16, data: &[u8]) {
        let mut addr = addr;
        for &byte in data {
            if let Some(slot) = self.vram.get_mut(addr as usize) {
                *slot = byte;
            }
            addr = addr.wrapping_add(1);
        }
    }

    pub fn write_vram_word(&mut self, addr: u16, value: u16) {
        self.write_vram(addr, &value.to_be_bytes());
    }

    pub fn write_cram(&mut self, index: u8, color: u16) {
        if let Some(slot) = self.cram.get_mut((index as usize) % CRAM_ENTRIES) {
            *slot = color;
        }
    }

    pub fn write_vsram(&mut self, index: usize, value: u16) {
        if let Some(slot) = self.vsram.get_mut(index) {
            *slot = value;
        }
    }

    // Deserialised or raw-loaded data may be short; pad to hardware sizes.
    fn normalize(&mut self) {
        self.vram.resize(VRAM_SIZE, 0);
        self.cram.resize(CRAM_ENTRIES, 0);
        self.vsram.resize(VSRAM_ENTRIES, 0);
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let data = bincode::serialize(self)?;
        fs::write(path.as_ref(), data)?;
        log::info!("VDP snapshot written to: {}", path.as_ref().display());
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let data = fs::read(path.as_ref())?;
        let mut snapshot: VdpSnapshot = bincode::deserialize(&data)?;
        snapshot.normalize();
        log::info!("VDP snapshot loaded from: {}", path.as_ref().display());
        Ok(snapshot)
    }

    /// Writes `vram.dmp`, `cram.dmp` and `vsram.dmp` into `dir`.
    /// Word memories are stored big-endian.
    pub fn dump_raw<P: AsRef<Path>>(&self, dir: P) -> std::io::Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        fs::write(dir.join("vram.dmp"), &self.vram)?;
        fs::write(dir.join("cram.dmp"), words_to_bytes(&self.cram))?;
        fs::write(dir.join("vsram.dmp"), words_to_bytes(&self.vsram))?;
        log::debug!("raw VRAM/CRAM/VSRAM dumps written to {}", dir.display());
        Ok(())
    }

    /// Reads back a [`dump_raw`](Self::dump_raw) directory. Registers are not
    /// part of the raw dumps and must be supplied.
    pub fn load_raw<P: AsRef<Path>>(
        dir: P,
        registers: [u8; REGISTER_COUNT],
    ) -> std::io::Result<Self> {
        let dir = dir.as_ref();
        let mut snapshot = Self {
            vram: fs::read(dir.join("vram.dmp"))?,
            cram: bytes_to_words(&fs::read(dir.join("cram.dmp"))?),
            vsram: bytes_to_words(&fs::read(dir.join("vsram.dmp"))?),
            registers,
        };
        snapshot.vram.truncate(VRAM_SIZE);
        snapshot.cram.truncate(CRAM_ENTRIES);
        snapshot.vsram.truncate(VSRAM_ENTRIES);
        snapshot.normalize();
        Ok(snapshot)
    }
}

impl Default for VdpSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoMemory for VdpSnapshot {
    fn vram_byte(&self, addr: u16) -> u8 {
        self.vram.get(addr as usize).copied().unwrap_or(0)
    }

    fn cram_word(&self, index: u8) -> u16 {
        self.cram
            .get((index as usize) % CRAM_ENTRIES)
            .copied()
            .unwrap_or(0)
    }

    fn vsram_word(&self, index: usize) -> u16 {
        self.vsram.get(index).copied().unwrap_or(0)
    }

    fn register(&self, index: usize) -> u8 {
        self.registers.get(index).copied().unwrap_or(0)
    }
}

fn words_to_bytes(words: &[u16]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_be_bytes()).collect()
}

fn bytes_to_words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}
