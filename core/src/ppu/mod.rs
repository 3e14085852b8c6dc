//! Game Boy (DMG) picture processing unit.
//!
//! The engine owns a handle to the host's 64 KiB hardware memory buffer and
//! the video register bank. [`Ppu::render`] walks one whole frame: for each
//! visible line it searches OAM, composes the line, and steps the STAT mode
//! machine, then runs the vertical-blank lines.
//!
//! Rendering is line-atomic. Register writes made while a line is being
//! composed (from a STAT callback, for example) are not modelled; the host is
//! expected to write registers between frames.

use crate::io::{Io, LcdMode, REG_DMA, REG_LCDC, REG_LY, REG_WX};
use crate::mem::{Mem, MemError, OBJ_COUNT, OAM_START, TILE_DATA_START, TILE_MAP0_START, TILE_MAP1_START};

use self::interrupt::{EdgeTracker, InterruptSink};
use self::sprite::OamEntry;

mod compositor;
pub mod interrupt;
mod mode;
pub mod sprite;
pub mod tile;

#[cfg(test)]
pub(crate) mod ppu_test_harness;

pub struct Ppu<B = Vec<u8>> {
    mem: Mem<B>,
    io: Io,
    irq: EdgeTracker,
    stat_sink: Option<InterruptSink>,
    #[cfg(test)]
    pub(crate) transitions: Vec<(u8, LcdMode)>,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Ppu<B> {
    /// Maps the host buffer. Fails if it is shorter than 64 KiB.
    pub fn new(memory: B) -> Result<Self, MemError> {
        let mem = Mem::new(memory).inspect_err(|e| log::error!("cannot map video memory: {e}"))?;
        log::debug!(
            "video memory mapped: tiles {:#06X}, maps {:#06X}/{:#06X}, oam {:#06X}",
            TILE_DATA_START,
            TILE_MAP0_START,
            TILE_MAP1_START,
            OAM_START
        );
        Ok(Self {
            mem,
            io: Io::new(),
            irq: EdgeTracker::new(),
            stat_sink: None,
            #[cfg(test)]
            transitions: Vec::new(),
        })
    }

    pub fn io(&self) -> &Io { &self.io }
    pub fn io_mut(&mut self) -> &mut Io { &mut self.io }
    pub fn mem(&self) -> &Mem<B> { &self.mem }
    pub fn mem_mut(&mut self) -> &mut Mem<B> { &mut self.mem }
    pub fn into_memory(self) -> B { self.mem.into_inner() }

    pub fn mode(&self) -> LcdMode { self.io.mode() }
    pub fn ly(&self) -> u8 { self.io.ly() }

    /// Installs (or with `None`, removes) the STAT interrupt notification.
    /// Edge bookkeeping runs either way.
    pub fn set_stat_interrupt(&mut self, sink: Option<InterruptSink>) {
        self.stat_sink = sink;
    }

    /// Overwrites the whole object attribute table.
    pub fn transfer_oam(&mut self, objs: &[OamEntry; OBJ_COUNT]) {
        for (i, obj) in objs.iter().enumerate() {
            self.mem.write_oam_entry(i, obj);
        }
    }

    /// Copy of the memory image with the register bank written over
    /// 0xFF40-0xFF4B. The DMA byte keeps its memory value.
    pub fn snapshot(&self) -> Vec<u8> {
        let mut image = self.mem.memory().to_vec();
        for addr in REG_LCDC..=REG_WX {
            if addr != REG_DMA {
                image[addr as usize] = self.io.read8(addr);
            }
        }
        image
    }

    /// Loads the register bank from the bytes at 0xFF40-0xFF4B of the memory
    /// image, as laid out by [`snapshot`](Self::snapshot). LY and DMA are
    /// skipped.
    pub fn restore_registers(&mut self) {
        for addr in REG_LCDC..=REG_WX {
            if addr == REG_DMA || addr == REG_LY {
                continue;
            }
            let value = self.mem.memory()[addr as usize];
            self.io.write8(addr, value);
        }
        log::debug!("registers restored, lcdc {:#04X}", self.io.lcdc.bits());
    }

    fn notify(&mut self, fired: bool) {
        if !fired {
            return;
        }
        if let Some(sink) = self.stat_sink.as_mut() {
            sink();
        }
    }
}
