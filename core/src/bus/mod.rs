use crate::io::{REG_DMA, REG_LCDC, REG_WX};
use crate::mem::{OAM_SIZE, OAM_START};
use crate::ppu::Ppu;

/// CPU-side view of the 16-bit address space.
pub trait BusAccess {
    fn read8(&mut self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);

    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read8(addr) as u16;
        let hi = self.read8(addr.wrapping_add(1)) as u16;
        lo | (hi << 8)
    }

    fn write16(&mut self, addr: u16, value: u16) {
        self.write8(addr, (value & 0xFF) as u8);
        self.write8(addr.wrapping_add(1), (value >> 8) as u8);
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Ppu<B> {
    /// Copies 160 bytes from `page << 8` into OAM.
    pub fn oam_dma(&mut self, page: u8) {
        let src = (page as usize) << 8;
        #[cfg(feature = "trace_bus")]
        log::trace!("oam dma from {src:#06X}");
        self.mem_mut().memory_mut().copy_within(src..src + OAM_SIZE, OAM_START);
        self.io_mut().dma = page;
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> BusAccess for Ppu<B> {
    fn read8(&mut self, addr: u16) -> u8 {
        match addr {
            REG_LCDC..=REG_WX => self.io().read8(addr),
            a => self.mem().memory()[a as usize],
        }
    }

    fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            REG_DMA => self.oam_dma(value),
            REG_LCDC..=REG_WX => self.io_mut().write8(addr, value),
            a => self.mem_mut().memory_mut()[a as usize] = value,
        }
    }
}
