use bitflags::bitflags;

pub const REG_LCDC: u16 = 0xFF40;
pub const REG_STAT: u16 = 0xFF41;
pub const REG_SCY: u16 = 0xFF42;
pub const REG_SCX: u16 = 0xFF43;
pub const REG_LY: u16 = 0xFF44;
pub const REG_LYC: u16 = 0xFF45;
pub const REG_DMA: u16 = 0xFF46;
pub const REG_BGP: u16 = 0xFF47;
pub const REG_OBP0: u16 = 0xFF48;
pub const REG_OBP1: u16 = 0xFF49;
pub const REG_WY: u16 = 0xFF4A;
pub const REG_WX: u16 = 0xFF4B;

bitflags! {
    /// LCD control (LCDC).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Lcdc: u8 {
        const BG_ENABLE       = 0b0000_0001;
        const OBJ_ENABLE      = 0b0000_0010;
        const OBJ_SIZE_SELECT = 0b0000_0100; // 8x16 objects
        const BG_MAP_SELECT   = 0b0000_1000;
        const BG_DATA_SELECT  = 0b0001_0000; // signed tile-map addressing from +0x800
        const WND_ENABLE      = 0b0010_0000;
        const WND_MAP_SELECT  = 0b0100_0000;
        const LCD_ENABLE      = 0b1000_0000;
    }
}

bitflags! {
    /// LCD status (STAT).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct Stat: u8 {
        const MODE       = 0b0000_0011;
        const LYC        = 0b0000_0100;
        const HBLANK_INT = 0b0000_1000;
        const VBLANK_INT = 0b0001_0000;
        const OAM_INT    = 0b0010_0000;
        const LYC_INT    = 0b0100_0000;
    }
}

impl Stat {
    pub const INT_ENABLES: Stat = Stat::HBLANK_INT
        .union(Stat::VBLANK_INT)
        .union(Stat::OAM_INT)
        .union(Stat::LYC_INT);
}

/// Controller mode as encoded in STAT bits 0-1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LcdMode {
    HBlank = 0,
    VBlank = 1,
    OamSearch = 2,
    PixelTransfer = 3,
}

impl LcdMode {
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => LcdMode::HBlank,
            1 => LcdMode::VBlank,
            2 => LcdMode::OamSearch,
            _ => LcdMode::PixelTransfer,
        }
    }
}

/// The video I/O register bank.
///
/// STAT's mode/match bits and LY are driven by the mode sequencer; the host
/// reads them through accessors and cannot write them.
#[derive(Debug, Clone, Default)]
pub struct Io {
    pub lcdc: Lcdc,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
    pub scx: u8,
    pub scy: u8,
    pub wx: u8,
    pub wy: u8,
    pub lyc: u8,
    /// Source page of the last OAM DMA.
    pub dma: u8,

    stat: Stat,
    ly: u8,
}

impl Io {
    pub fn new() -> Self { Self::default() }

    pub fn lcdc_set(&mut self, flags: Lcdc) { self.lcdc.insert(flags); }
    pub fn lcdc_reset(&mut self, flags: Lcdc) { self.lcdc.remove(flags); }

    /// Sets STAT interrupt-enable bits; mode and match bits are ignored.
    pub fn stat_set(&mut self, flags: Stat) {
        self.stat.insert(flags & Stat::INT_ENABLES);
    }

    pub fn stat_reset(&mut self, flags: Stat) {
        self.stat.remove(flags & Stat::INT_ENABLES);
    }

    pub fn stat(&self) -> Stat { self.stat }
    pub fn ly(&self) -> u8 { self.ly }
    pub fn mode(&self) -> LcdMode { LcdMode::from_bits(self.stat.bits()) }
    pub fn lyc_match(&self) -> bool { self.stat.contains(Stat::LYC) }

    pub(crate) fn set_mode(&mut self, mode: LcdMode) {
        self.stat = Stat::from_bits_retain((self.stat.bits() & !Stat::MODE.bits()) | mode as u8);
    }

    pub(crate) fn set_ly(&mut self, ly: u8) { self.ly = ly; }

    pub(crate) fn update_lyc_match(&mut self) {
        self.stat.set(Stat::LYC, self.ly == self.lyc);
    }

    pub fn read8(&self, addr: u16) -> u8 {
        match addr {
            REG_LCDC => self.lcdc.bits(),
            REG_STAT => self.stat.bits() | 0x80,
            REG_SCY => self.scy,
            REG_SCX => self.scx,
            REG_LY => self.ly,
            REG_LYC => self.lyc,
            REG_DMA => self.dma,
            REG_BGP => self.bgp,
            REG_OBP0 => self.obp0,
            REG_OBP1 => self.obp1,
            REG_WY => self.wy,
            REG_WX => self.wx,
            _ => 0xFF,
        }
    }

    pub fn write8(&mut self, addr: u16, value: u8) {
        match addr {
            REG_LCDC => self.lcdc = Lcdc::from_bits_retain(value),
            REG_STAT => {
                let ro = self.stat.bits() & (Stat::MODE | Stat::LYC).bits();
                self.stat = Stat::from_bits_retain(ro | (value & Stat::INT_ENABLES.bits()));
            }
            REG_SCY => self.scy = value,
            REG_SCX => self.scx = value,
            REG_LY => {}
            REG_LYC => self.lyc = value,
            REG_DMA => self.dma = value,
            REG_BGP => self.bgp = value,
            REG_OBP0 => self.obp0 = value,
            REG_OBP1 => self.obp1 = value,
            REG_WY => self.wy = value,
            REG_WX => self.wx = value,
            _ => {}
        }
    }
}
