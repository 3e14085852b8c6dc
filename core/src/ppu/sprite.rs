//! Object attribute records and the per-scanline visibility search.

use bitflags::bitflags;

use crate::mem::{OBJ_COUNT, OBJ_RECORD_SIZE};

pub const MAX_SPRITES_PER_LINE: usize = 10;
pub const SPRITE_MARGIN_TOP: u16 = 16;
pub const SPRITE_MARGIN_LEFT: u16 = 8;

bitflags! {
    /// Object attribute flags (byte 3 of a record).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ObjAttr: u8 {
        const PALETTE  = 0b0001_0000; // OBP1 instead of OBP0
        const FLIP_X   = 0b0010_0000;
        const FLIP_Y   = 0b0100_0000;
        const PRIORITY = 0b1000_0000; // behind non-zero background
    }
}

/// One object attribute record. `y` and `x` are stored with the hardware
/// offsets (+16, +8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OamEntry {
    pub y: u8,
    pub x: u8,
    pub tile: u8,
    pub attr: ObjAttr,
}

impl OamEntry {
    pub fn from_bytes(b: [u8; OBJ_RECORD_SIZE]) -> Self {
        Self { y: b[0], x: b[1], tile: b[2], attr: ObjAttr::from_bits_retain(b[3]) }
    }

    pub fn to_bytes(&self) -> [u8; OBJ_RECORD_SIZE] {
        [self.y, self.x, self.tile, self.attr.bits()]
    }

    /// Whether the object's 8-pixel span covers screen column `col`.
    #[inline]
    pub fn covers_column(&self, col: u8) -> bool {
        let x = self.x as u16;
        let sx = col as u16 + SPRITE_MARGIN_LEFT;
        x <= sx && x + 8 > sx
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteSize {
    Size8x8,
    Size8x16,
}

impl SpriteSize {
    pub fn height(self) -> u16 {
        match self {
            SpriteSize::Size8x8 => 8,
            SpriteSize::Size8x16 => 16,
        }
    }
}

/// A sprite selected for a scanline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteHit {
    pub oam_index: u8,
    /// Tile covering the line before any vertical flip: the record's tile,
    /// or the next one for the lower half of an 8x16 pair.
    pub tile: u8,
}

/// Up to ten hits in ascending table order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanlineSprites {
    hits: [SpriteHit; MAX_SPRITES_PER_LINE],
    len: usize,
}

impl ScanlineSprites {
    pub fn len(&self) -> usize { self.len }
    pub fn is_empty(&self) -> bool { self.len == 0 }
    pub fn as_slice(&self) -> &[SpriteHit] { &self.hits[..self.len] }

    fn push(&mut self, hit: SpriteHit) -> bool {
        if self.len == MAX_SPRITES_PER_LINE {
            return false;
        }
        self.hits[self.len] = hit;
        self.len += 1;
        true
    }
}

/// Selects the first ten objects that cover `line`.
///
/// In 8x16 mode only even records are considered; each stands for a pair of
/// stacked tiles.
pub fn scan(line: u8, oam: &[u8], size: SpriteSize) -> ScanlineSprites {
    let mut out = ScanlineSprites::default();
    let height = size.height();
    let step = match size {
        SpriteSize::Size8x8 => 1,
        SpriteSize::Size8x16 => 2,
    };
    let sy = line as u16 + SPRITE_MARGIN_TOP;

    for (index, rec) in oam.chunks_exact(OBJ_RECORD_SIZE).take(OBJ_COUNT).enumerate().step_by(step) {
        let entry = OamEntry::from_bytes([rec[0], rec[1], rec[2], rec[3]]);
        let y = entry.y as u16;
        if !(y <= sy && y + height > sy) {
            continue;
        }
        let tile = if sy - y >= 8 { entry.tile.wrapping_add(1) } else { entry.tile };
        if !out.push(SpriteHit { oam_index: index as u8, tile }) {
            break;
        }
    }
    out
}
