//! Typed views over the host-supplied 64 KiB hardware memory buffer.

use thiserror::Error;

use crate::ppu::sprite::OamEntry;

pub const HW_MEMORY_SIZE: usize = 0x1_0000;

pub const TILE_DATA_START: usize = 0x8000;
pub const TILE_DATA_SIZE: usize = 0x1800; // 384 tiles, two overlapping 256-tile banks
pub const TILE_MAP0_START: usize = 0x9800;
pub const TILE_MAP1_START: usize = 0x9C00;
pub const TILE_MAP_SIZE: usize = 0x400;
pub const OAM_START: usize = 0xFE00;
pub const OAM_SIZE: usize = OBJ_COUNT * OBJ_RECORD_SIZE;

pub const OBJ_COUNT: usize = 40;
pub const OBJ_RECORD_SIZE: usize = 4;

pub const TILE_SIZE: usize = 16;
pub const TILE_MAP_W: usize = 32;
pub const TILE_MAP_H: usize = 32;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    #[error("hardware memory buffer is {len} bytes, at least {required} required")]
    BufferTooSmall { len: usize, required: usize },
}

/// Which of the two 32x32 background maps to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMapSelect {
    Map0,
    Map1,
}

impl TileMapSelect {
    fn start(self) -> usize {
        match self {
            TileMapSelect::Map0 => TILE_MAP0_START,
            TileMapSelect::Map1 => TILE_MAP1_START,
        }
    }
}

/// One 8x8 tile: per row, the low bit-plane byte then the high bit-plane byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tile {
    pub data: [[u8; 2]; 8],
}

impl Tile {
    pub fn from_bytes(bytes: &[u8; TILE_SIZE]) -> Self {
        let mut data = [[0u8; 2]; 8];
        for (row, pair) in data.iter_mut().zip(bytes.chunks_exact(2)) {
            row[0] = pair[0];
            row[1] = pair[1];
        }
        Self { data }
    }

    pub fn to_bytes(&self) -> [u8; TILE_SIZE] {
        let mut out = [0u8; TILE_SIZE];
        for (pair, row) in out.chunks_exact_mut(2).zip(self.data.iter()) {
            pair.copy_from_slice(row);
        }
        out
    }
}

/// The hardware memory buffer with its fixed sub-regions.
///
/// The length is checked once in [`Mem::new`]; every view below slices at
/// constant offsets inside that checked extent.
pub struct Mem<B> {
    buf: B,
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Mem<B> {
    pub fn new(buf: B) -> Result<Self, MemError> {
        let len = buf.as_ref().len();
        if len < HW_MEMORY_SIZE {
            return Err(MemError::BufferTooSmall { len, required: HW_MEMORY_SIZE });
        }
        Ok(Self { buf })
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    pub fn memory(&self) -> &[u8] {
        &self.buf.as_ref()[..HW_MEMORY_SIZE]
    }

    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.buf.as_mut()[..HW_MEMORY_SIZE]
    }

    pub fn tile_data(&self) -> &[u8] {
        &self.memory()[TILE_DATA_START..TILE_DATA_START + TILE_DATA_SIZE]
    }

    pub fn tile_data_mut(&mut self) -> &mut [u8] {
        &mut self.memory_mut()[TILE_DATA_START..TILE_DATA_START + TILE_DATA_SIZE]
    }

    pub fn tile_map(&self, select: TileMapSelect) -> &[u8] {
        let start = select.start();
        &self.memory()[start..start + TILE_MAP_SIZE]
    }

    pub fn tile_map_mut(&mut self, select: TileMapSelect) -> &mut [u8] {
        let start = select.start();
        &mut self.memory_mut()[start..start + TILE_MAP_SIZE]
    }

    pub fn oam(&self) -> &[u8] {
        &self.memory()[OAM_START..OAM_START + OAM_SIZE]
    }

    pub fn oam_mut(&mut self) -> &mut [u8] {
        &mut self.memory_mut()[OAM_START..OAM_START + OAM_SIZE]
    }

    /// Tile `id` of the unsigned bank.
    pub fn tile(&self, id: u8) -> Tile {
        let off = id as usize * TILE_SIZE;
        let mut bytes = [0u8; TILE_SIZE];
        bytes.copy_from_slice(&self.tile_data()[off..off + TILE_SIZE]);
        Tile::from_bytes(&bytes)
    }

    pub fn write_tile(&mut self, id: u8, tile: &Tile) {
        let off = id as usize * TILE_SIZE;
        self.tile_data_mut()[off..off + TILE_SIZE].copy_from_slice(&tile.to_bytes());
    }

    /// Object record `index % 40`.
    pub fn oam_entry(&self, index: usize) -> OamEntry {
        let off = (index % OBJ_COUNT) * OBJ_RECORD_SIZE;
        let rec = &self.oam()[off..off + OBJ_RECORD_SIZE];
        OamEntry::from_bytes([rec[0], rec[1], rec[2], rec[3]])
    }

    pub fn write_oam_entry(&mut self, index: usize, entry: &OamEntry) {
        let off = (index % OBJ_COUNT) * OBJ_RECORD_SIZE;
        self.oam_mut()[off..off + OBJ_RECORD_SIZE].copy_from_slice(&entry.to_bytes());
    }
}
