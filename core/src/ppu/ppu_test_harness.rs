// ppu_test_harness.rs
// Test-only scene builders for the PPU. Scenes are built on a plain
// Vec-backed 64 KiB buffer; frames are rendered with an identity output
// palette so that each output byte is the hardware shade (0..=3) and BGP 0xE4
// makes that shade equal to the color index.

use std::cell::Cell;
use std::rc::Rc;

use super::Ppu;
use crate::io::Lcdc;
use crate::mem::{HW_MEMORY_SIZE, OBJ_COUNT, TILE_MAP_W, Tile, TileMapSelect};
use crate::ppu::sprite::OamEntry;
use crate::video::{FRAME_PIXELS, FrameBuffer, Palette, SCREEN_W};

pub const IDENTITY: Palette = Palette { colors: [0, 1, 2, 3] };
pub const BGP_IDENTITY: u8 = 0xE4;

pub fn blank_ppu() -> Ppu {
    Ppu::new(vec![0u8; HW_MEMORY_SIZE]).unwrap()
}

/// Memory filled with a non-repeating junk pattern.
pub fn poisoned_ppu() -> Ppu {
    let mut seed = 0x2F6Bu16;
    let mem = (0..HW_MEMORY_SIZE)
        .map(|_| {
            // 16-bit Galois LFSR
            let lsb = seed & 1;
            seed >>= 1;
            if lsb != 0 {
                seed ^= 0xB400;
            }
            seed as u8
        })
        .collect();
    Ppu::new(mem).unwrap()
}

/// LCD on, nothing else enabled, identity BGP.
pub fn enabled_ppu() -> Ppu {
    let mut ppu = blank_ppu();
    ppu.io_mut().lcdc_set(Lcdc::LCD_ENABLE);
    ppu.io_mut().bgp = BGP_IDENTITY;
    ppu
}

/// A tile whose every pixel has color index `index`.
pub fn solid_tile(index: u8) -> Tile {
    let lo = if index & 1 != 0 { 0xFF } else { 0x00 };
    let hi = if index & 2 != 0 { 0xFF } else { 0x00 };
    Tile { data: [[lo, hi]; 8] }
}

/// A tile where row `r` has color index 1 only in column `r` (a diagonal).
pub fn diagonal_tile() -> Tile {
    let mut data = [[0u8; 2]; 8];
    for (r, row) in data.iter_mut().enumerate() {
        row[0] = 0x80 >> r;
    }
    Tile { data }
}

pub fn fill_map(ppu: &mut Ppu, select: TileMapSelect, tile: u8) {
    ppu.mem_mut().tile_map_mut(select).fill(tile);
}

pub fn set_map_tile(ppu: &mut Ppu, select: TileMapSelect, tx: usize, ty: usize, tile: u8) {
    ppu.mem_mut().tile_map_mut(select)[ty * TILE_MAP_W + tx] = tile;
}

/// Writes `objs` into the first records; the rest are cleared.
pub fn place_objects(ppu: &mut Ppu, objs: &[OamEntry]) {
    let mut table = [OamEntry::default(); OBJ_COUNT];
    table[..objs.len()].copy_from_slice(objs);
    ppu.transfer_oam(&table);
}

/// Installs a STAT sink that counts its invocations.
pub fn install_probe(ppu: &mut Ppu) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0u32));
    let hook = Rc::clone(&count);
    ppu.set_stat_interrupt(Some(Box::new(move || hook.set(hook.get() + 1))));
    count
}

pub fn render(ppu: &mut Ppu) -> Box<FrameBuffer> {
    render_with(ppu, &IDENTITY)
}

pub fn render_with(ppu: &mut Ppu, palette: &Palette) -> Box<FrameBuffer> {
    let mut frame = Box::new([0xEEu8; FRAME_PIXELS]);
    ppu.render(&mut frame, palette);
    frame
}

pub fn pixel(frame: &FrameBuffer, x: usize, y: usize) -> u8 {
    frame[y * SCREEN_W + x]
}

pub fn row(frame: &FrameBuffer, y: usize) -> &[u8] {
    &frame[y * SCREEN_W..(y + 1) * SCREEN_W]
}
