//! Per-pixel window / background / object resolution for one scanline.

use crate::io::Lcdc;
use crate::mem::{TILE_MAP_W, TileMapSelect};
use crate::video::{Palette, SCREEN_W};

use super::Ppu;
use super::sprite::{MAX_SPRITES_PER_LINE, ObjAttr, OamEntry, SPRITE_MARGIN_LEFT, SPRITE_MARGIN_TOP, ScanlineSprites, SpriteHit};
use super::tile::{TileAddressing, color, decode_row, palette_index};

impl<B: AsRef<[u8]> + AsMut<[u8]>> Ppu<B> {
    /// Writes the 160 output bytes of `line` into `out`.
    pub(super) fn compose_line(&self, line: u8, sprites: &ScanlineSprites, palette: &Palette, out: &mut [u8]) {
        let io = &self.io;
        let lcdc = io.lcdc;
        let tile_data = self.mem.tile_data();
        let addressing = if lcdc.contains(Lcdc::BG_DATA_SELECT) {
            TileAddressing::Signed
        } else {
            TileAddressing::Unsigned
        };
        let bg_map = self.mem.tile_map(map_select(lcdc, Lcdc::BG_MAP_SELECT));
        let wnd_map = self.mem.tile_map(map_select(lcdc, Lcdc::WND_MAP_SELECT));

        let window_on_line = lcdc.contains(Lcdc::WND_ENABLE) && line >= io.wy;
        let window_left = io.wx as i16 - 7;

        let tall = lcdc.contains(Lcdc::OBJ_SIZE_SELECT);
        let objs_on = lcdc.contains(Lcdc::OBJ_ENABLE);
        let mut objs = [(OamEntry::default(), SpriteHit::default()); MAX_SPRITES_PER_LINE];
        for (slot, hit) in objs.iter_mut().zip(sprites.as_slice()) {
            *slot = (self.mem.oam_entry(hit.oam_index as usize), *hit);
        }
        let objs = &objs[..sprites.len()];

        for (col, px) in out.iter_mut().enumerate().take(SCREEN_W) {
            let col = col as u8;

            let (bg_index, bg_palette) = if window_on_line && col as i16 >= window_left {
                let wx = (col as i16 - window_left) as u8;
                let wy = line - io.wy;
                (sample_map(wnd_map, tile_data, wx, wy, addressing), io.bgp)
            } else if lcdc.contains(Lcdc::BG_ENABLE) {
                let bx = col.wrapping_add(io.scx);
                let by = line.wrapping_add(io.scy);
                (sample_map(bg_map, tile_data, bx, by, addressing), io.bgp)
            } else {
                (0, 0)
            };

            let mut index = bg_index;
            let mut reg = bg_palette;

            if objs_on {
                // later table entries first, so lower indices end up on top
                for (entry, hit) in objs.iter().rev() {
                    if !entry.covers_column(col) {
                        continue;
                    }
                    let obj_index = sprite_pixel(tile_data, entry, hit, line, col, tall);
                    if obj_index == 0 {
                        continue;
                    }
                    if entry.attr.contains(ObjAttr::PRIORITY) && bg_index != 0 {
                        continue;
                    }
                    index = obj_index;
                    reg = if entry.attr.contains(ObjAttr::PALETTE) { io.obp1 } else { io.obp0 };
                }
            }

            *px = palette.colors[color(index, reg) as usize];
        }
    }
}

fn map_select(lcdc: Lcdc, flag: Lcdc) -> TileMapSelect {
    if lcdc.contains(flag) { TileMapSelect::Map1 } else { TileMapSelect::Map0 }
}

fn sample_map(map: &[u8], tile_data: &[u8], x: u8, y: u8, addressing: TileAddressing) -> u8 {
    let tile = map[(y as usize / 8) * TILE_MAP_W + x as usize / 8];
    palette_index(decode_row(tile_data, tile, y & 7, addressing), x & 7)
}

/// Color index of an object at screen `(col, line)`; the scanner guarantees
/// the object covers the line and the caller that it covers the column.
fn sprite_pixel(tile_data: &[u8], entry: &OamEntry, hit: &SpriteHit, line: u8, col: u8, tall: bool) -> u8 {
    let height: u8 = if tall { 16 } else { 8 };
    let mut row = (line as u16 + SPRITE_MARGIN_TOP - entry.y as u16) as u8;
    let mut tile = hit.tile;
    if entry.attr.contains(ObjAttr::FLIP_Y) {
        row = height - 1 - row;
        if tall {
            tile = if row >= 8 { entry.tile.wrapping_add(1) } else { entry.tile };
        }
    }

    let mut column = (col as u16 + SPRITE_MARGIN_LEFT - entry.x as u16) as u8;
    if entry.attr.contains(ObjAttr::FLIP_X) {
        column = 7 - column;
    }

    palette_index(decode_row(tile_data, tile, row, TileAddressing::Unsigned), column)
}
