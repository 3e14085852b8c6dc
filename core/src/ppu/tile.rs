//! Two-bitplane tile decoding and palette lookup.

use crate::mem::TILE_SIZE;

/// Offset of the bank used by signed addressing.
const SIGNED_BANK_OFFSET: usize = 0x800;

/// How tile-map indices select tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAddressing {
    /// Index `n` is tile `n` from the start of tile data.
    Unsigned,
    /// Index `n` is tile `-n mod 256` from the alternate bank at +0x800.
    Signed,
}

/// Raw bit-plane bytes of one tile row: `[low, high]`.
pub fn decode_row(tile_data: &[u8], tile_index: u8, row: u8, addressing: TileAddressing) -> [u8; 2] {
    let tile_off = match addressing {
        TileAddressing::Unsigned => tile_index as usize * TILE_SIZE,
        TileAddressing::Signed => SIGNED_BANK_OFFSET + tile_index.wrapping_neg() as usize * TILE_SIZE,
    };
    let off = tile_off + 2 * (row & 7) as usize;
    [tile_data[off], tile_data[off + 1]]
}

/// 2-bit color index of `column` (0 = leftmost) in a decoded row.
#[inline]
pub fn palette_index(row: [u8; 2], column: u8) -> u8 {
    let shift = 7 - (column & 7);
    ((row[0] >> shift) & 1) | (((row[1] >> shift) & 1) << 1)
}

/// Shade selected by `index` from a packed 4x2-bit palette register.
#[inline]
pub fn color(index: u8, palette: u8) -> u8 {
    (palette >> (2 * (index & 3))) & 0b11
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::TILE_DATA_SIZE;

    #[test]
    fn bitplanes_combine_low_then_high() {
        // 0xC3 = 1100_0011, 0x43 = 0100_0011
        let row = [0xC3, 0x43];
        let expected = [1, 3, 0, 0, 0, 0, 3, 3];
        for (col, &want) in expected.iter().enumerate() {
            assert_eq!(palette_index(row, col as u8), want, "column {col}");
        }
    }

    #[test]
    fn every_column_recovers_its_plane_bits() {
        for lo in [0x00u8, 0xFF, 0xA5, 0x3C, 0x81] {
            for hi in [0x00u8, 0xFF, 0x5A, 0x0F] {
                for col in 0..8u8 {
                    let bit = 7 - col;
                    let want = ((lo >> bit) & 1) | (((hi >> bit) & 1) << 1);
                    assert_eq!(palette_index([lo, hi], col), want);
                }
            }
        }
    }

    #[test]
    fn blank_row_is_always_index_zero() {
        assert!((0..8).all(|col| palette_index([0, 0], col) == 0));
    }

    #[test]
    fn color_reads_the_literal_bit_layout() {
        // 0xE4 = 11_10_01_00
        assert_eq!([0, 1, 2, 3].map(|i| color(i, 0xE4)), [0, 1, 2, 3]);
        // 0x1B = 00_01_10_11
        assert_eq!([0, 1, 2, 3].map(|i| color(i, 0x1B)), [3, 2, 1, 0]);
        // 0xD2 = 11_01_00_10
        assert_eq!([0, 1, 2, 3].map(|i| color(i, 0xD2)), [2, 0, 1, 3]);
        for pal in 0..=255u8 {
            for idx in 0..4u8 {
                assert_eq!(color(idx, pal), (pal >> (2 * idx)) & 3);
            }
        }
    }

    fn tile_data_with_marks() -> Vec<u8> {
        let mut data = vec![0u8; TILE_DATA_SIZE];
        for (i, byte) in data.iter_mut().enumerate() {
            *byte = (i / TILE_SIZE) as u8 ^ (i % TILE_SIZE) as u8;
        }
        data
    }

    #[test]
    fn unsigned_mode_indexes_from_bank_start() {
        let data = tile_data_with_marks();
        let row = decode_row(&data, 5, 3, TileAddressing::Unsigned);
        let off = 5 * TILE_SIZE + 6;
        assert_eq!(row, [data[off], data[off + 1]]);
    }

    #[test]
    fn signed_mode_negates_index_into_alternate_bank() {
        let data = tile_data_with_marks();

        // index 1 -> tile 255 of the bank at +0x800
        let off = 0x800 + 255 * TILE_SIZE;
        assert_eq!(decode_row(&data, 1, 0, TileAddressing::Signed), [data[off], data[off + 1]]);

        // index 0 stays 0
        assert_eq!(decode_row(&data, 0, 0, TileAddressing::Signed), [data[0x800], data[0x801]]);

        // index 0x80 is its own negation
        let off = 0x800 + 0x80 * TILE_SIZE + 14;
        assert_eq!(decode_row(&data, 0x80, 7, TileAddressing::Signed), [data[off], data[off + 1]]);
    }

    #[test]
    fn row_wraps_within_the_tile() {
        let data = tile_data_with_marks();
        assert_eq!(
            decode_row(&data, 9, 10, TileAddressing::Unsigned),
            decode_row(&data, 9, 2, TileAddressing::Unsigned)
        );
    }
}
