pub const SCREEN_W: usize = 160;
pub const SCREEN_H: usize = 144;
pub const FRAME_PIXELS: usize = SCREEN_W * SCREEN_H;

/// Value written to every pixel while the LCD is disabled.
pub const BLANK: u8 = 0xFF;

/// One rendered frame, one byte per pixel, row-major.
pub type FrameBuffer = [u8; FRAME_PIXELS];

/// Maps the four hardware shades to output bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub colors: [u8; 4],
}

impl Palette {
    /// 8-bit grayscale, shade 0 lightest.
    pub const GRAYSCALE: Palette = Palette { colors: [0xFF, 0xAA, 0x55, 0x00] };

    pub const fn new(colors: [u8; 4]) -> Self {
        Self { colors }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::GRAYSCALE
    }
}

pub fn gray8_to_rgba8888(gray: u8) -> [u8; 4] {
    [gray, gray, gray, 0xFF]
}

pub fn framebuffer_gray_to_rgba(dst: &mut [u8], src_gray: &[u8]) {
    assert_eq!(dst.len(), src_gray.len() * 4);
    for (out, &px) in dst.chunks_exact_mut(4).zip(src_gray) {
        out.copy_from_slice(&gray8_to_rgba8888(px));
    }
}
