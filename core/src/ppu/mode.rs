//! Frame-level STAT mode sequencing.

use crate::io::{Lcdc, LcdMode};
use crate::video::{BLANK, FrameBuffer, Palette, SCREEN_W};

use super::Ppu;
use super::sprite::{self, SpriteSize};

const VBLANK_FIRST_LINE: u8 = 144;
const LAST_LINE: u8 = 153;

impl<B: AsRef<[u8]> + AsMut<[u8]>> Ppu<B> {
    /// Renders one frame into `out`, mapping hardware shades through `palette`.
    ///
    /// Each visible line runs OAM search -> pixel transfer -> HBlank; VBlank is
    /// entered once at line 144 and held while LY counts up to 153. On return
    /// LY is 153 and the mode is VBlank. With the LCD disabled the frame is
    /// filled with [`BLANK`] and LY/STAT are left untouched.
    pub fn render(&mut self, out: &mut FrameBuffer, palette: &Palette) {
        self.irq.reset();

        if !self.io.lcdc.contains(Lcdc::LCD_ENABLE) {
            out.fill(BLANK);
            #[cfg(feature = "trace_ppu")]
            log::trace!("lcd disabled, frame blanked");
            return;
        }

        for (line, row) in out.chunks_exact_mut(SCREEN_W).enumerate() {
            let line = line as u8;
            self.io.set_ly(line);

            self.enter_mode(LcdMode::OamSearch);
            let size = if self.io.lcdc.contains(Lcdc::OBJ_SIZE_SELECT) {
                SpriteSize::Size8x16
            } else {
                SpriteSize::Size8x8
            };
            let sprites = sprite::scan(line, self.mem.oam(), size);
            self.poll_mode();

            #[cfg(feature = "trace_ppu")]
            log::trace!("line {line}: {} sprite(s)", sprites.len());

            self.enter_mode(LcdMode::PixelTransfer);
            self.compose_line(line, &sprites, palette, row);
            self.poll_mode();

            self.enter_mode(LcdMode::HBlank);
        }

        self.io.set_ly(VBLANK_FIRST_LINE);
        self.enter_mode(LcdMode::VBlank);
        for line in VBLANK_FIRST_LINE + 1..=LAST_LINE {
            self.io.set_ly(line);
            self.io.update_lyc_match();
            self.poll_mode();
        }

        #[cfg(feature = "trace_ppu")]
        log::trace!("frame done, stat {:#04X}", self.io.stat().bits());
    }

    fn enter_mode(&mut self, mode: LcdMode) {
        self.io.set_mode(mode);
        self.io.update_lyc_match();
        #[cfg(test)]
        self.transitions.push((self.io.ly(), mode));
        let fired = self.irq.enter(mode, self.io.stat());
        self.notify(fired);
    }

    /// Re-checks the current mode's condition without re-arming it.
    fn poll_mode(&mut self) {
        let fired = self.irq.poll(self.io.mode(), self.io.stat());
        self.notify(fired);
    }
}
