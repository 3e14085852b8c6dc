//! One-shot STAT interrupt tracking.
//!
//! Each mode has a slot that is armed when the sequencer enters the mode and
//! disarmed when its condition fires, so a condition held across several
//! polls raises at most one pulse per entry.

use crate::io::{LcdMode, Stat};

/// Host notification invoked once per fired edge.
pub type InterruptSink = Box<dyn FnMut()>;

#[derive(Debug, Clone, Default)]
pub struct EdgeTracker {
    armed: [bool; 4],
}

impl EdgeTracker {
    pub fn new() -> Self { Self::default() }

    /// Disarms every slot.
    pub fn reset(&mut self) {
        self.armed = [false; 4];
    }

    pub fn is_armed(&self, mode: LcdMode) -> bool {
        self.armed[mode as usize]
    }

    /// Arms `mode`'s slot and polls it.
    pub fn enter(&mut self, mode: LcdMode, stat: Stat) -> bool {
        self.armed[mode as usize] = true;
        self.poll(mode, stat)
    }

    /// Fires (and disarms) `mode`'s slot if it is armed and its condition holds.
    pub fn poll(&mut self, mode: LcdMode, stat: Stat) -> bool {
        let slot = &mut self.armed[mode as usize];
        if *slot && condition(mode, stat) {
            *slot = false;
            return true;
        }
        false
    }
}

fn condition(mode: LcdMode, stat: Stat) -> bool {
    match mode {
        LcdMode::HBlank => stat.contains(Stat::HBLANK_INT),
        LcdMode::VBlank => stat.contains(Stat::VBLANK_INT),
        LcdMode::OamSearch => stat.contains(Stat::OAM_INT),
        // line compare is delivered on the transfer slot
        LcdMode::PixelTransfer => stat.contains(Stat::LYC_INT | Stat::LYC),
    }
}
