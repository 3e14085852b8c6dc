#![forbid(unsafe_code)]

//! Scanline renderer and STAT interrupt model for the Game Boy (DMG) LCD.
//!
//! The host owns a 64 KiB memory image; a [`Ppu`] borrows or owns it, keeps
//! the video registers, and renders whole frames into a caller buffer.

pub mod bus;
pub mod io;
pub mod log_buffer;
pub mod mem;
pub mod ppu;
pub mod video;

pub use crate::bus::BusAccess;
pub use crate::io::{Io, LcdMode, Lcdc, Stat};
pub use crate::mem::{HW_MEMORY_SIZE, Mem, MemError, Tile, TileMapSelect};
pub use crate::ppu::Ppu;
pub use crate::ppu::interrupt::InterruptSink;
pub use crate::ppu::sprite::{ObjAttr, OamEntry};
pub use crate::video::{FRAME_PIXELS, FrameBuffer, Palette, SCREEN_H, SCREEN_W};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
