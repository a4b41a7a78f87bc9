//! Packed framebuffer color formats.

use core::ops::{BitAnd, BitOr};

use embedded_graphics::pixelcolor::{IntoStorage, Rgb565, Rgb888};

/// Bit masks picking the red, green and blue channels out of a packed pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMasks<T> {
    pub r: T,
    pub g: T,
    pub b: T,
}

/// 5-6-5 bits in a u16
pub const RGB565_MASKS: ChannelMasks<u16> = ChannelMasks {
    r: 0xF800,
    g: 0x07E0,
    b: 0x001F,
};

/// 3-3-2 bits in a u8
pub const RGB332_MASKS: ChannelMasks<u8> = ChannelMasks {
    r: 0xE0,
    g: 0x1C,
    b: 0x03,
};

impl<T> ChannelMasks<T>
where
    T: Copy + BitAnd<Output = T> + BitOr<Output = T>,
{
    /// Channels still in place, `[value & r, value & g, value & b]`.
    pub fn split(&self, value: T) -> [T; 3] {
        [value & self.r, value & self.g, value & self.b]
    }

    pub fn compose(&self, [r, g, b]: [T; 3]) -> T {
        (r & self.r) | (g & self.g) | (b & self.b)
    }
}

pub fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    Rgb565::from(Rgb888::new(r, g, b)).into_storage()
}

pub fn rgb332(r: u8, g: u8, b: u8) -> u8 {
    (r & 0xE0) | ((g >> 3) & 0x1C) | (b >> 6)
}

/// Big endian word order for panels fed byte by byte.
#[inline]
pub fn swap_bytes(value: u16) -> u16 {
    value.rotate_left(8)
}
