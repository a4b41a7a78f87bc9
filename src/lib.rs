//! A small gif decoder and bilinear resampler for no-std devices that push pixels to small panels.
//!
//! The decoder handles a single image GIF89a held in memory. It never fails: missing or damaged
//! parts of the file just end the pixel stream early, and colors that can't be resolved come out
//! black. Decoded images can be drawn straight onto an [`embedded_graphics`] [`DrawTarget`], or
//! pulled as color table indices or colors and pushed through the [`bilinear`] resizer.
//!
//! ```ignore
//! let gif = tinygifmap::Decoder::from_slice(bytes)?;
//! Image::new(&gif, Point::zero()).draw(&mut display)?;
//! ```
//!
//! [`pipeline`] has the helpers used to build map tiles: a base map decoded into both RGB565 and
//! RGB332 in fixed size blocks, and transparent overlays resized on top of it.
//!
//! <!-- README-LINKS
//! [`embedded_graphics`]: https://docs.rs/embedded_graphics
//! [`DrawTarget`]: https://docs.rs/embedded-graphics/latest/embedded_graphics/draw_target/trait.DrawTarget.html
//! README-LINKS -->
//!
//! [`DrawTarget`]: embedded_graphics::draw_target::DrawTarget

#![cfg_attr(not(test), no_std)]
extern crate alloc;

use embedded_graphics::{
    pixelcolor::Rgb565,
    prelude::*,
    primitives::Rectangle,
};

pub mod bilinear;
pub mod brle;
mod buffer;
pub mod color;
mod common;
mod frame;
mod header;
mod iterators;
pub mod lzw;
pub mod pipeline;
#[cfg(test)]
mod test_utils;

pub use bilinear::{reduce, resize, resize_masked, Resampler, Sample};
pub use buffer::PixelBuffer;
pub use color::{ChannelMasks, RGB332_MASKS, RGB565_MASKS};
pub use common::{ParseError, ResizeError};
pub use frame::{Decoder, Indices, Pixels};
pub use header::{ColorTable, DisposalMethod, GraphicsControl, Header, ImageDescriptor};
pub use iterators::{BitReader, BitSubBlockReader, SubBlockReader};
pub use lzw::{Dictionary, LzwDecoder};

impl ImageDrawable for Decoder<'_> {
    type Color = Rgb565;

    /// Draws every opaque pixel at its place on the logical screen; transparent ones are skipped.
    fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let area = self.frame_area();
        let width = area.size.width.max(1) as usize;
        let pixels = self
            .pixels()
            .take(self.num_pixels())
            .enumerate()
            .filter_map(|(i, pixel)| {
                let offset = Point::new((i % width) as i32, (i / width) as i32);
                pixel.map(|color| Pixel(area.top_left + offset, Rgb565::from(color)))
            });
        target.draw_iter(pixels)
    }

    fn draw_sub_image<D>(&self, target: &mut D, area: &Rectangle) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        self.draw(&mut target.translated(-area.top_left).clipped(area))
    }
}

impl OriginDimensions for Decoder<'_> {
    fn size(&self) -> Size {
        self.base_size()
    }
}
