//! Glue turning a downloaded map gif into the rasters the display composes.
//!
//! The base map is decoded once into RGB565 (for direct display) and RGB332 (as the backdrop of
//! live overlays), then resized to every panel resolution. Live overlays are decoded into RGB332
//! with a marker value where the gif is transparent, and shrunk with the base map showing
//! through the marked samples.

use embedded_graphics::prelude::{Point, RgbColor, Size};

use crate::{
    bilinear,
    buffer::PixelBuffer,
    color::{rgb332, rgb565, swap_bytes, RGB332_MASKS, RGB565_MASKS},
    common::ResizeError,
    frame::Decoder,
};

/// Decodes `gif` into parallel RGB565 and RGB332 planes carved out of `buffer`, one block of
/// `buffer.len() / 3` pixels at a time.
///
/// `flush(offset, words, bytes)` receives every full block and then the remainder; `offset`
/// counts pixels. Returns the number of decoded pixels.
pub fn decode_base_map<F>(gif: &Decoder, buffer: &mut PixelBuffer, mut flush: F) -> usize
where
    F: FnMut(usize, &[u16], &[u8]),
{
    let block = buffer.len() / 3;
    if block == 0 {
        log::warn!("base map: scratch buffer too small");
        return 0;
    }
    let (words, bytes) = buffer.split_planes(block);
    let mut filled = 0;
    let mut offset = 0;
    gif.decode_pixels(|color, _| {
        words[filled] = rgb565(color.r(), color.g(), color.b());
        bytes[filled] = rgb332(color.r(), color.g(), color.b());
        filled += 1;
        if filled == block {
            flush(offset, &words[..filled], &bytes[..filled]);
            offset += filled;
            filled = 0;
        }
    });
    if filled > 0 {
        flush(offset, &words[..filled], &bytes[..filled]);
        offset += filled;
    }
    offset
}

/// RGB565 bilinear resize whose output words come out byte swapped for the panel.
pub fn resize_for_display<D>(
    src: Size,
    dst: Size,
    source: &[u16],
    mut dot: D,
) -> Result<(), ResizeError>
where
    D: FnMut(Point, u16),
{
    bilinear::resize_masked(
        src,
        dst,
        source,
        |p, value| dot(p, swap_bytes(value)),
        RGB565_MASKS,
    )
}

/// Decodes `gif` into an RGB332 raster, `marker` standing in for transparent pixels.
///
/// `out` is cleared to `marker` first, so whatever a short stream doesn't reach reads as
/// transparent. Pixels past the end of `out` are dropped. Returns the number decoded.
pub fn decode_overlay(gif: &Decoder, out: &mut [u8], marker: u8) -> usize {
    out.fill(marker);
    let mut written = 0;
    for (slot, pixel) in out.iter_mut().zip(gif.pixels()) {
        *slot = pixel.map_or(marker, |c| rgb332(c.r(), c.g(), c.b()));
        written += 1;
    }
    written
}

/// Resizes an RGB332 overlay. Samples equal to `marker` are replaced by the `base` pixel at the
/// same source coordinate before interpolating.
///
/// A destination pixel whose four source samples are all `marker` stays `marker`.
pub fn resize_overlay<D>(
    src: Size,
    dst: Size,
    overlay: &[u8],
    base: &[u8],
    marker: u8,
    dot: D,
) -> Result<(), ResizeError>
where
    D: FnMut(Point, u8),
{
    if base.len() < src.width as usize * src.height as usize {
        return Err(ResizeError::SourceTooSmall);
    }
    bilinear::resize(
        src,
        dst,
        overlay,
        dot,
        |p, value| {
            let value = if value == marker {
                base[p.y as usize * src.width as usize + p.x as usize]
            } else {
                value
            };
            RGB332_MASKS.split(value)
        },
        |channels| RGB332_MASKS.compose(channels),
    )
}
