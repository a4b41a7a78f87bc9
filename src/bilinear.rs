//! Bilinear resizing over flat, row-major rasters of any sample type.
//!
//! Each destination pixel looks at the four source samples around its source-space position.
//! When those four are bit-identical the sample is passed through untouched, so flat regions
//! (and palette exact colors in them) survive any scale. Otherwise the samples are split into
//! three channels, interpolated along x for both rows and then along y, rounded, and
//! recomposed.
//!
//! Reads past the last row or column are clamped to it.

use core::ops::{BitAnd, BitOr};

use embedded_graphics::prelude::{Point, Size};

use crate::{color::ChannelMasks, common::ResizeError};

/// A raster sample that can take part in interpolation.
///
/// Values above 2^24 lose precision on the way through `f32`.
pub trait Sample: Copy + PartialEq {
    fn to_f32(self) -> f32;
    /// Saturating conversion of an already rounded value.
    fn from_f32(value: f32) -> Self;
}

macro_rules! impl_sample {
    ($($ty:ty),*) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_f32(self) -> f32 {
                    self as f32
                }

                #[inline]
                fn from_f32(value: f32) -> Self {
                    value as $ty
                }
            }
        )*
    };
}

impl_sample!(u8, u16, u32);

/// Round half away from zero.
fn round(value: f32) -> f32 {
    let whole = value as i64 as f32;
    let frac = value - whole;
    if frac >= 0.5 {
        whole + 1.0
    } else if frac <= -0.5 {
        whole - 1.0
    } else {
        whole
    }
}

/// `round(a * (1 - t) + b * t)`
#[inline]
pub fn interpolate(a: f32, b: f32, t: f32) -> f32 {
    round(a * (1.0 - t) + b * t)
}

/// Corners in the order top-left, top-right, bottom-left, bottom-right.
#[inline]
fn interpolate2d(p: [f32; 4], tx: f32, ty: f32) -> f32 {
    let top = interpolate(p[0], p[1], tx);
    let bottom = interpolate(p[2], p[3], tx);
    interpolate(top, bottom, ty)
}

/// Mapping from destination to source coordinates for one resize.
#[derive(Debug, Clone, Copy)]
pub struct Resampler {
    src: Size,
    dst: Size,
    scale_x: f32,
    scale_y: f32,
}

impl Resampler {
    /// Checks that a `src` sized raster held in `source_len` samples can feed a `dst` sized one.
    pub fn new(src: Size, dst: Size, source_len: usize) -> Result<Self, ResizeError> {
        let empty_dst = dst.width == 0 || dst.height == 0;
        if !empty_dst && (src.width == 0 || src.height == 0) {
            return Err(ResizeError::EmptySource);
        }
        if source_len < src.width as usize * src.height as usize {
            return Err(ResizeError::SourceTooSmall);
        }
        Ok(Self {
            src,
            dst,
            scale_x: src.width as f32 / dst.width.max(1) as f32,
            scale_y: src.height as f32 / dst.height.max(1) as f32,
        })
    }

    pub fn source_size(&self) -> Size {
        self.src
    }

    pub fn destination_size(&self) -> Size {
        self.dst
    }

    /// Destination coordinates in raster order.
    fn points(&self) -> impl Iterator<Item = (u32, u32)> {
        let Size { width, height } = self.dst;
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    /// Value of destination pixel `(x, y)`. Only called for points of a non-empty destination,
    /// which `new` guarantees comes with a non-empty source.
    pub(crate) fn sample<T, S, C>(
        &self,
        source: &[T],
        x: u32,
        y: u32,
        split: &mut S,
        compose: &mut C,
    ) -> T
    where
        T: Sample,
        S: FnMut(Point, T) -> [T; 3],
        C: FnMut([T; 3]) -> T,
    {
        let sx = x as f32 * self.scale_x;
        let sy = y as f32 * self.scale_y;
        let last_x = self.src.width - 1;
        let last_y = self.src.height - 1;
        let isx = (sx as u32).min(last_x);
        let isy = (sy as u32).min(last_y);
        let nx = (isx + 1).min(last_x);
        let ny = (isy + 1).min(last_y);

        let corners = [(isx, isy), (nx, isy), (isx, ny), (nx, ny)];
        let pixels = corners.map(|(px, py)| source[(py * self.src.width + px) as usize]);
        if pixels.iter().all(|p| *p == pixels[0]) {
            return pixels[0];
        }

        let mut channels = [[0.0f32; 4]; 3];
        for (corner, ((px, py), pixel)) in corners.iter().zip(pixels).enumerate() {
            let parts = split(Point::new(*px as i32, *py as i32), pixel);
            for (channel, part) in channels.iter_mut().zip(parts) {
                channel[corner] = part.to_f32();
            }
        }

        let tx = sx - isx as f32;
        let ty = sy - isy as f32;
        compose(channels.map(|channel| T::from_f32(interpolate2d(channel, tx, ty))))
    }
}

/// Resizes `source` (`src` sized) to `dst`, calling `dot` once per destination pixel in raster
/// order.
///
/// `split` gets each differing corner sample together with its source coordinate and breaks it
/// into three channels; `compose` puts interpolated channels back together.
pub fn resize<T, D, S, C>(
    src: Size,
    dst: Size,
    source: &[T],
    mut dot: D,
    mut split: S,
    mut compose: C,
) -> Result<(), ResizeError>
where
    T: Sample,
    D: FnMut(Point, T),
    S: FnMut(Point, T) -> [T; 3],
    C: FnMut([T; 3]) -> T,
{
    let resampler = Resampler::new(src, dst, source.len())?;
    for (x, y) in resampler.points() {
        let value = resampler.sample(source, x, y, &mut split, &mut compose);
        dot(Point::new(x as i32, y as i32), value);
    }
    Ok(())
}

/// [`resize`] for packed pixels whose channels are picked out with bit masks, e.g. RGB565.
pub fn resize_masked<T, D>(
    src: Size,
    dst: Size,
    source: &[T],
    dot: D,
    masks: ChannelMasks<T>,
) -> Result<(), ResizeError>
where
    T: Sample + BitAnd<Output = T> + BitOr<Output = T>,
    D: FnMut(Point, T),
{
    resize(
        src,
        dst,
        source,
        dot,
        |_, value| masks.split(value),
        |channels| masks.compose(channels),
    )
}

/// Downsamples in place: the `dst` sized result is written row-major to the front of `data`,
/// which holds the `src` sized source.
///
/// The write position never passes a sample that is still to be read, as long as `dst` is no
/// larger than `src` in either direction.
pub fn reduce<T>(
    src: Size,
    dst: Size,
    data: &mut [T],
    masks: ChannelMasks<T>,
) -> Result<(), ResizeError>
where
    T: Sample + BitAnd<Output = T> + BitOr<Output = T>,
{
    if dst.width > src.width || dst.height > src.height {
        return Err(ResizeError::DestinationTooLarge);
    }
    let resampler = Resampler::new(src, dst, data.len())?;
    let mut split = |_: Point, value: T| masks.split(value);
    let mut compose = |channels: [T; 3]| masks.compose(channels);
    for (x, y) in resampler.points() {
        let value = resampler.sample(data, x, y, &mut split, &mut compose);
        data[(y * dst.width + x) as usize] = value;
    }
    Ok(())
}
