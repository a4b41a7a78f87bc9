use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::{Point, RgbColor, Size},
    primitives::Rectangle,
};

use crate::{
    common::ParseError,
    header::{ColorTable, GifInfo, GraphicsControl, Header, ImageDescriptor},
    iterators::{BitReader, BitSubBlockReader, SubBlockReader},
    lzw::LzwDecoder,
};

/// Decoder for a single image GIF89a held in memory.
///
/// Nothing is copied out of `bytes`; every field is read on demand. Decoding is best effort:
/// truncated or garbled data ends the pixel stream early instead of failing.
#[derive(Clone, Copy)]
pub struct Decoder<'a> {
    info: GifInfo<'a>,
}

impl<'a> Decoder<'a> {
    /// Wraps `bytes` without looking at the signature; see [`check_signature`](Self::check_signature).
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            info: GifInfo::parse(BitReader::new(bytes)),
        }
    }

    /// Like [`new`](Self::new), but refuses anything that isn't a GIF89a.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self, ParseError> {
        let decoder = Self::new(bytes);
        if decoder.check_signature() {
            Ok(decoder)
        } else {
            Err(ParseError::BadGifFile)
        }
    }

    pub fn check_signature(&self) -> bool {
        self.info.header().check_signature()
    }

    pub fn header(&self) -> &Header<'a> {
        self.info.header()
    }

    pub fn graphics_control(&self) -> Option<&GraphicsControl<'a>> {
        self.info.graphics_control()
    }

    pub fn image_descriptor(&self) -> Option<&ImageDescriptor<'a>> {
        self.info.image_descriptor()
    }

    pub fn width(&self) -> u16 {
        self.header().width()
    }

    pub fn height(&self) -> u16 {
        self.header().height()
    }

    pub fn base_size(&self) -> Size {
        self.header().size()
    }

    pub fn global_color(&self, index: u8) -> Rgb888 {
        self.header()
            .global_color_table()
            .map_or(Rgb888::BLACK, |table| table.color(index))
    }

    pub fn has_local_color_table(&self) -> bool {
        self.image_descriptor()
            .map_or(false, |d| d.has_local_color_table())
    }

    pub fn local_color(&self, index: u8) -> Rgb888 {
        self.image_descriptor()
            .and_then(|d| d.local_color_table())
            .map_or(Rgb888::BLACK, |table| table.color(index))
    }

    /// The table pixels resolve through: local beats global.
    pub fn color_table(&self) -> Option<ColorTable<'a>> {
        self.info.color_table()
    }

    pub fn has_transparent_color(&self) -> bool {
        self.graphics_control()
            .map_or(false, |c| c.has_transparent_color())
    }

    pub fn transparent_color_index(&self) -> u8 {
        self.graphics_control()
            .map_or(0, |c| c.transparent_color_index())
    }

    /// Amount of time to show the image, in milliseconds
    pub fn delay_ms(&self) -> usize {
        self.graphics_control()
            .map_or(0, |c| usize::from(c.delay_time()) * 10)
    }

    /// Where the image sits on the logical screen
    pub fn frame_area(&self) -> Rectangle {
        self.image_descriptor()
            .map_or(Rectangle::new(Point::zero(), Size::zero()), |d| {
                d.bounding_box()
            })
    }

    pub fn num_pixels(&self) -> usize {
        self.image_descriptor().map_or(0, |d| d.num_pixels())
    }

    /// Raw color table indices in raster order.
    pub fn indices(&self) -> Indices<'a> {
        let lzw = self.image_descriptor().map(|d| {
            let blocks = SubBlockReader::new(d.bytes(), d.data_offset());
            LzwDecoder::new(BitSubBlockReader::new(blocks), d.min_code_size())
        });
        Indices { lzw }
    }

    /// Resolved colors in raster order, `None` for the transparent index.
    pub fn pixels(&self) -> Pixels<'a> {
        Pixels {
            indices: self.indices(),
            table: self.color_table(),
            transparent: self.graphics_control().and_then(|c| c.transparent_idx()),
        }
    }

    pub fn decode_indices<F: FnMut(u8)>(&self, sink: F) {
        self.indices().for_each(sink)
    }

    /// Calls `sink(color, transparent)` once per pixel; transparent pixels come out black.
    pub fn decode_pixels<F: FnMut(Rgb888, bool)>(&self, mut sink: F) {
        self.pixels().for_each(|pixel| match pixel {
            Some(color) => sink(color, false),
            None => sink(Rgb888::BLACK, true),
        })
    }
}

/// Iterator over decoded color table indices.
pub struct Indices<'a> {
    lzw: Option<LzwDecoder<'a>>,
}

impl Iterator for Indices<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.lzw.as_mut()?.next()
    }
}

/// Iterator over decoded pixels.
pub struct Pixels<'a> {
    indices: Indices<'a>,
    table: Option<ColorTable<'a>>,
    transparent: Option<u8>,
}

impl Iterator for Pixels<'_> {
    type Item = Option<Rgb888>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        if Some(index) == self.transparent {
            return Some(None);
        }
        Some(Some(
            self.table
                .map_or(Rgb888::BLACK, |table| table.color(index)),
        ))
    }
}
