use embedded_graphics::{pixelcolor::Rgb888, prelude::*, primitives::Rectangle};

use crate::{
    common::{Block, ExtensionLabel},
    iterators::{BitReader, SubBlockReader},
};

pub const SIGNATURE: &[u8; 6] = b"GIF89a";
/// Signature plus logical screen descriptor
pub const HEADER_LEN: usize = 13;
/// Image separator, position, size and flags
pub const DESCRIPTOR_LEN: usize = 10;

/// Number of entries described by a 3 bit color table size field.
fn table_len(size_bits: u8) -> usize {
    1 << (usize::from(size_bits & 0x7) + 1)
}

/// A run of RGB triples inside the file.
#[derive(Clone, Copy)]
pub struct ColorTable<'a> {
    reader: BitReader<'a>,
    offset: usize,
    len: usize,
}

impl<'a> ColorTable<'a> {
    fn new(reader: BitReader<'a>, offset: usize, len: usize) -> Self {
        Self {
            reader,
            offset,
            len,
        }
    }

    /// Declared number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the table in the file, in bytes
    pub fn byte_len(&self) -> usize {
        self.len * 3
    }

    /// Color for `index`, black past the end of the table or of the file.
    pub fn color(&self, index: u8) -> Rgb888 {
        let index = usize::from(index);
        if index >= self.len {
            return Rgb888::BLACK;
        }
        let offset = self.offset + index * 3;
        Rgb888::new(
            self.reader.byte(offset, 0),
            self.reader.byte(offset + 1, 0),
            self.reader.byte(offset + 2, 0),
        )
    }
}

/// Signature and logical screen descriptor.
#[derive(Clone, Copy)]
pub struct Header<'a> {
    reader: BitReader<'a>,
}

impl<'a> Header<'a> {
    pub fn new(reader: BitReader<'a>) -> Self {
        Self { reader }
    }

    pub fn check_signature(&self) -> bool {
        self.reader.as_slice().starts_with(SIGNATURE)
    }

    pub fn width(&self) -> u16 {
        self.reader.u16(6, 0)
    }

    pub fn height(&self) -> u16 {
        self.reader.u16(8, 0)
    }

    /// Gif size in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width().into(), self.height().into())
    }

    pub fn has_global_color_table(&self) -> bool {
        self.reader.flag(10, 7)
    }

    pub fn global_color_table_sorted(&self) -> bool {
        self.reader.flag(10, 3)
    }

    /// Bits per primary color in the source image
    pub fn color_resolution(&self) -> u8 {
        self.reader.field(10, 4, 3, 0) + 1
    }

    pub fn background_color_index(&self) -> u8 {
        self.reader.byte(11, 0)
    }

    pub fn pixel_aspect_ratio(&self) -> u8 {
        self.reader.byte(12, 0)
    }

    /// Number of global color table entries, 0 if there is none
    pub fn global_color_table_len(&self) -> usize {
        if self.has_global_color_table() {
            table_len(self.reader.field(10, 0, 3, 0))
        } else {
            0
        }
    }

    pub fn global_color_table(&self) -> Option<ColorTable<'a>> {
        self.has_global_color_table()
            .then(|| ColorTable::new(self.reader, HEADER_LEN, self.global_color_table_len()))
    }

    /// Offset of the first block after the header and global color table
    pub fn byte_len(&self) -> usize {
        HEADER_LEN + self.global_color_table_len() * 3
    }
}

/// Process for displaying next image in the file
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisposalMethod {
    NotSpecified = 0,
    DoNotDispose = 1,
    OverwriteWithBG = 2,
    OverwriteWithPrev = 3,
}

/// Graphics control extension, starting at its `0x21` introducer.
#[derive(Clone, Copy)]
pub struct GraphicsControl<'a> {
    reader: BitReader<'a>,
    offset: usize,
}

impl<'a> GraphicsControl<'a> {
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn ctrl(&self) -> u8 {
        self.reader.byte(self.offset + 3, 0)
    }

    pub fn has_transparent_color(&self) -> bool {
        self.ctrl() & 1 == 1
    }

    ///table index for a transparent color
    pub fn transparent_color_index(&self) -> u8 {
        self.reader.byte(self.offset + 6, 0)
    }

    pub fn transparent_idx(&self) -> Option<u8> {
        self.has_transparent_color()
            .then(|| self.transparent_color_index())
    }

    ///Delay time, in hundredths of a second
    pub fn delay_time(&self) -> u16 {
        self.reader.u16(self.offset + 4, 0)
    }

    pub fn disposal_method(&self) -> DisposalMethod {
        match (self.ctrl() >> 2) & 0x7 {
            1 => DisposalMethod::DoNotDispose,
            2 => DisposalMethod::OverwriteWithBG,
            3 => DisposalMethod::OverwriteWithPrev,
            _ => DisposalMethod::NotSpecified,
        }
    }
}

/// Image descriptor, starting at its `0x2C` separator.
#[derive(Clone, Copy)]
pub struct ImageDescriptor<'a> {
    reader: BitReader<'a>,
    offset: usize,
}

impl<'a> ImageDescriptor<'a> {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn bytes(&self) -> &'a [u8] {
        self.reader.as_slice()
    }

    pub fn origin(&self) -> Point {
        Point::new(
            self.reader.u16(self.offset + 1, 0).into(),
            self.reader.u16(self.offset + 3, 0).into(),
        )
    }

    pub fn size(&self) -> Size {
        Size::new(
            self.reader.u16(self.offset + 5, 0).into(),
            self.reader.u16(self.offset + 7, 0).into(),
        )
    }

    pub fn bounding_box(&self) -> Rectangle {
        Rectangle::new(self.origin(), self.size())
    }

    pub fn num_pixels(&self) -> usize {
        let size = self.size();
        size.width as usize * size.height as usize
    }

    pub fn interlaced(&self) -> bool {
        self.reader.flag(self.offset + 9, 6)
    }

    pub fn has_local_color_table(&self) -> bool {
        self.reader.flag(self.offset + 9, 7)
    }

    pub fn local_color_table(&self) -> Option<ColorTable<'a>> {
        self.has_local_color_table().then(|| {
            let len = table_len(self.reader.field(self.offset + 9, 0, 3, 0));
            ColorTable::new(self.reader, self.offset + DESCRIPTOR_LEN, len)
        })
    }

    fn local_color_table_byte_len(&self) -> usize {
        self.local_color_table().map_or(0, |table| table.byte_len())
    }

    /// Offset of the LZW minimum code size byte
    pub fn code_size_offset(&self) -> usize {
        self.offset + DESCRIPTOR_LEN + self.local_color_table_byte_len()
    }

    pub fn min_code_size(&self) -> u8 {
        self.reader.byte(self.code_size_offset(), 0)
    }

    /// Offset of the first image data sub-block
    pub fn data_offset(&self) -> usize {
        self.code_size_offset() + 1
    }
}

/// Where things are in a single image gif.
#[derive(Clone, Copy)]
pub struct GifInfo<'a> {
    pub(crate) header: Header<'a>,
    pub(crate) control: Option<GraphicsControl<'a>>,
    pub(crate) descriptor: Option<ImageDescriptor<'a>>,
}

impl<'a> GifInfo<'a> {
    /// Walks from the end of the header up to the first image descriptor, noting the first
    /// graphics control extension on the way and stepping over any other extension.
    pub fn parse(reader: BitReader<'a>) -> Self {
        let header = Header::new(reader);
        let bytes = reader.as_slice();
        let mut control = None;
        let mut offset = header.byte_len();

        let descriptor = loop {
            let label = match bytes.get(offset) {
                Some(label) => *label,
                None => break None,
            };
            match Block::try_from(label) {
                Ok(Block::Image) => break Some(ImageDescriptor { reader, offset }),
                Ok(Block::Extension) => {
                    match ExtensionLabel::try_from(reader.byte(offset + 1, 0)) {
                        Ok(ExtensionLabel::Graphics) if control.is_none() => {
                            control = Some(GraphicsControl { reader, offset })
                        }
                        Ok(_) => {}
                        Err(_) => log::debug!("gif: unknown extension at {}", offset),
                    }
                    let mut blocks = SubBlockReader::new(bytes, offset + 2);
                    blocks.by_ref().for_each(drop);
                    match blocks.end_offset() {
                        Some(next) => offset = next,
                        None => break None,
                    }
                }
                Ok(Block::Trailer) | Err(_) => break None,
            }
        };

        log::debug!(
            "gif: {}x{}, {} global colors, control at {:?}, image at {:?}",
            header.width(),
            header.height(),
            header.global_color_table_len(),
            control.map(|c| c.offset),
            descriptor.map(|d| d.offset),
        );

        Self {
            header,
            control,
            descriptor,
        }
    }

    pub fn header(&self) -> &Header<'a> {
        &self.header
    }

    pub fn graphics_control(&self) -> Option<&GraphicsControl<'a>> {
        self.control.as_ref()
    }

    pub fn image_descriptor(&self) -> Option<&ImageDescriptor<'a>> {
        self.descriptor.as_ref()
    }

    /// Local color table when the image has one, the global one otherwise
    pub fn color_table(&self) -> Option<ColorTable<'a>> {
        self.descriptor
            .and_then(|d| d.local_color_table())
            .or_else(|| self.header.global_color_table())
    }
}
