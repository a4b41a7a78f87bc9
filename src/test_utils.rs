use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use std::vec::Vec;
use weezl::{encode::Encoder, BitOrder};

pub(crate) struct Framebuffer<const WIDTH: usize, const HEIGHT: usize> {
    pub pixels: [[Rgb565; WIDTH]; HEIGHT],
}

impl<const WIDTH: usize, const HEIGHT: usize> Framebuffer<WIDTH, HEIGHT> {
    pub fn new() -> Self {
        Self::filled(Rgb565::BLACK)
    }

    pub fn filled(color: Rgb565) -> Self {
        Self {
            pixels: [[color; WIDTH]; HEIGHT],
        }
    }
}

impl<const WIDTH: usize, const HEIGHT: usize> DrawTarget for Framebuffer<WIDTH, HEIGHT> {
    type Error = std::convert::Infallible;
    type Color = Rgb565;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = embedded_graphics::Pixel<Rgb565>>,
    {
        for Pixel(p, c) in pixels {
            if let (Ok(x), Ok(y)) = (usize::try_from(p.x), usize::try_from(p.y)) {
                if x < WIDTH && y < HEIGHT {
                    self.pixels[y][x] = c;
                }
            }
        }

        Ok(())
    }
}

impl<const WIDTH: usize, const HEIGHT: usize> OriginDimensions for Framebuffer<WIDTH, HEIGHT> {
    fn size(&self) -> Size {
        Size::new(WIDTH as u32, HEIGHT as u32)
    }
}

/// GIF-flavoured LZW from the reference encoder, including clear and end codes.
pub(crate) fn lzw_encode(indices: &[u8], min_code_size: u8) -> Vec<u8> {
    Encoder::new(BitOrder::Lsb, min_code_size)
        .encode(indices)
        .unwrap()
}

/// Frames raw bytes as gif sub-blocks, zero length terminator included.
pub(crate) fn lzw_sub_blocks(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in data.chunks(255) {
        out.push(chunk.len() as u8);
        out.extend_from_slice(chunk);
    }
    out.push(0);
    out
}

/// Packs codes LSB first, for streams the reference encoder would never produce.
#[derive(Default)]
pub(crate) struct BitWriter {
    bytes: Vec<u8>,
    acc: u32,
    bits: u8,
}

impl BitWriter {
    pub fn push(&mut self, code: u16, width: u8) {
        self.acc |= u32::from(code) << self.bits;
        self.bits += width;
        while self.bits >= 8 {
            self.bytes.push(self.acc as u8);
            self.acc >>= 8;
            self.bits -= 8;
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        if self.bits > 0 {
            self.bytes.push(self.acc as u8);
        }
        self.bytes
    }
}

fn size_bits(entries: usize) -> u8 {
    let mut bits = 0;
    while (2usize << bits) < entries && bits < 7 {
        bits += 1;
    }
    bits
}

fn push_table(out: &mut Vec<u8>, palette: &[[u8; 3]]) {
    let len = 2usize << size_bits(palette.len());
    for idx in 0..len {
        out.extend_from_slice(palette.get(idx).unwrap_or(&[0, 0, 0]));
    }
}

/// Hand assembled single image GIF89a files.
pub(crate) struct GifBuilder {
    width: u16,
    height: u16,
    background: u8,
    global: Option<Vec<[u8; 3]>>,
    extensions: Vec<u8>,
    origin: (u16, u16),
    frame: Option<(u16, u16)>,
    local: Option<Vec<[u8; 3]>>,
    image: Option<(u8, Vec<u8>)>,
}

impl GifBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            background: 0,
            global: None,
            extensions: Vec::new(),
            origin: (0, 0),
            frame: None,
            local: None,
            image: None,
        }
    }

    pub fn global_palette(mut self, palette: &[[u8; 3]]) -> Self {
        self.global = Some(palette.to_vec());
        self
    }

    pub fn local_palette(mut self, palette: &[[u8; 3]]) -> Self {
        self.local = Some(palette.to_vec());
        self
    }

    pub fn background(mut self, index: u8) -> Self {
        self.background = index;
        self
    }

    pub fn origin(mut self, left: u16, top: u16) -> Self {
        self.origin = (left, top);
        self
    }

    /// Image size, when it differs from the logical screen.
    pub fn frame_size(mut self, width: u16, height: u16) -> Self {
        self.frame = Some((width, height));
        self
    }

    pub fn control(mut self, transparent: Option<u8>, delay: u16, disposal: u8) -> Self {
        let ctrl = (disposal & 0x7) << 2 | u8::from(transparent.is_some());
        self.extensions.extend_from_slice(&[0x21, 0xF9, 4, ctrl]);
        self.extensions.extend_from_slice(&delay.to_le_bytes());
        self.extensions.push(transparent.unwrap_or(0));
        self.extensions.push(0);
        self
    }

    pub fn comment(mut self, text: &[u8]) -> Self {
        self.extensions.extend_from_slice(&[0x21, 0xFE]);
        self.extensions.extend(lzw_sub_blocks(text));
        self
    }

    /// Image data from the reference encoder.
    pub fn image_data(self, min_code_size: u8, indices: &[u8]) -> Self {
        let lzw = lzw_encode(indices, min_code_size);
        self.raw_image_data(min_code_size, &lzw)
    }

    /// Already LZW coded image data, framed into sub-blocks here.
    pub fn raw_image_data(mut self, min_code_size: u8, lzw: &[u8]) -> Self {
        self.image = Some((min_code_size, lzw_sub_blocks(lzw)));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = b"GIF89a".to_vec();
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        let mut flags = 0x70;
        if let Some(global) = &self.global {
            flags |= 0x80 | size_bits(global.len());
        }
        out.extend_from_slice(&[flags, self.background, 0]);
        if let Some(global) = &self.global {
            push_table(&mut out, global);
        }
        out.extend_from_slice(&self.extensions);

        if let Some((min_code_size, data)) = &self.image {
            out.push(0x2C);
            out.extend_from_slice(&self.origin.0.to_le_bytes());
            out.extend_from_slice(&self.origin.1.to_le_bytes());
            let (width, height) = self.frame.unwrap_or((self.width, self.height));
            out.extend_from_slice(&width.to_le_bytes());
            out.extend_from_slice(&height.to_le_bytes());
            match &self.local {
                Some(local) => {
                    out.push(0x80 | size_bits(local.len()));
                    push_table(&mut out, local);
                }
                None => out.push(0),
            }
            out.push(*min_code_size);
            out.extend_from_slice(data);
        }
        out.push(0x3B);
        out
    }
}
