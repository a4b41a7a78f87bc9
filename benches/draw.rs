use criterion::{criterion_group, criterion_main, Criterion};
use embedded_graphics::{image::Image, pixelcolor::Rgb565, prelude::*};
mod perf;

use tinygifmap::{pipeline, reduce, Decoder, PixelBuffer, RGB565_MASKS};

struct Framebuffer<const WIDTH: usize, const HEIGHT: usize> {
    pixels: [[Rgb565; WIDTH]; HEIGHT],
}

impl<const WIDTH: usize, const HEIGHT: usize> Framebuffer<WIDTH, HEIGHT> {
    pub fn new() -> Self {
        let color = Rgb565::BLACK;

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
            if (0..WIDTH as i32).contains(&p.x) && (0..HEIGHT as i32).contains(&p.y) {
                self.pixels[p.y as usize][p.x as usize] = c;
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

/// A map-like tile: blocky regions of a 16 color palette, index 15 transparent.
fn map_gif(width: u16, height: u16) -> Vec<u8> {
    let palette: Vec<u8> = (0..16u8)
        .flat_map(|i| [i * 16, 255 - i * 16, i * 7])
        .collect();
    let w = usize::from(width);
    let indices: Vec<u8> = (0..w * usize::from(height))
        .map(|i| ((i % w / 8 + i / w / 5 + (i % w) * (i / w) / 97) % 16) as u8)
        .collect();

    let mut out = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut out, width, height, &palette).unwrap();
        let frame = gif::Frame::from_indexed_pixels(width, height, &indices, Some(15));
        encoder.write_frame(&frame).unwrap();
    }
    out
}

fn decoder_benchmarks(c: &mut Criterion) {
    let tile = map_gif(240, 240);

    c.bench_function("decoding_tile_indices", |b| {
        let gif = Decoder::from_slice(&tile).unwrap();

        b.iter(|| gif.indices().fold(0u32, |acc, i| acc + u32::from(i)))
    });

    c.bench_function("drawing_tile_buffer", |b| {
        let gif = Decoder::from_slice(&tile).unwrap();
        let mut fb = Framebuffer::<240, 240>::new();

        b.iter(|| Image::new(&gif, Point::zero()).draw(&mut fb).unwrap())
    });

    c.bench_function("decoding_base_map_blocks", |b| {
        let gif = Decoder::from_slice(&tile).unwrap();
        let mut buffer = PixelBuffer::new(3 * 240);

        b.iter(|| pipeline::decode_base_map(&gif, &mut buffer, |_, _, _| ()))
    });
}

fn resize_benchmarks(c: &mut Criterion) {
    let tile = map_gif(240, 240);
    let gif = Decoder::from_slice(&tile).unwrap();
    let mut base = Vec::with_capacity(240 * 240);
    pipeline::decode_base_map(&gif, &mut PixelBuffer::new(3 * 240), |_, words, _| {
        base.extend_from_slice(words)
    });

    c.bench_function("resizing_for_display", |b| {
        let mut out = vec![0u16; 135 * 135];

        b.iter(|| {
            pipeline::resize_for_display(
                Size::new(240, 240),
                Size::new(135, 135),
                &base,
                |p, v| out[(p.y * 135 + p.x) as usize] = v,
            )
            .unwrap()
        })
    });

    c.bench_function("reducing_in_place", |b| {
        b.iter_batched_ref(
            || base.clone(),
            |data| reduce(Size::new(240, 240), Size::new(135, 135), data, RGB565_MASKS).unwrap(),
            criterion::BatchSize::LargeInput,
        )
    });
}

criterion_group!(name = benches; config = Criterion::default().with_profiler(perf::FlamegraphProfiler::new(10000)); targets = decoder_benchmarks, resize_benchmarks);
criterion_main!(benches);
