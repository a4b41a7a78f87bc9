//! This example decodes a GIF the way the map screens do and writes the resized result as a PPM.
//!
//! Basic usage: `cargo run --example resize -- GIF_FILE OUT_FILE --width 135 --height 135`
//!
//! More usage and arguments can be listed by running `cargo run --example resize -- --help`

use clap::Parser;
use embedded_graphics::{
    pixelcolor::{raw::RawU16, Rgb565, Rgb888},
    prelude::*,
};
use std::{fs, path::PathBuf};
use tinygifmap::{pipeline, resize_masked, Decoder, PixelBuffer, RGB565_MASKS};

#[derive(Parser)]
struct Args {
    /// Output width, defaults to the gif's
    #[clap(long)]
    width: Option<u32>,

    /// Output height, defaults to the gif's
    #[clap(long)]
    height: Option<u32>,

    /// Scratch buffer size in 16-bit words
    #[clap(long, default_value = "1024")]
    buffer: usize,

    /// GIF file
    gif_file: PathBuf,

    /// Binary PPM to write
    ppm_file: PathBuf,
}

fn main() {
    let args = Args::parse();

    let data = fs::read(&args.gif_file).unwrap();
    let gif = Decoder::from_slice(&data).unwrap();
    let src = gif.frame_area().size;

    let mut base = Vec::with_capacity(gif.num_pixels());
    let mut buffer = PixelBuffer::new(args.buffer);
    let decoded = pipeline::decode_base_map(&gif, &mut buffer, |_, words, _| {
        base.extend_from_slice(words)
    });
    println!(
        "{}: {}x{} ({} of {} pixels), delay {} ms",
        args.gif_file.display(),
        src.width,
        src.height,
        decoded,
        gif.num_pixels(),
        gif.delay_ms()
    );
    // a short stream leaves the rest of the image black
    base.resize(gif.num_pixels(), 0);

    let dst = Size::new(
        args.width.unwrap_or(src.width),
        args.height.unwrap_or(src.height),
    );
    let mut out = vec![Rgb888::BLACK; (dst.width * dst.height) as usize];
    resize_masked(
        src,
        dst,
        &base,
        |p, v| {
            out[(p.y as u32 * dst.width + p.x as u32) as usize] =
                Rgb565::from(RawU16::new(v)).into();
        },
        RGB565_MASKS,
    )
    .unwrap();

    let mut ppm = format!("P6\n{} {}\n255\n", dst.width, dst.height).into_bytes();
    ppm.extend(out.iter().flat_map(|c| [c.r(), c.g(), c.b()]));
    fs::write(&args.ppm_file, ppm).unwrap();
}
