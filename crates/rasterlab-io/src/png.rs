//! PNG reading and writing.
//!
//! Decoding accepts 8-bit grayscale, grayscale+alpha, RGB, RGBA and
//! palette images and always yields RGBA8; missing alpha becomes 255.
//! Encoding always writes 8-bit RGBA.
//!
//! # Example
//!
//! ```rust,ignore
//! use rasterlab_io::png::{read, write};
//!
//! let image = read("input.png")?;
//! write("output.png", &image)?;
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::Path;

use crate::{IoError, IoResult};
use rasterlab_core::PixelBuffer;
use tracing::{debug, trace};

/// Reads a PNG file into an RGBA buffer.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<PixelBuffer> {
    let path = path.as_ref();
    trace!(path = %path.display(), "png read");
    let file = File::open(path)?;
    decode(BufReader::new(file))
}

/// Decodes a PNG stream into an RGBA buffer.
pub fn decode<R: BufRead + Seek>(reader: R) -> IoResult<PixelBuffer> {
    let mut decoder = png::Decoder::new(reader);
    // Palette -> RGB(A), sub-byte gray -> 8-bit, tRNS -> alpha
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::Decode(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::Decode("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::Decode(e.to_string()))?;
    let bytes = &buf[..info.buffer_size()];

    debug!(
        width = info.width,
        height = info.height,
        color = ?info.color_type,
        depth = ?info.bit_depth,
        "png decoded"
    );

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "{:?} bit depth (only 8-bit is accepted)",
            info.bit_depth
        )));
    }

    let rgba: Vec<u8> = match info.color_type {
        png::ColorType::Rgba => bytes.to_vec(),
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::Grayscale => bytes.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        other => {
            return Err(IoError::UnsupportedFormat(format!("{:?}", other)));
        }
    };

    Ok(PixelBuffer::from_raw(info.width, info.height, rgba)?)
}

/// Writes an RGBA buffer as an 8-bit RGBA PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &PixelBuffer) -> IoResult<()> {
    let path = path.as_ref();
    trace!(path = %path.display(), width = image.width(), height = image.height(), "png write");
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    encode(&mut writer, image)?;
    writer.flush()?;
    Ok(())
}

/// Encodes an RGBA buffer as an 8-bit RGBA PNG stream.
pub fn encode<W: Write>(writer: W, image: &PixelBuffer) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::Encode(e.to_string()))?;
    png_writer
        .write_image_data(image.data())
        .map_err(|e| IoError::Encode(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::Encode(e.to_string()))?;
    Ok(())
}
