//! PNG decode and encode.
//!
//! The codec hands the pipeline a flat row-major grid of [`Srgb`] pixels
//! and writes the result back either as 8-bit truecolour or as an
//! indexed image with a `PLTE` chunk. Only opaque sources are accepted:
//! RGB, greyscale, or palette, 8 bits per channel or less. Palette and
//! sub-8-bit greyscale sources are expanded to 8-bit during decode.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chroma_quant::Srgb;

use crate::error::CodecError;

/// Decode a PNG into an sRGB pixel grid.
///
/// Returns the pixels in row-major order together with the image width
/// and height.
///
/// # Errors
///
/// [`CodecError::Open`] when the path cannot be opened,
/// [`CodecError::UnsupportedColorType`] / [`CodecError::UnsupportedBitDepth`]
/// when the source encoding is outside the supported set, and
/// [`CodecError::Decode`] on any parse fault.
pub fn read_rgb(path: &Path) -> Result<(Vec<Srgb>, usize, usize), CodecError> {
    let file = File::open(path).map_err(|source| CodecError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND);
    let mut reader = decoder.read_info()?;

    // Check the source encoding, not the post-expansion one: alpha
    // variants must be rejected even though EXPAND would deliver them.
    let color_type = reader.info().color_type;
    let bit_depth = reader.info().bit_depth;
    match color_type {
        png::ColorType::Rgb | png::ColorType::Grayscale | png::ColorType::Indexed => {}
        other => {
            return Err(CodecError::UnsupportedColorType { color_type: other });
        }
    }
    if bit_depth == png::BitDepth::Sixteen {
        return Err(CodecError::UnsupportedBitDepth { bit_depth });
    }

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    let width = frame.width as usize;
    let height = frame.height as usize;
    let bytes = &buf[..frame.buffer_size()];

    let pixels = match frame.color_type {
        png::ColorType::Rgb => bytes
            .chunks_exact(3)
            .map(|c| Srgb::new(c[0], c[1], c[2]))
            .collect(),
        png::ColorType::Grayscale => bytes.iter().map(|&v| Srgb::new(v, v, v)).collect(),
        // A palette source with transparency expands to RGBA.
        other => {
            return Err(CodecError::UnsupportedColorType { color_type: other });
        }
    };
    Ok((pixels, width, height))
}

/// Encode an sRGB pixel grid as an 8-bit truecolour PNG.
///
/// # Errors
///
/// [`CodecError::Create`] when the destination cannot be created,
/// [`CodecError::Encode`] on any write fault.
pub fn write_rgb(
    path: &Path,
    pixels: &[Srgb],
    width: usize,
    height: usize,
) -> Result<(), CodecError> {
    debug_assert_eq!(pixels.len(), width * height);
    let file = File::create(path).map_err(|source| CodecError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);
    let mut writer = encoder.write_header()?;

    let mut data = Vec::with_capacity(pixels.len() * 3);
    for pixel in pixels {
        data.extend_from_slice(&pixel.to_bytes());
    }
    writer.write_image_data(&data)?;
    writer.finish()?;
    Ok(())
}

/// Encode an index grid and its palette as an 8-bit indexed PNG.
///
/// The palette must have at most 256 entries; indices refer into it in
/// order.
///
/// # Errors
///
/// [`CodecError::Create`] when the destination cannot be created,
/// [`CodecError::Encode`] on any write fault.
pub fn write_indexed(
    path: &Path,
    indices: &[u8],
    palette: &[Srgb],
    width: usize,
    height: usize,
) -> Result<(), CodecError> {
    debug_assert_eq!(indices.len(), width * height);
    debug_assert!(palette.len() <= 256);
    let file = File::create(path).map_err(|source| CodecError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), width as u32, height as u32);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);

    let mut plte = Vec::with_capacity(palette.len() * 3);
    for entry in palette {
        plte.extend_from_slice(&entry.to_bytes());
    }
    encoder.set_palette(plte);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(indices)?;
    writer.finish()?;
    Ok(())
}
