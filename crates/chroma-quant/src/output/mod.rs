//! Result value type of the quantization pipeline.

use crate::color::Srgb;

/// A quantized image, in the representation the palette size allows.
///
/// Palettes small enough for an 8-bit index produce the `Indexed` form:
/// one index per pixel plus the palette itself, with indices referring to
/// the palette in its learned order. Larger palettes cannot be indexed
/// and fall back to `TrueColor`, where every pixel carries its matched
/// palette colour directly.
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizedImage {
    /// Full-colour output: each pixel remapped onto a palette colour.
    TrueColor {
        /// Remapped pixels, row-major.
        pixels: Vec<Srgb>,
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },
    /// Palette-indexed output: an index grid plus the palette.
    Indexed {
        /// Palette indices, one per pixel, row-major.
        indices: Vec<u8>,
        /// The learned palette, in index order (at most 256 entries).
        palette: Vec<Srgb>,
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },
}

impl QuantizedImage {
    /// Image width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        match self {
            QuantizedImage::TrueColor { width, .. } => *width,
            QuantizedImage::Indexed { width, .. } => *width,
        }
    }

    /// Image height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        match self {
            QuantizedImage::TrueColor { height, .. } => *height,
            QuantizedImage::Indexed { height, .. } => *height,
        }
    }
}
