//! sRGB colour type
//!
//! sRGB is the standard colour space for display and storage of images.
//! It applies a gamma curve to linear light values for perceptual uniformity.

use super::linear_rgb::LinearRgb;

/// A colour in 8-bit gamma-encoded sRGB, the external pixel format.
///
/// This is what image files store and what the codec hands over. All
/// arithmetic (error diffusion, averaging) happens after decoding to
/// [`LinearRgb`]; this type exists only at the input/output boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Srgb {
    /// Red channel (gamma-encoded, 0..=255)
    pub r: u8,
    /// Green channel (gamma-encoded, 0..=255)
    pub g: u8,
    /// Blue channel (gamma-encoded, 0..=255)
    pub b: u8,
}

impl Srgb {
    /// Create a new sRGB colour from 8-bit channel values.
    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an sRGB colour from a byte array `[R, G, B]`.
    #[inline]
    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array `[R, G, B]`.
    #[inline]
    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Gamma-decode a single 8-bit sRGB channel to linear light (IEC 61966-2-1).
#[inline]
fn decode_channel(value: u8) -> f64 {
    let encoded = f64::from(value) / 255.0;
    if encoded <= 0.04045 {
        encoded / 12.92
    } else {
        ((encoded + 0.055) / 1.055).powf(2.4)
    }
}

/// Gamma-encode a linear channel back to 8 bits, clamping to [0, 1] first.
#[inline]
fn encode_channel(value: f64) -> u8 {
    let linear = value.clamp(0.0, 1.0);
    let encoded = if linear <= 0.003_130_8 {
        linear * 12.92
    } else {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0).round() as u8
}

impl From<Srgb> for LinearRgb {
    /// Gamma-decode to linear light. Required before any colour arithmetic:
    /// sRGB values do not combine additively.
    fn from(srgb: Srgb) -> Self {
        LinearRgb {
            r: decode_channel(srgb.r),
            g: decode_channel(srgb.g),
            b: decode_channel(srgb.b),
        }
    }
}

impl From<LinearRgb> for Srgb {
    /// Gamma-encode for storage. Channels are clamped to [0, 1] before
    /// rounding, so out-of-gamut intermediate values saturate instead of
    /// wrapping.
    fn from(linear: LinearRgb) -> Self {
        Srgb {
            r: encode_channel(linear.r),
            g: encode_channel(linear.g),
            b: encode_channel(linear.b),
        }
    }
}
