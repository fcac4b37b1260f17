//! CIE XYZ colour type
//!
//! XYZ tristimulus values are the space the palette is learned in. The
//! type carries vector arithmetic so representatives can be averaged.

use std::ops::{Add, Div, Mul, Sub};

use super::linear_rgb::LinearRgb;

/// A colour as CIE XYZ tristimulus values.
///
/// Conversions to and from [`LinearRgb`] use the fixed sRGB-primaries
/// matrix and its inverse. Neither direction clamps: clustering and error
/// arithmetic operate on the raw values, and clamping happens only when a
/// value crosses back into storable linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    /// Create a new XYZ colour.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl Add for Xyz {
    type Output = Xyz;

    #[inline]
    fn add(self, other: Xyz) -> Xyz {
        Xyz::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Xyz {
    type Output = Xyz;

    #[inline]
    fn sub(self, other: Xyz) -> Xyz {
        Xyz::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Xyz {
    type Output = Xyz;

    #[inline]
    fn mul(self, factor: f64) -> Xyz {
        Xyz::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl Div<f64> for Xyz {
    type Output = Xyz;

    #[inline]
    fn div(self, divisor: f64) -> Xyz {
        self * (1.0 / divisor)
    }
}

impl From<LinearRgb> for Xyz {
    fn from(rgb: LinearRgb) -> Self {
        Xyz {
            x: 0.4124 * rgb.r + 0.3576 * rgb.g + 0.1805 * rgb.b,
            y: 0.2126 * rgb.r + 0.7152 * rgb.g + 0.0722 * rgb.b,
            z: 0.0193 * rgb.r + 0.1192 * rgb.g + 0.9505 * rgb.b,
        }
    }
}

impl From<Xyz> for LinearRgb {
    fn from(xyz: Xyz) -> Self {
        LinearRgb {
            r: 3.2406 * xyz.x - 1.5372 * xyz.y - 0.4986 * xyz.z,
            g: -0.9689 * xyz.x + 1.8758 * xyz.y + 0.0415 * xyz.z,
            b: 0.0557 * xyz.x - 0.2040 * xyz.y + 1.0569 * xyz.z,
        }
    }
}
