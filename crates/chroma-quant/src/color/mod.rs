//! Colour representations and the perceptual distance metric.
//!
//! Four tagged value types with pure conversions between them:
//!
//! - [`Srgb`]: 8-bit gamma-encoded sRGB, the external pixel format
//! - [`LinearRgb`]: gamma-decoded light-linear channels, the space error
//!   diffusion accumulates in
//! - [`Xyz`]: CIE tristimulus values, the space the palette is learned in
//! - [`Lab`]: CIE L*a*b*, derived on demand as input to [`ciede2000`]
//!
//! Conversions are `From` impls along the chain
//! `Srgb ⇄ LinearRgb ⇄ Xyz ⇄ Lab`; none of them mutates its input.

mod ciede2000;
mod lab;
mod linear_rgb;
mod srgb;
mod xyz;

pub use ciede2000::{ciede2000, CIEDE2000_SRGB_CEILING};
pub use lab::Lab;
pub use linear_rgb::LinearRgb;
pub use srgb::Srgb;
pub use xyz::Xyz;
