//! chroma-quant: online colour quantization with perceptual dithering
//!
//! This library reduces an opaque sRGB image to a bounded set of
//! representative colours and reproduces the image with error-diffusion
//! dithering. Three subsystems share one data representation
//! (linear-light triplets) and one distance function (CIEDE2000):
//!
//! - [`color`]: conversions between sRGB, linear RGB, CIE XYZ and CIE
//!   L\*a\*b\*, plus the CIEDE2000 perceptual distance
//! - [`cluster`]: an online, capacity-bounded vector quantizer that
//!   learns the palette one sampled pixel at a time
//! - [`dither`]: a pipelined serpentine error-diffusion engine that maps
//!   every pixel onto the learned palette
//!
//! [`pipeline`] ties them together: sample, train, pick the output
//! representation from the palette size, dither.
//!
//! # Colour spaces
//!
//! | Space | Property | Used for |
//! |-------|----------|----------|
//! | sRGB | standard 8-bit encoding | input/output pixels, palette entries |
//! | Linear RGB | light adds linearly | error diffusion arithmetic |
//! | XYZ | device-independent tristimulus | the space the palette lives in |
//! | Lab | opponent axes for CIEDE2000 | distance evaluation only |
//!
//! Quantization error is a light-intensity difference, so it is computed
//! and diffused in linear RGB; nearest-colour decisions are perceptual,
//! so they go through CIEDE2000 on Lab derived from XYZ.
//!
//! # Quick start
//!
//! ```
//! use chroma_quant::{quantize, QuantizedImage, QuantizerOptions, Srgb};
//!
//! let image = vec![Srgb::new(180, 90, 30); 4];
//! let options = QuantizerOptions::new().learning_portion(100).seed(1);
//! let result = quantize(&image, 2, 2, &options).unwrap();
//!
//! match result {
//!     QuantizedImage::Indexed { palette, .. } => assert_eq!(palette.len(), 1),
//!     QuantizedImage::TrueColor { .. } => unreachable!(),
//! }
//! ```

pub mod cluster;
pub mod color;
pub mod dither;
pub mod error;
pub mod output;
pub mod pipeline;

#[cfg(test)]
mod domain_tests;

pub use cluster::{ClusterError, Metric, OnlineClusterer};
pub use color::{ciede2000, Lab, LinearRgb, Srgb, Xyz, CIEDE2000_SRGB_CEILING};
pub use dither::{dither_to_indexed, dither_to_rgb};
pub use error::QuantizeError;
pub use output::QuantizedImage;
pub use pipeline::{quantize, PerceptualMetric, Quantizer, QuantizerOptions};
