//! Palettize
//!
//! CLI front end around the `chroma-quant` pipeline: PNG decode/encode
//! and error reporting. This library exposes modules for integration
//! testing.

pub mod codec;
pub mod error;
