use std::path::PathBuf;

use thiserror::Error;

/// Error raised by the PNG codec.
///
/// The variants separate the failure classes the pipeline cares about:
/// unreachable files, unsupported source encodings, and read/write
/// faults. All of them propagate unchanged to the top-level boundary;
/// none are retried.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("input file {path:?} could not be opened: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("output file {path:?} could not be created: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported colour encoding {color_type:?}; only RGB, greyscale and palette sources are accepted")]
    UnsupportedColorType { color_type: png::ColorType },

    #[error("unsupported bit depth {bit_depth:?}; only 8-bit-per-channel sources are accepted")]
    UnsupportedBitDepth { bit_depth: png::BitDepth },

    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_color_type_message() {
        let error = CodecError::UnsupportedColorType {
            color_type: png::ColorType::Rgba,
        };
        assert_eq!(
            error.to_string(),
            "unsupported colour encoding Rgba; only RGB, greyscale and palette sources are accepted"
        );
    }

    #[test]
    fn test_unsupported_bit_depth_message() {
        let error = CodecError::UnsupportedBitDepth {
            bit_depth: png::BitDepth::Sixteen,
        };
        assert!(error.to_string().contains("Sixteen"));
    }

    #[test]
    fn test_open_error_names_the_path() {
        let error = CodecError::Open {
            path: PathBuf::from("missing.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(error.to_string().contains("missing.png"));
        assert!(error.to_string().contains("could not be opened"));
    }
}
