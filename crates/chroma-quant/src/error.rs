//! Unified error type for the quantization pipeline.

use thiserror::Error;

use crate::cluster::ClusterError;

/// Error raised by the dithering engine or the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantizeError {
    /// A clusterer query failed (no samples absorbed before rendering).
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    /// The pixel buffer length disagrees with the claimed dimensions.
    /// An internal consistency check; not reachable through the CLI.
    #[error("pixel buffer holds {len} pixels but the image claims {width}x{height}")]
    DimensionMismatch {
        /// Actual buffer length in pixels.
        len: usize,
        /// Claimed width.
        width: usize,
        /// Claimed height.
        height: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = QuantizeError::DimensionMismatch {
            len: 5,
            width: 2,
            height: 2,
        };
        assert_eq!(
            err.to_string(),
            "pixel buffer holds 5 pixels but the image claims 2x2"
        );

        let err = QuantizeError::from(ClusterError::Untrained);
        assert_eq!(
            err.to_string(),
            "use of untrained clusterer: no samples have been absorbed"
        );
    }
}
