//! Error type for clusterer queries.

use thiserror::Error;

/// Error returned by clusterer queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// A nearest-group query was made before any sample was absorbed.
    #[error("use of untrained clusterer: no samples have been absorbed")]
    Untrained,
}
