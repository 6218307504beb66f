//! State store errors.

use thiserror::Error;

/// State persistence errors. The most serious runtime failure in the
/// system: losing state breaks the anti-duplicate-alert guarantees.
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// Underlying storage unreachable.
    #[error("state store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record could not be encoded or decoded.
    #[error("state record corrupt: {0}")]
    Serialization(String),
}
