//! Error types for tile geometry, binning, and LOD encoding.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, TileError>;

/// Errors produced by the tiling core.
///
/// The core never retries and never logs failures; every error is returned
/// to the caller to be mapped to user-visible behavior by the response
/// layer.
#[derive(Debug, Error)]
pub enum TileError {
    /// An input violated its contract (non-positive resolution, degenerate
    /// world extent, out-of-range tile address). Never silently corrected,
    /// since any correction would change which pixels a tile represents.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A raw aggregate or point row could not be interpreted as the
    /// expected shape. The whole batch fails; partial grids are discarded.
    #[error("failed to decode row: {0}")]
    RowDecode(String),

    /// Payload serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
