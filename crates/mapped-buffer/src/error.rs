//! Error types for buffer operations

use thiserror::Error;

/// Errors that can occur while building or accessing a buffer.
///
/// Every error is reported synchronously to the immediate caller. Nothing is
/// clamped, wrapped, or retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The addressed range `[index, index + len)` does not fit in `[0, capacity)`.
    #[error("Range out of bounds: index={index}, length={len}, capacity={capacity}")]
    OutOfRange {
        /// First index of the requested range, relative to the relocation base.
        index: u64,
        /// Number of bytes requested.
        len: u64,
        /// Capacity of the buffer the request was made against.
        capacity: u64,
    },

    /// An argument was well-typed but not acceptable for the operation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing store could not be turned into a buffer.
    #[error("Backing unavailable: {0}")]
    BackingUnavailable(String),

    /// A write was attempted against read-only backing storage.
    #[error("Buffer is read-only")]
    ReadOnly,
}

/// Result type for buffer operations.
pub type Result<T> = std::result::Result<T, BufferError>;

/// Check that `[index, index + len)` lies within `[0, capacity)`.
///
/// The end of the range is computed with checked arithmetic, so indices close
/// to `u64::MAX` are rejected instead of wrapping around.
pub(crate) fn check_range(index: u64, len: usize, capacity: u64) -> Result<()> {
    let len = len as u64;
    match index.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(BufferError::OutOfRange {
            index,
            len,
            capacity,
        }),
    }
}
