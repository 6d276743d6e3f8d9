//! Error types for the manta note-conversion library.

use thiserror::Error;

/// Primary error type for note parsing and conversion.
///
/// Only structural failures live here: inputs that cannot be interpreted
/// as a note container at all, or addresses that point outside the
/// buffer. Everything recoverable (stale metadata pointers, unknown layer
/// protocols, bad embedded images) is logged and absorbed locally instead
/// of surfacing as an error.
#[derive(Error, Debug)]
pub enum NoteError {
    #[error("file too small to be a note document: {len} bytes")]
    TooSmall { len: usize },

    #[error("invalid note format: {0}")]
    InvalidFormat(String),

    #[error("read of {size} bytes at offset {offset} outside buffer of {len} bytes")]
    OutOfBounds {
        offset: usize,
        size: usize,
        len: usize,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for note operations.
pub type Result<T> = std::result::Result<T, NoteError>;
