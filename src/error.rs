//! Error types for card-io

use std::io;

/// Result type for card-io operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or rewriting a PNG container
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The first 8 bytes are not the PNG signature
    #[error("Invalid PNG signature at offset {offset}")]
    InvalidSignature { offset: u64 },

    /// A chunk header, body or CRC runs past the end of the buffer
    #[error("Truncated chunk at offset {offset}")]
    Truncated { offset: u64 },

    /// The buffer ended without an IEND chunk
    #[error("Missing IEND chunk (stream ended at offset {offset})")]
    MissingTerminalChunk { offset: u64 },

    /// Data size exceeds maximum allowed
    #[error("Data too large: {size} bytes (max: {max})")]
    DataTooLarge { size: usize, max: usize },

    /// Card payload could not be serialized or parsed as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Card payload text is not valid base64
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Offset in the input buffer where the error was detected, if any
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::InvalidSignature { offset }
            | Self::Truncated { offset }
            | Self::MissingTerminalChunk { offset } => Some(*offset),
            _ => None,
        }
    }
}
