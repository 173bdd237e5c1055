//! Protocol-level errors.

use thiserror::Error;

/// Errors surfaced by the wire layer.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// An upload filename contained a character from the forbidden set.
    #[error("forbidden character {0:?} in upload filename")]
    ForbiddenFilenameChar(char),
}
