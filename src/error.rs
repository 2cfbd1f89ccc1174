//! Error types for report rendering.

use std::io;
use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a render. Malformed submission *data* never ends up here:
/// it normalizes to nothing and is skipped.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error reading fonts or inputs, or writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The submission record could not be deserialized.
    #[error("invalid submission JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured font file could not be loaded or embedded.
    #[error("font error: {0}")]
    Font(String),

    /// The render request is missing something the engine cannot work without.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
