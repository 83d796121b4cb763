//! Error taxonomy
//!
//! `RouterError` covers construction-time failures that must stop the server
//! from starting. `StaticError` is the recoverable channel of the static file
//! handler. Handler failures travel as `anyhow::Error` and are converted into
//! 500 responses by the dispatcher.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building a dispatch table or a router.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The dispatch table is structurally malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A route pattern failed to compile.
    #[error("invalid route pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A static root could not be resolved to an absolute path.
    #[error("cannot resolve static root '{}'", path.display())]
    StaticRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcomes of the static file handler other than success.
#[derive(Debug, Error)]
pub enum StaticError {
    /// The path escapes the root or does not name an existing file.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but cannot be opened for reading.
    #[error("forbidden: {}", .0.display())]
    Forbidden(PathBuf),

    /// Any other I/O failure; surfaces as a handler failure.
    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
