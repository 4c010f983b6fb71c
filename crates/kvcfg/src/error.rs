//! Error types for kvcfg

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for kvcfg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for engine operations
#[derive(Error, Debug)]
pub enum Error {
    /// Operation attempted on an engine that is not initialized
    #[error("engine is not initialized")]
    Init,

    /// Invalid argument
    #[error("invalid argument: {0}")]
    Critical(&'static str),

    /// Memory exhaustion while sizing entries, buffers or cache slots
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// Source file could not be opened
    #[error("cannot open {}: {source}", path.display())]
    FileOpen {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Source file could not be read in full
    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error (`UnexpectedEof` for a short read)
        source: io::Error,
    },

    /// Update target key does not exist
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// An entry lost its key before teardown
    #[error("entry {ordinal} has no key")]
    NullKey {
        /// Ordinal of the corrupt entry
        ordinal: usize,
    },
}
