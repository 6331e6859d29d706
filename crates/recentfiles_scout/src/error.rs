//! Error types for the Scout system

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Scout error type
///
/// Cancellation is not an error: a stopped scan is reported through
/// [`crate::ScanObserver::on_aborted`].
#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read metadata for {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Pattern error: {0}")]
    Pattern(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Scan worker panicked")]
    WorkerPanicked,
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ScoutError>;
