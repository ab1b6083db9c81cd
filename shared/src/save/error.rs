use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing save files.
///
/// None of these are fatal: the store logs them and keeps its in-memory state.
#[derive(Debug, Error)]
pub enum SaveError {
    /// A filesystem operation failed
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not valid save JSON
    #[error("Save file {path} could not be parsed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but breaks a save invariant
    #[error("Save file {path} is inconsistent: {reason}")]
    Inconsistent { path: PathBuf, reason: String },

    /// The file does not exist
    #[error("Save file {path} does not exist")]
    Missing { path: PathBuf },

    /// In-memory data could not be serialized
    #[error("Save data could not be serialized: {0}")]
    Serialize(#[source] serde_json::Error),
}
