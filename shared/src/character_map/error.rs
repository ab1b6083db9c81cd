use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading CharacterMap definitions
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The namespace directory could not be listed
    #[error("Could not read catalog namespace '{namespace}' at {path}: {source}")]
    NamespaceUnreadable {
        namespace: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A definition file could not be read from disk
    #[error("Could not read CharacterMap definition at {path}: {source}")]
    DefinitionUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A definition file was read but is not a valid CharacterMap
    #[error("Malformed CharacterMap definition at {path}: {source}")]
    MalformedDefinition {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
