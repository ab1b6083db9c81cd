use std::{fs, path::PathBuf};

use log::warn;

use crate::character_map::{character_map::CharacterMap, error::CatalogError};

/// Namespace the catalog reads its definitions from
pub const CHARACTER_MAP_NAMESPACE: &str = "CharacterMaps";

/// External collaborator that knows where CharacterMap definitions live
pub trait CatalogSource: Send + Sync {
    fn load_all_definitions(&self, namespace: &str) -> Result<Vec<CharacterMap>, CatalogError>;
}

/// Definitions held in memory, regardless of namespace
#[derive(Clone, Default)]
pub struct StaticCatalogSource {
    definitions: Vec<CharacterMap>,
}

impl StaticCatalogSource {
    pub fn new(definitions: Vec<CharacterMap>) -> Self {
        Self { definitions }
    }
}

impl CatalogSource for StaticCatalogSource {
    fn load_all_definitions(&self, _namespace: &str) -> Result<Vec<CharacterMap>, CatalogError> {
        Ok(self.definitions.clone())
    }
}

/// Reads every `<root>/<namespace>/*.json` file as one CharacterMap definition.
///
/// Files are visited in name order so duplicate names resolve the same way on
/// every machine. A malformed file is skipped with a warning.
pub struct DirectoryCatalogSource {
    root: PathBuf,
}

impl DirectoryCatalogSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_definition(path: &PathBuf) -> Result<CharacterMap, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::DefinitionUnreadable {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| CatalogError::MalformedDefinition {
            path: path.clone(),
            source,
        })
    }
}

impl CatalogSource for DirectoryCatalogSource {
    fn load_all_definitions(&self, namespace: &str) -> Result<Vec<CharacterMap>, CatalogError> {
        let directory = self.root.join(namespace);
        let entries = fs::read_dir(&directory).map_err(|source| CatalogError::NamespaceUnreadable {
            namespace: namespace.to_string(),
            path: directory.clone(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
            .collect();
        paths.sort();

        let mut definitions = Vec::with_capacity(paths.len());
        for path in &paths {
            match Self::read_definition(path) {
                Ok(definition) => definitions.push(definition),
                Err(error) => warn!("Skipping CharacterMap definition: {}", error),
            }
        }

        Ok(definitions)
    }
}
