use std::{collections::HashMap, sync::OnceLock};

use log::{debug, error, info};

use crate::character_map::{
    catalog_source::{CatalogSource, CHARACTER_MAP_NAMESPACE},
    character_map::CharacterMap,
    character_map_type::CharacterMapType,
};

/// Registry of every CharacterMap definition, keyed by name.
///
/// Constructed empty, filled exactly once by [`CharacterMapCatalog::load_all`],
/// read-only afterwards. Share it between sessions through an `Arc`.
#[derive(Default)]
pub struct CharacterMapCatalog {
    maps: OnceLock<HashMap<String, CharacterMap>>,
}

impl CharacterMapCatalog {
    pub fn new() -> Self {
        Self {
            maps: OnceLock::new(),
        }
    }

    /// Build a catalog that is already loaded with `definitions`
    pub fn from_definitions(definitions: Vec<CharacterMap>) -> Self {
        let catalog = Self::new();
        let maps = Self::index(definitions);
        if !maps.is_empty() {
            let _ = catalog.maps.set(maps);
        }
        catalog
    }

    /// Pulls every definition from `source`, once per catalog.
    ///
    /// Returns the number of registered maps. Calls after a successful load
    /// do not touch the source. A failing or empty source leaves the catalog
    /// unloaded so a later call may try again.
    pub fn load_all(&self, source: &dyn CatalogSource) -> usize {
        if let Some(maps) = self.maps.get() {
            return maps.len();
        }

        let definitions = match source.load_all_definitions(CHARACTER_MAP_NAMESPACE) {
            Ok(definitions) => definitions,
            Err(err) => {
                error!("Failed to load character maps: {}", err);
                return 0;
            }
        };

        let maps = Self::index(definitions);
        if maps.is_empty() {
            return 0;
        }

        // a concurrent load may have won the race, both hold the same data
        let _ = self.maps.set(maps);
        let count = self.len();
        info!("Loaded {} character maps", count);
        count
    }

    fn index(definitions: Vec<CharacterMap>) -> HashMap<String, CharacterMap> {
        let mut maps = HashMap::with_capacity(definitions.len());
        for definition in definitions {
            if maps.contains_key(&definition.name) {
                debug!("Duplicate character map '{}' ignored", definition.name);
                continue;
            }
            maps.insert(definition.name.clone(), definition);
        }
        maps
    }

    pub fn is_loaded(&self) -> bool {
        self.maps.get().is_some()
    }

    pub fn len(&self) -> usize {
        self.maps.get().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lookup(&self, name: &str) -> Option<&CharacterMap> {
        self.maps.get()?.get(name)
    }

    /// Like [`lookup`](Self::lookup), but only matches within `map_type`
    pub fn lookup_typed(&self, name: &str, map_type: CharacterMapType) -> Option<&CharacterMap> {
        self.lookup(name).filter(|map| map.map_type == map_type)
    }

    /// All maps of one category, ordered by price then name
    pub fn maps_of_type(&self, map_type: CharacterMapType) -> Vec<&CharacterMap> {
        let Some(maps) = self.maps.get() else {
            return Vec::new();
        };
        let mut output: Vec<&CharacterMap> = maps
            .values()
            .filter(|map| !map.map_type.is_none() && map.map_type == map_type)
            .collect();
        output.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.name.cmp(&b.name)));
        output
    }
}
