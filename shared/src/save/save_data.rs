use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::character_map::character_map_type::CharacterMapType;

pub const STARTING_CURRENCY: u32 = 100_000;

/// Maps every new save starts with, unlocked and equipped
pub const DEFAULT_CHARACTER_MAPS: [(&str, CharacterMapType); 8] = [
    ("CharacterMap_Cheek_V1", CharacterMapType::Cheeks),
    ("CharacterMap_Eye_V1", CharacterMapType::Eyes),
    ("CharacterMap_Hair_V1", CharacterMapType::Hair),
    ("CharacterMap_Leg_V1", CharacterMapType::Legs),
    ("CharacterMap_Mouth_V1", CharacterMapType::Mouth),
    ("CharacterMap_Shoes_V1", CharacterMapType::Feet),
    ("CharacterMap_Torso_V1", CharacterMapType::Torso),
    ("CharacterMap_Skin_V1", CharacterMapType::Skin),
];

/// Which map is unlocked or equipped for which category
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterMapRecord {
    pub name: String,
    #[serde(rename = "characterMapType")]
    pub map_type: CharacterMapType,
}

impl CharacterMapRecord {
    pub fn new(name: &str, map_type: CharacterMapType) -> Self {
        Self {
            name: name.to_string(),
            map_type,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSelection {
    #[serde(rename = "mapType")]
    pub map_type: CharacterMapType,
    #[serde(rename = "colorIndex")]
    pub color_index: u32,
}

impl ColorSelection {
    pub fn new(map_type: CharacterMapType, color_index: u32) -> Self {
        Self {
            map_type,
            color_index,
        }
    }
}

/// Everything persisted for one player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSaveData {
    pub currency: u32,
    pub unlocked_character_maps: Vec<CharacterMapRecord>,
    pub current_character_maps: Vec<CharacterMapRecord>,
    pub color_selections: Vec<ColorSelection>,
}

impl Default for GameSaveData {
    fn default() -> Self {
        let defaults: Vec<CharacterMapRecord> = DEFAULT_CHARACTER_MAPS
            .iter()
            .map(|(name, map_type)| CharacterMapRecord::new(name, *map_type))
            .collect();

        Self {
            currency: STARTING_CURRENCY,
            unlocked_character_maps: defaults.clone(),
            current_character_maps: defaults,
            color_selections: CharacterMapType::slots()
                .map(|map_type| ColorSelection::new(map_type, 0))
                .collect(),
        }
    }
}

impl GameSaveData {
    pub fn is_unlocked(&self, name: &str) -> bool {
        self.unlocked_character_maps
            .iter()
            .any(|record| record.name == name)
    }

    pub fn is_record_unlocked(&self, record: &CharacterMapRecord) -> bool {
        self.unlocked_character_maps.contains(record)
    }

    pub fn equipped(&self, map_type: CharacterMapType) -> Option<&CharacterMapRecord> {
        self.current_character_maps
            .iter()
            .find(|record| record.map_type == map_type)
    }

    pub fn color_index(&self, map_type: CharacterMapType) -> Option<u32> {
        self.color_selections
            .iter()
            .find(|selection| selection.map_type == map_type)
            .map(|selection| selection.color_index)
    }

    /// Overwrites the equipped record sharing `record`'s category
    pub(crate) fn replace_equipped(&mut self, record: CharacterMapRecord) {
        for current in self.current_character_maps.iter_mut() {
            if current.map_type == record.map_type {
                *current = record;
                return;
            }
        }
    }

    /// Checks the invariants every persisted save must hold
    pub fn validate(&self) -> Result<(), String> {
        let mut unlocked = HashSet::new();
        for record in &self.unlocked_character_maps {
            if record.map_type.is_none() {
                return Err(format!("unlocked map '{}' has no category", record.name));
            }
            if !unlocked.insert(record) {
                return Err(format!("map '{}' is unlocked twice", record.name));
            }
        }

        let mut equipped_types = HashSet::new();
        for record in &self.current_character_maps {
            if !equipped_types.insert(record.map_type) {
                return Err(format!("category '{}' is equipped twice", record.map_type));
            }
            if !unlocked.contains(record) {
                return Err(format!("equipped map '{}' is not unlocked", record.name));
            }
        }

        let mut color_types = HashSet::new();
        for selection in &self.color_selections {
            if selection.map_type.is_none() || !color_types.insert(selection.map_type) {
                return Err(format!("color selection for '{}' is invalid", selection.map_type));
            }
        }

        for map_type in CharacterMapType::slots() {
            if !equipped_types.contains(&map_type) {
                return Err(format!("category '{}' has nothing equipped", map_type));
            }
            if !color_types.contains(&map_type) {
                return Err(format!("category '{}' has no color", map_type));
            }
        }

        Ok(())
    }
}
