use serde::{Deserialize, Serialize};

use crate::character_map::character_map_type::CharacterMapType;

pub const DEFAULT_PRICE: u32 = 100;

/// Opaque reference to the mesh / material pair a renderer should display.
///
/// The handles are resolved by the rendering collaborator, never by this crate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualRef {
    #[serde(default)]
    pub mesh: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub material_offset: [f32; 2],
}

impl VisualRef {
    pub fn new(mesh: &str, material: &str) -> Self {
        Self {
            mesh: Some(mesh.to_string()),
            material: Some(material.to_string()),
            material_offset: [0.0, 0.0],
        }
    }

    /// A visual without a mesh cannot be displayed, applying it would leave
    /// the slot invisible
    pub fn is_displayable(&self) -> bool {
        self.mesh.is_some()
    }
}

/// Static definition of a customization item
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterMap {
    pub name: String,
    #[serde(rename = "characterMapType")]
    pub map_type: CharacterMapType,
    /// Display id shown to players
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_price")]
    pub price: u32,
    #[serde(default)]
    pub visual: VisualRef,
}

fn default_price() -> u32 {
    DEFAULT_PRICE
}

impl CharacterMap {
    pub fn new(name: &str, map_type: CharacterMapType, price: u32, visual: VisualRef) -> Self {
        Self {
            name: name.to_string(),
            map_type,
            id: name.to_string(),
            price,
            visual,
        }
    }
}
