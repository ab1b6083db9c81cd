use std::sync::Arc;

use log::{error, warn};

use crate::{
    character_map::{catalog::CharacterMapCatalog, character_map_type::CharacterMapType},
    customization::{
        color::{ColorPalette, Rgba},
        slot::SlotBindings,
    },
    player::{Initializable, PlayerContext},
    save::save_data::GameSaveData,
};

/// Pushes catalog entries and colors into a player's slots. Lookup misses
/// are logged and leave the slot as it was.
pub struct CharacterMapResolver {
    catalog: Arc<CharacterMapCatalog>,
    slots: SlotBindings,
}

impl CharacterMapResolver {
    pub fn new(catalog: Arc<CharacterMapCatalog>, slots: SlotBindings) -> Self {
        Self { catalog, slots }
    }

    pub fn catalog(&self) -> &Arc<CharacterMapCatalog> {
        &self.catalog
    }

    pub fn slots(&self) -> &SlotBindings {
        &self.slots
    }

    /// Returns whether the slot's mesh property accepted the map
    pub fn apply_map(&self, map_type: CharacterMapType, map_name: &str) -> bool {
        let Some(slot) = self.slots.get(map_type) else {
            warn!("No slot configured for '{}'", map_type);
            return false;
        };
        if self.catalog.lookup_typed(map_name, map_type).is_none() {
            warn!("Map '{}' not found!", map_name);
            return false;
        }

        match slot.mesh().change_mesh(map_name) {
            Ok(_) => true,
            Err(err) => {
                warn!("Could not apply map '{}' to '{}': {}", map_name, map_type, err);
                false
            }
        }
    }

    pub fn apply_color(&self, map_type: CharacterMapType, color: Rgba) -> bool {
        let Some(slot) = self.slots.get(map_type) else {
            warn!("No slot configured for '{}'", map_type);
            return false;
        };

        match slot.color().change_color(color) {
            Ok(_) => true,
            Err(err) => {
                warn!("Could not apply color to '{}': {}", map_type, err);
                false
            }
        }
    }

    pub fn apply_color_index(
        &self,
        map_type: CharacterMapType,
        color_index: u32,
        palette: &ColorPalette,
    ) -> bool {
        let Some(color) = palette.get(color_index) else {
            warn!("Color index {} for '{}' is outside the palette", color_index, map_type);
            return false;
        };
        self.apply_color(map_type, color)
    }

    /// Replays every equipped map, then every color selection
    pub fn initialize_from_save(&self, data: &GameSaveData, palette: &ColorPalette) {
        for record in &data.current_character_maps {
            self.apply_map(record.map_type, &record.name);
        }
        for selection in &data.color_selections {
            self.apply_color_index(selection.map_type, selection.color_index, palette);
        }
    }
}

impl Initializable for CharacterMapResolver {
    /// Binds every slot to the player's session
    fn initialize_with_player(&mut self, player: &PlayerContext<'_>) {
        if let Err(err) = self.slots.bind_all(
            player.entity(),
            player.gate(),
            player.outbox(),
            player.registry(),
        ) {
            error!("Failed to bind slots of {}: {}", player.entity(), err);
        }
    }
}
