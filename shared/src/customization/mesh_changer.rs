use std::sync::Arc;

use log::{error, warn};

use crate::{
    character_map::{catalog::CharacterMapCatalog, character_map_type::CharacterMapType},
    customization::render_target::SharedRenderTarget,
    world::{
        error::PropertyError,
        replicated_property::{ListenerKey, ReplicatedProperty, SetOutcome},
    },
};

/// Longest map name that can be replicated, in bytes
pub const MAX_MAP_NAME_BYTES: usize = 64;

/// Replicates the name of the map shown in one slot and keeps the slot's
/// render target in step with it on every peer
pub struct MeshChanger {
    map_type: CharacterMapType,
    property: ReplicatedProperty<String>,
    catalog: Arc<CharacterMapCatalog>,
    target: SharedRenderTarget,
    listener: ListenerKey,
}

impl MeshChanger {
    pub fn new(
        map_type: CharacterMapType,
        catalog: Arc<CharacterMapCatalog>,
        target: SharedRenderTarget,
    ) -> Self {
        let property = ReplicatedProperty::new();
        if let Err(err) = property.set_validator(|map_name: &String| validate_map_name(map_name)) {
            warn!("Could not install map name check for {:?}: {}", map_type, err);
        }
        let listener = {
            let catalog = catalog.clone();
            let target = target.clone();
            property.on_change(move |_old: &String, new: &String| {
                apply_map(&catalog, &target, new);
            })
        };

        Self {
            map_type,
            property,
            catalog,
            target,
            listener,
        }
    }

    pub fn map_type(&self) -> CharacterMapType {
        self.map_type
    }

    pub fn property(&self) -> &ReplicatedProperty<String> {
        &self.property
    }

    pub fn current_map(&self) -> Option<String> {
        self.property
            .try_get()
            .ok()
            .filter(|map_name| !map_name.is_empty())
    }

    /// Shows the replicated map, unless the property still holds its zero
    /// value
    pub fn start(&self) {
        if let Some(map_name) = self.current_map() {
            apply_map(&self.catalog, &self.target, &map_name);
        }
    }

    /// Set directly on the authority, requested from the authority elsewhere
    pub fn change_mesh(&self, map_name: &str) -> Result<SetOutcome, PropertyError> {
        let result = self.property.set(map_name.to_string());
        if let Err(PropertyError::InvalidValue { reason }) = &result {
            error!("Map name '{}' refused: {}", map_name, reason);
        }
        result
    }
}

/// Applied to local writes and to requests from mirrors alike
fn validate_map_name(map_name: &str) -> Result<(), &'static str> {
    if map_name.is_empty() {
        return Err("map name is empty");
    }
    if map_name.len() > MAX_MAP_NAME_BYTES {
        return Err("map name is longer than 64 bytes");
    }
    Ok(())
}

impl Drop for MeshChanger {
    fn drop(&mut self) {
        self.property.remove_listener(self.listener);
    }
}

/// Swaps the target's visual for the map's, keeping whatever override color
/// the slot had
fn apply_map(catalog: &CharacterMapCatalog, target: &SharedRenderTarget, map_name: &str) -> bool {
    if map_name.is_empty() {
        return false;
    }

    let Some(character_map) = catalog
        .lookup(map_name)
        .filter(|character_map| character_map.visual.is_displayable())
    else {
        warn!("Map '{}' not found!", map_name);
        return false;
    };

    let Ok(mut target) = target.lock() else {
        warn!("Render target for map '{}' is poisoned", map_name);
        return false;
    };
    let last_color = target.override_color();
    target.set_visual(&character_map.visual);
    if let Some(color) = last_color {
        target.set_override_color(color);
    }
    true
}
