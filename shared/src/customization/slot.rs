use std::{collections::BTreeMap, sync::Arc};

use log::warn;

use crate::{
    character_map::{catalog::CharacterMapCatalog, character_map_type::CharacterMapType},
    customization::{
        color_changer::ColorChanger, mesh_changer::MeshChanger, render_target::SharedRenderTarget,
    },
    messages::outbox::Outbox,
    types::EntityKey,
    world::{
        authority_gate::AuthorityGate, error::RegistryError, property_key::PropertyKey,
        property_registry::PropertyRegistry, replicated_property::PropertyHandle,
    },
};

/// One body-part slot of a player entity: its mesh and color properties and
/// the render target both drive
pub struct CharacterMapSlot {
    map_type: CharacterMapType,
    mesh: MeshChanger,
    color: ColorChanger,
}

impl CharacterMapSlot {
    pub fn new(
        map_type: CharacterMapType,
        catalog: Arc<CharacterMapCatalog>,
        target: SharedRenderTarget,
    ) -> Self {
        Self {
            map_type,
            mesh: MeshChanger::new(map_type, catalog, target.clone()),
            color: ColorChanger::new(target),
        }
    }

    pub fn map_type(&self) -> CharacterMapType {
        self.map_type
    }

    pub fn mesh(&self) -> &MeshChanger {
        &self.mesh
    }

    pub fn color(&self) -> &ColorChanger {
        &self.color
    }

    /// Attach both properties to the entity's session and show whatever they
    /// already hold
    pub fn bind(
        &self,
        entity: EntityKey,
        gate: &AuthorityGate,
        outbox: &Outbox,
        registry: &PropertyRegistry,
    ) -> Result<(), RegistryError> {
        let accessor = gate.try_accessor(&entity)?;
        let mesh_key = PropertyKey::mesh(entity, self.map_type);
        let color_key = PropertyKey::color(entity, self.map_type);

        self.mesh.property().bind(mesh_key, accessor.clone(), outbox)?;
        if let Err(err) = self.color.property().bind(color_key, accessor, outbox) {
            self.mesh.property().unbind();
            return Err(err.into());
        }

        self.mesh.start();
        self.color.start();

        let handles: [(PropertyKey, Arc<dyn PropertyHandle>); 2] = [
            (mesh_key, Arc::new(self.mesh.property().clone())),
            (color_key, Arc::new(self.color.property().clone())),
        ];
        let mut registered = Vec::with_capacity(handles.len());
        for (key, handle) in handles {
            // may apply updates that arrived before the slot was bound
            match registry.insert(key, handle) {
                Ok(_) => registered.push(key),
                Err(err) => {
                    // anything but a taken key failed after inserting
                    if !matches!(err, RegistryError::AlreadyRegistered { .. }) {
                        registered.push(key);
                    }
                    warn!("Could not bind '{}' slot of {}: {}", self.map_type, entity, err);
                    self.unwind(registry, &registered);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Leave the slot unbound and the registry as it was before `bind`
    fn unwind(&self, registry: &PropertyRegistry, registered: &[PropertyKey]) {
        for key in registered {
            registry.remove(key);
        }
        self.mesh.property().unbind();
        self.color.property().unbind();
    }
}

/// Every slot configured on a player entity, at most one per category
#[derive(Default)]
pub struct SlotBindings {
    slots: BTreeMap<CharacterMapType, CharacterMapSlot>,
}

impl SlotBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// One slot per category, each driving the target given for it
    pub fn from_targets(
        catalog: &Arc<CharacterMapCatalog>,
        targets: impl IntoIterator<Item = (CharacterMapType, SharedRenderTarget)>,
    ) -> Self {
        let mut bindings = Self::new();
        for (map_type, target) in targets {
            bindings.insert(CharacterMapSlot::new(map_type, catalog.clone(), target));
        }
        bindings
    }

    /// Returns false when the slot was refused: `None` owns no slot, and a
    /// category is configured once
    pub fn insert(&mut self, slot: CharacterMapSlot) -> bool {
        let map_type = slot.map_type();
        if map_type.is_none() {
            warn!("Slot for category 'none' ignored");
            return false;
        }
        if self.slots.contains_key(&map_type) {
            warn!("Slot for '{}' is already configured", map_type);
            return false;
        }
        self.slots.insert(map_type, slot);
        true
    }

    pub fn get(&self, map_type: CharacterMapType) -> Option<&CharacterMapSlot> {
        self.slots.get(&map_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterMapSlot> {
        self.slots.values()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn bind_all(
        &self,
        entity: EntityKey,
        gate: &AuthorityGate,
        outbox: &Outbox,
        registry: &PropertyRegistry,
    ) -> Result<(), RegistryError> {
        for slot in self.slots.values() {
            slot.bind(entity, gate, outbox, registry)?;
        }
        Ok(())
    }
}
