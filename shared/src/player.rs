use std::sync::Arc;

use crate::{
    character_map::{catalog::CharacterMapCatalog, catalog_source::CatalogSource},
    customization::{
        color::ColorPalette, inventory::Inventory, resolver::CharacterMapResolver,
        slot::SlotBindings,
    },
    messages::outbox::Outbox,
    save::{save_config::SaveConfig, save_store::SaveStore},
    types::EntityKey,
    world::{authority_gate::AuthorityGate, property_registry::PropertyRegistry},
};

/// Components that finish their setup once the player entity they belong to
/// has entered a session
pub trait Initializable {
    fn initialize_with_player(&mut self, player: &PlayerContext<'_>);
}

/// What a player entity can reach of its peer's session while initializing
pub struct PlayerContext<'a> {
    entity: EntityKey,
    gate: &'a AuthorityGate,
    outbox: &'a Outbox,
    registry: &'a PropertyRegistry,
    catalog_source: &'a dyn CatalogSource,
}

impl<'a> PlayerContext<'a> {
    pub fn new(
        entity: EntityKey,
        gate: &'a AuthorityGate,
        outbox: &'a Outbox,
        registry: &'a PropertyRegistry,
        catalog_source: &'a dyn CatalogSource,
    ) -> Self {
        Self {
            entity,
            gate,
            outbox,
            registry,
            catalog_source,
        }
    }

    pub fn entity(&self) -> EntityKey {
        self.entity
    }

    pub fn gate(&self) -> &'a AuthorityGate {
        self.gate
    }

    pub fn outbox(&self) -> &'a Outbox {
        self.outbox
    }

    pub fn registry(&self) -> &'a PropertyRegistry {
        self.registry
    }

    pub fn catalog_source(&self) -> &'a dyn CatalogSource {
        self.catalog_source
    }

    /// Whether this peer owns the player's save
    pub fn is_owner(&self) -> bool {
        self.gate.is_owner(&self.entity)
    }
}

/// Everything a player entity is assembled from
pub struct PlayerSetup {
    pub catalog: Arc<CharacterMapCatalog>,
    pub slots: SlotBindings,
    pub save_config: SaveConfig,
    pub palette: ColorPalette,
}

pub enum PlayerRole {
    /// This peer owns the save: full buy / equip / color state machine
    Owner(Inventory),
    /// Someone else's player, shown through its replicated slots
    Remote(CharacterMapResolver),
}

/// A player entity as seen by one peer
pub struct Player {
    entity: EntityKey,
    role: PlayerRole,
}

impl Player {
    /// Assemble and initialize a player for an entity already registered with
    /// the context's gate. Only the owner loads the catalog and the save.
    pub fn spawn(context: &PlayerContext<'_>, setup: PlayerSetup) -> Self {
        let PlayerSetup {
            catalog,
            slots,
            save_config,
            palette,
        } = setup;
        let mut resolver = CharacterMapResolver::new(catalog.clone(), slots);

        let role = if context.is_owner() {
            let store = SaveStore::new(save_config, catalog);
            let mut inventory = Inventory::new(store, resolver, palette);
            inventory.initialize_with_player(context);
            PlayerRole::Owner(inventory)
        } else {
            resolver.initialize_with_player(context);
            PlayerRole::Remote(resolver)
        };

        Self {
            entity: context.entity(),
            role,
        }
    }

    pub fn entity(&self) -> EntityKey {
        self.entity
    }

    pub fn is_owner(&self) -> bool {
        matches!(self.role, PlayerRole::Owner(_))
    }

    pub fn role(&self) -> &PlayerRole {
        &self.role
    }

    pub fn resolver(&self) -> &CharacterMapResolver {
        match &self.role {
            PlayerRole::Owner(inventory) => inventory.resolver(),
            PlayerRole::Remote(resolver) => resolver,
        }
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        match &self.role {
            PlayerRole::Owner(inventory) => Some(inventory),
            PlayerRole::Remote(_) => None,
        }
    }

    pub fn inventory_mut(&mut self) -> Option<&mut Inventory> {
        match &mut self.role {
            PlayerRole::Owner(inventory) => Some(inventory),
            PlayerRole::Remote(_) => None,
        }
    }

    /// Unbind the player's properties from the session
    pub fn despawn(self, registry: &PropertyRegistry) {
        registry.remove_entity(&self.entity);
    }
}
