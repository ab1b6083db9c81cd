use std::{mem, vec::IntoIter};

use outfit_shared::EntityKey;

use crate::OutfitClientError;

/// Events produced while reading server packets
pub struct ClientEvents {
    spawns: Vec<(EntityKey, bool)>,
    despawns: Vec<EntityKey>,
    errors: Vec<OutfitClientError>,
    empty: bool,
}

impl ClientEvents {
    pub(crate) fn new() -> Self {
        Self {
            spawns: Vec::new(),
            despawns: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: ClientEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: ClientEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_spawn(&mut self, entity: EntityKey, owned: bool) {
        self.spawns.push((entity, owned));
        self.empty = false;
    }

    pub(crate) fn push_despawn(&mut self, entity: EntityKey) {
        self.despawns.push(entity);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: OutfitClientError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait ClientEvent {
    type Iter;

    fn iter(events: &mut ClientEvents) -> Self::Iter;

    fn has(events: &ClientEvents) -> bool;
}

/// A player entity appeared. The flag is true when this client owns it.
pub struct SpawnEntityEvent;
impl ClientEvent for SpawnEntityEvent {
    type Iter = IntoIter<(EntityKey, bool)>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.spawns);
        list.into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.spawns.is_empty()
    }
}

pub struct DespawnEntityEvent;
impl ClientEvent for DespawnEntityEvent {
    type Iter = IntoIter<EntityKey>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.despawns);
        list.into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.despawns.is_empty()
    }
}

pub struct ErrorEvent;
impl ClientEvent for ErrorEvent {
    type Iter = IntoIter<OutfitClientError>;

    fn iter(events: &mut ClientEvents) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        list.into_iter()
    }

    fn has(events: &ClientEvents) -> bool {
        !events.errors.is_empty()
    }
}
