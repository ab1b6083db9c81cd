use std::collections::BTreeSet;

use outfit_shared::{EntityKey, PacketSender};

// UserKey
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct UserKey(u64);

impl UserKey {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for UserKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

// User
pub(crate) struct User {
    sender: Box<dyn PacketSender>,
    owned_entities: BTreeSet<EntityKey>,
}

impl User {
    pub(crate) fn new(sender: Box<dyn PacketSender>) -> Self {
        Self {
            sender,
            owned_entities: BTreeSet::new(),
        }
    }

    pub(crate) fn sender(&self) -> &dyn PacketSender {
        self.sender.as_ref()
    }

    pub(crate) fn add_entity(&mut self, entity: EntityKey) {
        self.owned_entities.insert(entity);
    }

    pub(crate) fn remove_entity(&mut self, entity: &EntityKey) {
        self.owned_entities.remove(entity);
    }

    pub(crate) fn owned_entities(&self) -> impl Iterator<Item = &EntityKey> {
        self.owned_entities.iter()
    }
}
