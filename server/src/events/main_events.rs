use std::{mem, vec::IntoIter};

use outfit_shared::{EntityKey, PropertyKey, SetOutcome};

use crate::{user::UserKey, OutfitServerError};

pub struct MainEvents {
    connections: Vec<UserKey>,
    disconnections: Vec<(UserKey, Vec<EntityKey>)>,
    requests: Vec<(UserKey, PropertyKey, SetOutcome)>,
    errors: Vec<OutfitServerError>,

    empty: bool,
}

impl MainEvents {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            requests: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: MainEvent>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: MainEvent>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, user_key: &UserKey) {
        self.connections.push(*user_key);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, user_key: &UserKey, despawned: Vec<EntityKey>) {
        self.disconnections.push((*user_key, despawned));
        self.empty = false;
    }

    pub(crate) fn push_request(&mut self, user_key: &UserKey, key: PropertyKey, outcome: SetOutcome) {
        self.requests.push((*user_key, key, outcome));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: OutfitServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait MainEvent {
    type Iter;

    fn iter(events: &mut MainEvents) -> Self::Iter;

    fn has(events: &MainEvents) -> bool;
}

// ConnectEvent
pub struct ConnectEvent;
impl MainEvent for ConnectEvent {
    type Iter = IntoIter<UserKey>;

    fn iter(events: &mut MainEvents) -> Self::Iter {
        let list = mem::take(&mut events.connections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MainEvents) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
/// The user, and the entities despawned because it owned them
pub struct DisconnectEvent;
impl MainEvent for DisconnectEvent {
    type Iter = IntoIter<(UserKey, Vec<EntityKey>)>;

    fn iter(events: &mut MainEvents) -> Self::Iter {
        let list = mem::take(&mut events.disconnections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MainEvents) -> bool {
        !events.disconnections.is_empty()
    }
}

// RequestEvent
/// A property request a user sent, and what applying it did
pub struct RequestEvent;
impl MainEvent for RequestEvent {
    type Iter = IntoIter<(UserKey, PropertyKey, SetOutcome)>;

    fn iter(events: &mut MainEvents) -> Self::Iter {
        let list = mem::take(&mut events.requests);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MainEvents) -> bool {
        !events.requests.is_empty()
    }
}

// ErrorEvent
pub struct ErrorEvent;
impl MainEvent for ErrorEvent {
    type Iter = IntoIter<OutfitServerError>;

    fn iter(events: &mut MainEvents) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &MainEvents) -> bool {
        !events.errors.is_empty()
    }
}
