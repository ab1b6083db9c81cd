use std::{
    collections::{BTreeMap, HashMap},
    mem,
};

use log::{debug, info, warn};

use outfit_shared::{
    read_packet, write_packets, AuthorityGate, CatalogSource, EntityKey, HostType, Outbox,
    PacketSender, PlayerContext, PropertyRegistry, ReplicationMessage,
};

use crate::{
    events::MainEvents,
    server::server_config::ServerConfig,
    user::{User, UserKey},
    OutfitServerError,
};

/// The authoritative peer. Holds authority over every player entity,
/// applies the requests users send, and broadcasts the resulting values.
pub struct Server {
    config: ServerConfig,
    gate: AuthorityGate,
    outbox: Outbox,
    registry: PropertyRegistry,
    users: HashMap<UserKey, User>,
    // entity -> owning user, `None` for entities owned by the server itself
    entities: BTreeMap<EntityKey, Option<UserKey>>,
    next_user_key: u64,
    next_entity_key: u64,
    incoming_events: MainEvents,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            gate: AuthorityGate::new(HostType::Server),
            outbox: Outbox::new(),
            registry: PropertyRegistry::default(),
            users: HashMap::new(),
            entities: BTreeMap::new(),
            next_user_key: 0,
            next_entity_key: 0,
            incoming_events: MainEvents::new(),
        }
    }

    // Connections

    /// Accept a user whose transport is already established. With
    /// `snapshot_on_connect`, the user immediately receives every entity and
    /// every non-default property value.
    pub fn connect(&mut self, sender: Box<dyn PacketSender>) -> UserKey {
        let user_key = UserKey::new(self.next_user_key);
        self.next_user_key += 1;

        self.users.insert(user_key, User::new(sender));
        self.incoming_events.push_connection(&user_key);
        info!("{} connected", user_key);

        if self.config.snapshot_on_connect {
            self.send_snapshot(&user_key);
        }
        user_key
    }

    /// Drop a user. With `despawn_on_disconnect`, its entities go with it.
    pub fn disconnect(&mut self, user_key: &UserKey) -> Result<Vec<EntityKey>, OutfitServerError> {
        let Some(user) = self.users.remove(user_key) else {
            return Err(OutfitServerError::UserNotFound { user: *user_key });
        };
        info!("{} disconnected", user_key);

        let owned: Vec<EntityKey> = user.owned_entities().copied().collect();
        let mut despawned = Vec::new();
        for entity in owned {
            if self.config.despawn_on_disconnect {
                self.despawn_entity(&entity)?;
                despawned.push(entity);
            } else {
                // the entity stays as a player owned by this host
                self.gate.try_set_owner(&entity, true)?;
                self.entities.insert(entity, None);
            }
        }

        self.incoming_events
            .push_disconnection(user_key, despawned.clone());
        Ok(despawned)
    }

    pub fn user_keys(&self) -> Vec<UserKey> {
        let mut keys: Vec<UserKey> = self.users.keys().copied().collect();
        keys.sort();
        keys
    }

    pub fn users_count(&self) -> usize {
        self.users.len()
    }

    // Entities

    /// Spawn a player entity. `owner` is the user whose save drives it, or
    /// `None` for a player owned by this host.
    pub fn spawn_entity(&mut self, owner: Option<UserKey>) -> Result<EntityKey, OutfitServerError> {
        if let Some(user_key) = owner {
            if !self.users.contains_key(&user_key) {
                return Err(OutfitServerError::UserNotFound { user: user_key });
            }
        }

        let entity = EntityKey::new(self.next_entity_key);
        self.next_entity_key += 1;

        self.gate.try_register_entity(&entity)?;
        self.gate.try_set_owner(&entity, owner.is_none())?;
        self.entities.insert(entity, owner);
        if let Some(user_key) = owner {
            if let Some(user) = self.users.get_mut(&user_key) {
                user.add_entity(entity);
            }
        }

        let user_keys = self.user_keys();
        for user_key in user_keys {
            let message = ReplicationMessage::SpawnEntity {
                entity,
                owned: owner == Some(user_key),
            };
            self.send_to(&user_key, &[message]);
        }

        debug!("Spawned {} owned by {:?}", entity, owner);
        Ok(entity)
    }

    /// Despawn a player entity on every peer. Updates still queued for it
    /// are discarded.
    pub fn despawn_entity(&mut self, entity: &EntityKey) -> Result<(), OutfitServerError> {
        let Some(owner) = self.entities.remove(entity) else {
            return Err(OutfitServerError::EntityNotFound { entity: *entity });
        };
        if let Some(user) = owner.and_then(|user_key| self.users.get_mut(&user_key)) {
            user.remove_entity(entity);
        }

        self.outbox
            .discard_where(|message| message.entity() == *entity);
        self.registry.remove_entity(entity);
        self.gate.deregister_entity(entity);

        self.broadcast(&[ReplicationMessage::DespawnEntity { entity: *entity }]);
        debug!("Despawned {}", entity);
        Ok(())
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityKey> {
        self.entities.keys()
    }

    pub fn entity_owner(&self, entity: &EntityKey) -> Option<UserKey> {
        self.entities.get(entity).copied().flatten()
    }

    /// Session handles a player entity needs to initialize on this peer
    pub fn player_context<'a>(
        &'a self,
        entity: EntityKey,
        catalog_source: &'a dyn CatalogSource,
    ) -> PlayerContext<'a> {
        PlayerContext::new(
            entity,
            &self.gate,
            &self.outbox,
            &self.registry,
            catalog_source,
        )
    }

    pub fn gate(&self) -> &AuthorityGate {
        &self.gate
    }

    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    // Incoming

    /// Apply every request of a packet from `user_key`, in arrival order.
    /// Problems are reported as ErrorEvents.
    pub fn receive(&mut self, user_key: &UserKey, bytes: &[u8]) {
        if !self.users.contains_key(user_key) {
            warn!("Dropping packet from unknown {}", user_key);
            return;
        }

        let messages = match read_packet(bytes) {
            Ok(messages) => messages,
            Err(source) => {
                warn!("Malformed packet from {}: {}", user_key, source);
                self.incoming_events.push_error(OutfitServerError::Message {
                    user: *user_key,
                    source,
                });
                return;
            }
        };

        for message in messages {
            match message {
                ReplicationMessage::Request { key, payload } => {
                    match self.registry.apply_request(&key, &payload) {
                        Ok(outcome) => self.incoming_events.push_request(user_key, key, outcome),
                        Err(source) => {
                            self.incoming_events.push_error(OutfitServerError::Request {
                                user: *user_key,
                                source,
                            })
                        }
                    }
                }
                other => {
                    warn!("Unexpected {} message from {}", other.name(), user_key);
                    self.incoming_events
                        .push_error(OutfitServerError::UnexpectedMessage {
                            user: *user_key,
                            message: other.name(),
                        });
                }
            }
        }
    }

    pub fn take_events(&mut self) -> MainEvents {
        mem::replace(&mut self.incoming_events, MainEvents::new())
    }

    // Outgoing

    /// Broadcast every update produced since the last call
    pub fn send_all_updates(&mut self) {
        let messages: Vec<ReplicationMessage> = self
            .outbox
            .drain()
            .into_iter()
            .filter(|message| match message {
                ReplicationMessage::Update { .. } => true,
                other => {
                    warn!("Server outbox held a {} message, dropping it", other.name());
                    false
                }
            })
            .collect();

        if messages.is_empty() {
            return;
        }
        self.broadcast(&messages);
    }

    fn send_snapshot(&mut self, user_key: &UserKey) {
        let mut messages: Vec<ReplicationMessage> = self
            .entities
            .iter()
            .map(|(entity, owner)| ReplicationMessage::SpawnEntity {
                entity: *entity,
                owned: *owner == Some(*user_key),
            })
            .collect();
        messages.extend(
            self.registry
                .snapshot()
                .into_iter()
                .map(|(key, payload)| ReplicationMessage::Update { key, payload }),
        );

        if messages.is_empty() {
            return;
        }
        debug!("Sending snapshot of {} messages to {}", messages.len(), user_key);
        self.send_to(user_key, &messages);
    }

    fn broadcast(&mut self, messages: &[ReplicationMessage]) {
        for user_key in self.user_keys() {
            self.send_to(&user_key, messages);
        }
    }

    fn send_to(&mut self, user_key: &UserKey, messages: &[ReplicationMessage]) {
        let Some(user) = self.users.get(user_key) else {
            return;
        };

        for packet in write_packets(messages) {
            if let Err(source) = user.sender().send(&packet) {
                warn!("Sending to {} failed: {}", user_key, source);
                self.incoming_events.push_error(OutfitServerError::Transport {
                    user: *user_key,
                    source,
                });
                return;
            }
        }
    }
}
