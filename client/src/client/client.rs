use std::mem;

use log::{debug, info, warn};

use outfit_shared::{
    read_packet, write_packets, AuthorityGate, CatalogSource, EntityKey, HostType, Outbox,
    PacketSender, PlayerContext, PropertyRegistry, ReplicationMessage,
};

use crate::{client::client_config::ClientConfig, events::ClientEvents, OutfitClientError};

/// A mirror of the server's player entities. Local writes to mirrored
/// properties become requests that `send_all_updates` forwards.
pub struct Client {
    config: ClientConfig,
    gate: AuthorityGate,
    outbox: Outbox,
    registry: PropertyRegistry,
    sender: Option<Box<dyn PacketSender>>,
    incoming_events: ClientEvents,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        let registry = PropertyRegistry::new(config.max_waiting_updates);
        Self {
            config,
            gate: AuthorityGate::new(HostType::Client),
            outbox: Outbox::new(),
            registry,
            sender: None,
            incoming_events: ClientEvents::new(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // Connection

    pub fn connect(&mut self, sender: Box<dyn PacketSender>) {
        if self.sender.is_some() {
            warn!("Client is already connected, replacing its transport");
        }
        self.sender = Some(sender);
        info!("Client connected");
    }

    pub fn is_connected(&self) -> bool {
        self.sender.is_some()
    }

    /// Forget every mirrored entity. Requests not yet sent are dropped.
    pub fn disconnect(&mut self) {
        if self.sender.take().is_none() {
            return;
        }
        let dropped = self.outbox.drain().len();
        if dropped > 0 {
            debug!("Dropped {} unsent requests on disconnect", dropped);
        }
        self.registry.clear();
        self.gate.deregister_all();
        info!("Client disconnected");
    }

    // Entities

    pub fn entities(&self) -> impl Iterator<Item = &EntityKey> {
        self.gate.entities()
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

    /// Apply every message of a server packet in arrival order. Problems are
    /// reported as ErrorEvents.
    pub fn receive(&mut self, bytes: &[u8]) {
        let messages = match read_packet(bytes) {
            Ok(messages) => messages,
            Err(error) => {
                warn!("Malformed packet from server: {}", error);
                self.incoming_events.push_error(error.into());
                return;
            }
        };

        for message in messages {
            if let Err(error) = self.receive_message(message) {
                self.incoming_events.push_error(error);
            }
        }
    }

    fn receive_message(&mut self, message: ReplicationMessage) -> Result<(), OutfitClientError> {
        match message {
            ReplicationMessage::SpawnEntity { entity, owned } => {
                self.gate.try_register_entity(&entity)?;
                self.gate.try_set_owner(&entity, owned)?;
                debug!("Spawned {} (owned: {})", entity, owned);
                self.incoming_events.push_spawn(entity, owned);
            }
            ReplicationMessage::DespawnEntity { entity } => {
                self.registry.remove_entity(&entity);
                self.outbox
                    .discard_where(|message| message.entity() == entity);
                self.gate.deregister_entity(&entity);
                debug!("Despawned {}", entity);
                self.incoming_events.push_despawn(entity);
            }
            ReplicationMessage::Update { key, payload } => {
                if self.registry.apply_update(&key, &payload)?.is_none() {
                    debug!("Update for {} is waiting for its property", key);
                }
            }
            other @ ReplicationMessage::Request { .. } => {
                warn!("Unexpected {} message from server", other.name());
                return Err(OutfitClientError::UnexpectedMessage {
                    message: other.name(),
                });
            }
        }
        Ok(())
    }

    pub fn take_events(&mut self) -> ClientEvents {
        mem::replace(&mut self.incoming_events, ClientEvents::new())
    }

    // Outgoing

    /// Send every request produced since the last call
    pub fn send_all_updates(&mut self) -> Result<(), OutfitClientError> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(OutfitClientError::NotConnected);
        };

        let requests: Vec<ReplicationMessage> = self
            .outbox
            .drain()
            .into_iter()
            .filter(|message| match message {
                ReplicationMessage::Request { .. } => true,
                other => {
                    warn!("Client outbox held a {} message, dropping it", other.name());
                    false
                }
            })
            .collect();

        for packet in write_packets(&requests) {
            sender.send(&packet)?;
        }
        Ok(())
    }
}
