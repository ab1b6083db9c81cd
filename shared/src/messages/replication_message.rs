use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    messages::packet::{read_bytes, MAX_PAYLOAD_BYTES},
    types::EntityKey,
    world::property_key::PropertyKey,
};

/// Everything peers exchange about player entities and their properties
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplicationMessage {
    /// A player entity entered the session; `owned` is set only on the copy
    /// sent to the peer that owns the entity's save
    SpawnEntity { entity: EntityKey, owned: bool },
    DespawnEntity { entity: EntityKey },
    /// Mirror -> authority: please set this property
    Request { key: PropertyKey, payload: Vec<u8> },
    /// Authority -> mirrors: this property now holds this value
    Update { key: PropertyKey, payload: Vec<u8> },
}

impl ReplicationMessage {
    const SPAWN_TAG: u8 = 0;
    const DESPAWN_TAG: u8 = 1;
    const REQUEST_TAG: u8 = 2;
    const UPDATE_TAG: u8 = 3;

    fn tag(&self) -> u8 {
        match self {
            ReplicationMessage::SpawnEntity { .. } => Self::SPAWN_TAG,
            ReplicationMessage::DespawnEntity { .. } => Self::DESPAWN_TAG,
            ReplicationMessage::Request { .. } => Self::REQUEST_TAG,
            ReplicationMessage::Update { .. } => Self::UPDATE_TAG,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReplicationMessage::SpawnEntity { .. } => "SpawnEntity",
            ReplicationMessage::DespawnEntity { .. } => "DespawnEntity",
            ReplicationMessage::Request { .. } => "Request",
            ReplicationMessage::Update { .. } => "Update",
        }
    }

    pub fn entity(&self) -> EntityKey {
        match self {
            ReplicationMessage::SpawnEntity { entity, .. }
            | ReplicationMessage::DespawnEntity { entity } => *entity,
            ReplicationMessage::Request { key, .. } | ReplicationMessage::Update { key, .. } => {
                key.entity
            }
        }
    }
}

impl Serde for ReplicationMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.tag().ser(writer);
        match self {
            ReplicationMessage::SpawnEntity { entity, owned } => {
                entity.ser(writer);
                owned.ser(writer);
            }
            ReplicationMessage::DespawnEntity { entity } => {
                entity.ser(writer);
            }
            ReplicationMessage::Request { key, payload }
            | ReplicationMessage::Update { key, payload } => {
                key.ser(writer);
                payload.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            Self::SPAWN_TAG => {
                let entity = EntityKey::de(reader)?;
                let owned = bool::de(reader)?;
                Ok(ReplicationMessage::SpawnEntity { entity, owned })
            }
            Self::DESPAWN_TAG => {
                let entity = EntityKey::de(reader)?;
                Ok(ReplicationMessage::DespawnEntity { entity })
            }
            Self::REQUEST_TAG => {
                let key = PropertyKey::de(reader)?;
                let payload = read_bytes(reader, MAX_PAYLOAD_BYTES)?;
                Ok(ReplicationMessage::Request { key, payload })
            }
            Self::UPDATE_TAG => {
                let key = PropertyKey::de(reader)?;
                let payload = read_bytes(reader, MAX_PAYLOAD_BYTES)?;
                Ok(ReplicationMessage::Update { key, payload })
            }
            _ => Err(SerdeErr),
        }
    }

    fn bit_length(&self) -> u32 {
        let body = match self {
            ReplicationMessage::SpawnEntity { entity, owned } => {
                entity.bit_length() + owned.bit_length()
            }
            ReplicationMessage::DespawnEntity { entity } => entity.bit_length(),
            ReplicationMessage::Request { key, payload }
            | ReplicationMessage::Update { key, payload } => {
                key.bit_length() + payload.bit_length()
            }
        };
        self.tag().bit_length() + body
    }
}
