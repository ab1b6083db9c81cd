use std::fmt;

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{character_map::character_map_type::CharacterMapType, types::EntityKey};

/// Which of a slot's two replicated values a key addresses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyKind {
    Mesh,
    Color,
}

impl Serde for PropertyKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        writer.write_bit(*self == PropertyKind::Color);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(PropertyKind::Color)
        } else {
            Ok(PropertyKind::Mesh)
        }
    }

    fn bit_length(&self) -> u32 {
        1
    }
}

/// Addresses one replicated value: a player entity, one of its slots and
/// either the slot's mesh or its color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyKey {
    pub entity: EntityKey,
    pub slot: CharacterMapType,
    pub kind: PropertyKind,
}

impl PropertyKey {
    pub fn new(entity: EntityKey, slot: CharacterMapType, kind: PropertyKind) -> Self {
        Self { entity, slot, kind }
    }

    pub fn mesh(entity: EntityKey, slot: CharacterMapType) -> Self {
        Self::new(entity, slot, PropertyKind::Mesh)
    }

    pub fn color(entity: EntityKey, slot: CharacterMapType) -> Self {
        Self::new(entity, slot, PropertyKind::Color)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PropertyKind::Mesh => "mesh",
            PropertyKind::Color => "color",
        };
        write!(f, "{}/{}/{}", self.entity, self.slot, kind)
    }
}

impl Serde for PropertyKey {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.entity.ser(writer);
        self.slot.ser(writer);
        self.kind.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let entity = EntityKey::de(reader)?;
        let slot = CharacterMapType::de(reader)?;
        let kind = PropertyKind::de(reader)?;
        Ok(Self { entity, slot, kind })
    }

    fn bit_length(&self) -> u32 {
        self.entity.bit_length() + self.slot.bit_length() + self.kind.bit_length()
    }
}
