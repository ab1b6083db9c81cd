use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

impl HostType {
    pub fn invert(self) -> Self {
        match self {
            HostType::Server => HostType::Client,
            HostType::Client => HostType::Server,
        }
    }
}

/// Identifies a networked player entity across every peer of a session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey(u64);

impl EntityKey {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl Serde for EntityKey {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(u64::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}
