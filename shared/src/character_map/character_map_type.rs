use std::fmt;

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};
use serde::{Deserialize, Serialize};

/// Body-part slot a CharacterMap can be equipped into.
///
/// Declaration order matters: default saves are seeded and iterated in this
/// order. `None` is the empty sentinel and never owns a slot or a color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterMapType {
    None,
    Hair,
    Eyes,
    Cheeks,
    Mouth,
    Torso,
    Legs,
    Feet,
    Skin,
}

impl CharacterMapType {
    pub const ALL: [CharacterMapType; 9] = [
        CharacterMapType::None,
        CharacterMapType::Hair,
        CharacterMapType::Eyes,
        CharacterMapType::Cheeks,
        CharacterMapType::Mouth,
        CharacterMapType::Torso,
        CharacterMapType::Legs,
        CharacterMapType::Feet,
        CharacterMapType::Skin,
    ];

    /// Every category except the `None` sentinel, in declaration order
    pub fn slots() -> impl Iterator<Item = CharacterMapType> {
        Self::ALL.into_iter().filter(|map_type| !map_type.is_none())
    }

    pub fn is_none(&self) -> bool {
        *self == CharacterMapType::None
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterMapType::None => "none",
            CharacterMapType::Hair => "hair",
            CharacterMapType::Eyes => "eyes",
            CharacterMapType::Cheeks => "cheeks",
            CharacterMapType::Mouth => "mouth",
            CharacterMapType::Torso => "torso",
            CharacterMapType::Legs => "legs",
            CharacterMapType::Feet => "feet",
            CharacterMapType::Skin => "skin",
        }
    }

    fn to_index(self) -> u8 {
        self as u8
    }

    fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for CharacterMapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serde for CharacterMapType {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.to_index().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let index = u8::de(reader)?;
        Self::from_index(index).ok_or(SerdeErr)
    }

    fn bit_length(&self) -> u32 {
        self.to_index().bit_length()
    }
}
