use crate::character_map::character_map_type::CharacterMapType;

/// Why a buy / equip / color request was turned down.
///
/// These are ordinary outcomes the caller turns into feedback, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// No catalog entry matches the name within the category
    NotInCatalog,
    /// The price is higher than the current currency
    InsufficientFunds { price: u32, currency: u32 },
    /// The map was already bought
    AlreadyUnlocked,
    /// Equipping requires buying first
    NotUnlocked,
    /// The map is already the equipped one for its category
    AlreadyEquipped,
    /// The category owns no slot in the save (the `None` sentinel)
    NoSlot { map_type: CharacterMapType },
    /// The palette has no color at this index
    ColorOutOfRange { color_index: u32 },
}
