use crate::{
    character_map::{character_map::CharacterMap, character_map_type::CharacterMapType},
    customization::{
        color::{ColorPalette, Rgba},
        resolver::CharacterMapResolver,
    },
    player::{Initializable, PlayerContext},
    save::{rejection::Rejection, save_data::CharacterMapRecord, save_store::SaveStore},
};

/// A catalog entry as the inventory screen shows it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub display_id: String,
    pub price: u32,
    pub unlocked: bool,
    pub equipped: bool,
}

/// Result of picking a map in the inventory
#[derive(Clone, Debug, PartialEq)]
pub enum MapSelection {
    /// Unlocked, now equipped and shown
    Equipped(CharacterMap),
    /// Unlocked and already shown
    AlreadyEquipped(CharacterMap),
    /// Must be bought first
    Locked { price: u32 },
}

/// The owner's buy / equip / color state machine. The save store decides,
/// the resolver only runs when the store accepted the change.
pub struct Inventory {
    store: SaveStore,
    resolver: CharacterMapResolver,
    palette: ColorPalette,
}

impl Inventory {
    pub fn new(store: SaveStore, resolver: CharacterMapResolver, palette: ColorPalette) -> Self {
        Self {
            store,
            resolver,
            palette,
        }
    }

    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    pub fn resolver(&self) -> &CharacterMapResolver {
        &self.resolver
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn currency(&self) -> u32 {
        self.store.currency()
    }

    pub fn buy(&mut self, map_name: &str, map_type: CharacterMapType) -> Result<CharacterMap, Rejection> {
        let character_map = self.store.buy(map_name, map_type)?;
        self.resolver.apply_map(map_type, &character_map.name);
        Ok(character_map)
    }

    pub fn equip(&mut self, map_name: &str, map_type: CharacterMapType) -> Result<CharacterMap, Rejection> {
        let character_map = self.store.equip(map_name, map_type)?;
        self.resolver.apply_map(map_type, &character_map.name);
        Ok(character_map)
    }

    /// Equips the map when it is unlocked, otherwise reports its price
    pub fn select_map(
        &mut self,
        map_type: CharacterMapType,
        map_name: &str,
    ) -> Result<MapSelection, Rejection> {
        let Some(character_map) = self.resolver.catalog().lookup_typed(map_name, map_type) else {
            return Err(Rejection::NotInCatalog);
        };
        let character_map = character_map.clone();

        match self.equip(map_name, map_type) {
            Ok(equipped) => Ok(MapSelection::Equipped(equipped)),
            Err(Rejection::AlreadyEquipped) => Ok(MapSelection::AlreadyEquipped(character_map)),
            Err(Rejection::NotUnlocked) => Ok(MapSelection::Locked {
                price: character_map.price,
            }),
            Err(rejection) => Err(rejection),
        }
    }

    /// Stores the palette index for the category and replicates its color
    pub fn select_color(
        &mut self,
        map_type: CharacterMapType,
        color_index: u32,
    ) -> Result<Rgba, Rejection> {
        if map_type.is_none() {
            return Err(Rejection::NoSlot { map_type });
        }
        let Some(color) = self.palette.get(color_index) else {
            return Err(Rejection::ColorOutOfRange { color_index });
        };

        self.store.set_color(map_type, color_index)?;
        self.resolver.apply_color(map_type, color);
        Ok(color)
    }

    /// Every catalog entry of the category, cheapest first
    pub fn listing(&self, map_type: CharacterMapType) -> Vec<ListingEntry> {
        let data = self.store.data();
        let equipped = data.equipped(map_type).map(|record| record.name.as_str());

        self.resolver
            .catalog()
            .maps_of_type(map_type)
            .into_iter()
            .map(|character_map| ListingEntry {
                name: character_map.name.clone(),
                display_id: character_map.id.clone(),
                price: character_map.price,
                unlocked: data
                    .is_record_unlocked(&CharacterMapRecord::new(&character_map.name, map_type)),
                equipped: equipped == Some(character_map.name.as_str()),
            })
            .collect()
    }
}

impl Initializable for Inventory {
    /// Loads the save, binds the slots and replays the save into them
    fn initialize_with_player(&mut self, player: &PlayerContext<'_>) {
        self.store.initialize_with_player(player);
        self.resolver.initialize_with_player(player);
        if player.is_owner() {
            self.resolver
                .initialize_from_save(self.store.data(), &self.palette);
        }
    }
}
