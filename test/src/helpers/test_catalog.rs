use outfit_shared::{
    CharacterMap, CharacterMapType, StaticCatalogSource, VisualRef, DEFAULT_CHARACTER_MAPS,
};

pub const HAIR_V2: &str = "CharacterMap_Hair_V2";
pub const HAIR_V2_PRICE: u32 = 150;
pub const HAIR_V3: &str = "CharacterMap_Hair_V3";
pub const HAIR_V3_PRICE: u32 = 400;
pub const TORSO_V2: &str = "CharacterMap_Torso_V2";
pub const TORSO_V2_PRICE: u32 = 250;

/// Starter maps (free, meshes named after the map) plus a few paid ones
pub fn test_catalog_source() -> StaticCatalogSource {
    let mut definitions: Vec<CharacterMap> = DEFAULT_CHARACTER_MAPS
        .iter()
        .map(|(name, map_type)| CharacterMap::new(name, *map_type, 0, VisualRef::new(name, name)))
        .collect();
    definitions.push(CharacterMap::new(
        HAIR_V2,
        CharacterMapType::Hair,
        HAIR_V2_PRICE,
        VisualRef::new("hair_v2", "hair"),
    ));
    definitions.push(CharacterMap::new(
        HAIR_V3,
        CharacterMapType::Hair,
        HAIR_V3_PRICE,
        VisualRef::new("hair_v3", "hair"),
    ));
    definitions.push(CharacterMap::new(
        TORSO_V2,
        CharacterMapType::Torso,
        TORSO_V2_PRICE,
        VisualRef::new("torso_v2", "torso"),
    ));
    StaticCatalogSource::new(definitions)
}

/// Routes `log` output through the test harness, once per process
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
