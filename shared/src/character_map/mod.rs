pub mod catalog;
pub mod catalog_source;
pub mod character_map;
pub mod character_map_type;
pub mod error;
