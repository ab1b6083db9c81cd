pub mod authority;
pub mod authority_gate;
pub mod error;
pub mod property_key;
pub mod property_registry;
pub mod replicated_property;
