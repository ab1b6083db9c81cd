//! # Outfit Client
//! A client peer of a customization session. Mirrors the server's entities
//! and property values, and forwards the local player's changes to the
//! server as requests.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use outfit_shared::{
        AuthorityGate, CatalogSource, EntityKey, PacketSender, PlayerContext, PropertyRegistry,
        TransportError,
    };
}

mod client;
mod error;
mod events;

pub use client::{Client, ClientConfig};
pub use error::OutfitClientError;
pub use events::{
    ClientEvent, ClientEvents, DespawnEntityEvent, ErrorEvent, SpawnEntityEvent,
};
