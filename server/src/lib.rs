//! # Outfit Server
//! The authoritative peer of a customization session: it owns write
//! authority over every player entity, applies the requests users send and
//! broadcasts the results, including snapshots for late joiners.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use outfit_shared::{
        AuthorityGate, CatalogSource, EntityKey, PacketSender, PlayerContext, PropertyKey,
        PropertyRegistry, SetOutcome, TransportError,
    };
}

mod error;
mod events;
mod server;
mod user;

pub use error::OutfitServerError;
pub use events::{ConnectEvent, DisconnectEvent, ErrorEvent, MainEvent, MainEvents, RequestEvent};
pub use server::{Server, ServerConfig};
pub use user::UserKey;
