//! # Outfit Shared
//! Character customization state shared between outfit-server & outfit-client
//! crates: the catalog, the save store, replicated properties and the
//! authority gate that decides who may write them.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

mod character_map;
mod customization;
mod messages;
mod player;
mod save;
mod transport;
mod types;
mod world;

pub use character_map::{
    catalog::CharacterMapCatalog,
    catalog_source::{
        CatalogSource, DirectoryCatalogSource, StaticCatalogSource, CHARACTER_MAP_NAMESPACE,
    },
    character_map::{CharacterMap, VisualRef, DEFAULT_PRICE},
    character_map_type::CharacterMapType,
    error::CatalogError,
};
pub use customization::{
    color::{ColorPalette, Rgba},
    color_changer::ColorChanger,
    inventory::{Inventory, ListingEntry, MapSelection},
    mesh_changer::{MeshChanger, MAX_MAP_NAME_BYTES},
    render_target::{shared as shared_render_target, RenderTarget, SharedRenderTarget},
    resolver::CharacterMapResolver,
    slot::{CharacterMapSlot, SlotBindings},
};
pub use messages::{
    error::MessageError,
    outbox::Outbox,
    packet::{
        decode_value, encode_value, read_packet, write_packets, PacketWriter,
        MAX_MESSAGES_PER_PACKET, MAX_PAYLOAD_BYTES,
    },
    replication_message::ReplicationMessage,
};
pub use player::{Initializable, Player, PlayerContext, PlayerRole, PlayerSetup};
pub use save::{
    error::SaveError,
    rejection::Rejection,
    save_config::{default_save_directory, SaveConfig},
    save_data::{
        CharacterMapRecord, ColorSelection, GameSaveData, DEFAULT_CHARACTER_MAPS,
        STARTING_CURRENCY,
    },
    save_store::{LoadSource, SaveStore},
};
pub use transport::{PacketSender, TransportError};
pub use types::{EntityKey, HostType};
pub use world::{
    authority::{AuthorityAccessor, AuthorityStatus},
    authority_gate::AuthorityGate,
    error::{AuthorityError, PropertyError, RegistryError},
    property_key::{PropertyKey, PropertyKind},
    property_registry::{PropertyRegistry, DEFAULT_MAX_WAITING_UPDATES},
    replicated_property::{
        ListenerKey, PropertyHandle, PropertyState, PropertyValue, ReplicatedProperty, SetOutcome,
    },
};
