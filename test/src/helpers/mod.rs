pub mod packet_exchange;
pub mod recording_target;
pub mod test_catalog;
pub mod test_client;
pub mod test_player;

pub use packet_exchange::{exchange_packets, exchange_packets_n_times};
pub use recording_target::{RecordingTarget, RecordingTargets};
pub use test_catalog::{
    init_logging, test_catalog_source, HAIR_V2, HAIR_V2_PRICE, HAIR_V3, HAIR_V3_PRICE, TORSO_V2,
    TORSO_V2_PRICE,
};
pub use test_client::TestClient;
pub use test_player::TestPlayer;
pub use test_server::TestServer;
