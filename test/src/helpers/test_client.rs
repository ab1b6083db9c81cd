use std::{collections::BTreeMap, path::Path, sync::Arc};

use tempfile::TempDir;

use outfit_client::{
    Client, ClientConfig, DespawnEntityEvent, ErrorEvent, OutfitClientError, SpawnEntityEvent,
};
use outfit_shared::{CharacterMapCatalog, EntityKey, PacketSender, StaticCatalogSource};

use crate::{
    helpers::{test_catalog::test_catalog_source, test_player::TestPlayer},
    local_socket::LocalReceiver,
};

/// Test harness for Client: spawns players as the server announces them,
/// with a save directory of its own
pub struct TestClient {
    pub client: Client,
    pub players: BTreeMap<EntityKey, TestPlayer>,
    pub errors: Vec<OutfitClientError>,
    inbox: Option<LocalReceiver>,
    source: StaticCatalogSource,
    catalog: Arc<CharacterMapCatalog>,
    save_dir: TempDir,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_save_dir(tempfile::tempdir().unwrap())
    }

    /// A client whose owned player loads and persists its save in `save_dir`
    pub fn with_save_dir(save_dir: TempDir) -> Self {
        let source = test_catalog_source();
        let catalog = Arc::new(CharacterMapCatalog::new());
        catalog.load_all(&source);

        Self {
            client: Client::new(ClientConfig::default()),
            players: BTreeMap::new(),
            errors: Vec::new(),
            inbox: None,
            source,
            catalog,
            save_dir,
        }
    }

    pub fn save_directory(&self) -> &Path {
        self.save_dir.path()
    }

    pub fn into_save_dir(self) -> TempDir {
        self.save_dir
    }

    pub(crate) fn attach(&mut self, sender: Box<dyn PacketSender>, inbox: LocalReceiver) {
        self.client.connect(sender);
        self.inbox = Some(inbox);
    }

    pub fn disconnect(&mut self) {
        self.client.disconnect();
        self.inbox = None;
        self.players.clear();
    }

    /// Read every packet the server has sent so far, then spawn or despawn
    /// players as announced
    pub fn receive_all(&mut self) {
        let Some(inbox) = self.inbox.as_ref() else {
            return;
        };
        while let Some(packet) = inbox.receive() {
            self.client.receive(&packet);
        }

        let mut events = self.client.take_events();
        for (entity, _owned) in events.read::<SpawnEntityEvent>() {
            // spawned and despawned within the same batch
            if !self.client.gate().is_registered(&entity) {
                continue;
            }
            let context = self.client.player_context(entity, &self.source);
            let player = TestPlayer::spawn(&context, &self.catalog, self.save_dir.path());
            self.players.insert(entity, player);
        }
        for entity in events.read::<DespawnEntityEvent>() {
            self.players.remove(&entity);
        }
        self.errors.extend(events.read::<ErrorEvent>());
    }

    pub fn flush(&mut self) {
        if let Err(error) = self.client.send_all_updates() {
            self.errors.push(error);
        }
    }

    pub fn player(&self, entity: &EntityKey) -> &TestPlayer {
        &self.players[entity]
    }

    /// The one player this client owns, if the server spawned it
    pub fn owned_player(&self) -> Option<&TestPlayer> {
        self.players.values().find(|player| player.player.is_owner())
    }

    pub fn owned_player_mut(&mut self) -> Option<&mut TestPlayer> {
        self.players
            .values_mut()
            .find(|player| player.player.is_owner())
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
