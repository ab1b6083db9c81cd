use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::SystemTime,
};

use log::{error, info, warn};

use crate::{
    character_map::{
        catalog::CharacterMapCatalog, character_map::CharacterMap,
        character_map_type::CharacterMapType,
    },
    player::{Initializable, PlayerContext},
    save::{
        error::SaveError,
        rejection::Rejection,
        save_config::SaveConfig,
        save_data::{CharacterMapRecord, GameSaveData},
    },
};

/// Where the active save came from on the last [`SaveStore::load_or_create`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadSource {
    Primary,
    Backup,
    Fresh,
}

/// Owns one player's [`GameSaveData`] and keeps it on disk.
///
/// Every successful mutation persists once. Persisting first rotates the
/// current primary file into the backup slot, then atomically replaces the
/// primary, so the backup always holds the last state that was fully written.
pub struct SaveStore {
    config: SaveConfig,
    catalog: Arc<CharacterMapCatalog>,
    data: GameSaveData,
    loaded_from: Option<LoadSource>,
    last_saved: Option<SystemTime>,
}

impl SaveStore {
    /// Create a store holding default data in memory, nothing is read or
    /// written until [`load_or_create`](Self::load_or_create)
    pub fn new(config: SaveConfig, catalog: Arc<CharacterMapCatalog>) -> Self {
        Self {
            config,
            catalog,
            data: GameSaveData::default(),
            loaded_from: None,
            last_saved: None,
        }
    }

    /// Create a store and immediately load (or create) its save
    pub fn open(config: SaveConfig, catalog: Arc<CharacterMapCatalog>) -> Self {
        let mut store = Self::new(config, catalog);
        store.load_or_create();
        store
    }

    pub fn config(&self) -> &SaveConfig {
        &self.config
    }

    pub fn data(&self) -> &GameSaveData {
        &self.data
    }

    pub fn currency(&self) -> u32 {
        self.data.currency
    }

    pub fn loaded_from(&self) -> Option<LoadSource> {
        self.loaded_from
    }

    pub fn last_saved(&self) -> Option<SystemTime> {
        self.last_saved
    }

    // Loading

    /// Primary file, then backup file, then fresh defaults (persisted at once)
    pub fn load_or_create(&mut self) -> LoadSource {
        let primary_path = self.config.primary_path();
        let source = match Self::read_save(&primary_path) {
            Ok(data) => {
                info!("Save file loaded successfully");
                self.data = data;
                LoadSource::Primary
            }
            Err(primary_err) => {
                if !matches!(primary_err, SaveError::Missing { .. }) {
                    error!("Failed to load game data: {}", primary_err);
                }
                match Self::read_save(&self.config.backup_path()) {
                    Ok(data) => {
                        info!("Loaded game data from backup");
                        self.data = data;
                        LoadSource::Backup
                    }
                    Err(backup_err) => {
                        if !matches!(backup_err, SaveError::Missing { .. }) {
                            error!("Failed to load backup game data: {}", backup_err);
                        }
                        info!("New save file created");
                        self.data = GameSaveData::default();
                        LoadSource::Fresh
                    }
                }
            }
        };

        // the unreadable primary is not a state worth rotating into the backup
        if source != LoadSource::Primary {
            match self.write_primary() {
                Ok(()) => self.last_saved = Some(SystemTime::now()),
                Err(err) => error!("Failed to save game data: {}", err),
            }
        }

        self.loaded_from = Some(source);
        source
    }

    fn read_save(path: &Path) -> Result<GameSaveData, SaveError> {
        if !path.exists() {
            return Err(SaveError::Missing {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).map_err(|source| SaveError::Io {
            operation: "read",
            path: path.to_path_buf(),
            source,
        })?;
        let data: GameSaveData =
            serde_json::from_str(&content).map_err(|source| SaveError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        data.validate().map_err(|reason| SaveError::Inconsistent {
            path: path.to_path_buf(),
            reason,
        })?;
        Ok(data)
    }

    // Persisting

    /// Writes the in-memory state, logging instead of returning failures.
    ///
    /// Returns whether the write succeeded.
    pub fn persist(&mut self) -> bool {
        match self.try_persist() {
            Ok(()) => true,
            Err(err) => {
                error!("Failed to save game data: {}", err);
                false
            }
        }
    }

    /// Rotates the primary into the backup slot, then replaces the primary
    pub fn try_persist(&mut self) -> Result<(), SaveError> {
        self.ensure_directory()?;
        self.rotate_backup()?;
        self.write_primary()?;
        self.last_saved = Some(SystemTime::now());
        Ok(())
    }

    fn ensure_directory(&self) -> Result<(), SaveError> {
        fs::create_dir_all(&self.config.directory).map_err(|source| SaveError::Io {
            operation: "create directory",
            path: self.config.directory.clone(),
            source,
        })
    }

    fn rotate_backup(&self) -> Result<(), SaveError> {
        let primary_path = self.config.primary_path();
        if !primary_path.exists() {
            return Ok(());
        }
        let backup_path = self.config.backup_path();
        fs::copy(&primary_path, &backup_path).map_err(|source| SaveError::Io {
            operation: "copy to backup",
            path: backup_path,
            source,
        })?;
        Ok(())
    }

    fn write_primary(&self) -> Result<(), SaveError> {
        self.ensure_directory()?;
        let json = serde_json::to_string_pretty(&self.data).map_err(SaveError::Serialize)?;

        let staging_path = self.config.staging_path();
        fs::write(&staging_path, json).map_err(|source| SaveError::Io {
            operation: "write",
            path: staging_path.clone(),
            source,
        })?;

        let primary_path: PathBuf = self.config.primary_path();
        fs::rename(&staging_path, &primary_path).map_err(|source| SaveError::Io {
            operation: "replace",
            path: primary_path,
            source,
        })
    }

    // Queries

    /// Whether any category has a map with this name unlocked
    pub fn is_unlocked(&self, name: &str) -> bool {
        self.data.is_unlocked(name)
    }

    /// Name of the map equipped for `map_type`.
    ///
    /// A valid save equips exactly one map per category, so `None` only comes
    /// back for the `None` sentinel.
    pub fn selected_map_for(&self, map_type: CharacterMapType) -> Option<&str> {
        self.data
            .equipped(map_type)
            .map(|record| record.name.as_str())
    }

    pub fn saved_color_index_for(&self, map_type: CharacterMapType) -> Option<u32> {
        self.data.color_index(map_type)
    }

    // Mutations

    /// Unlocks and equips a map, deducting its price.
    ///
    /// Nothing changes and nothing is written when the request is rejected.
    pub fn buy(&mut self, name: &str, map_type: CharacterMapType) -> Result<CharacterMap, Rejection> {
        let Some(character_map) = self.catalog.lookup_typed(name, map_type) else {
            return Err(Rejection::NotInCatalog);
        };

        if self.data.currency < character_map.price {
            return Err(Rejection::InsufficientFunds {
                price: character_map.price,
                currency: self.data.currency,
            });
        }

        let record = CharacterMapRecord::new(name, map_type);
        if self.data.is_record_unlocked(&record) {
            return Err(Rejection::AlreadyUnlocked);
        }

        let character_map = character_map.clone();
        self.data.currency -= character_map.price;
        self.data.unlocked_character_maps.push(record.clone());
        self.data.replace_equipped(record);
        self.persist();

        Ok(character_map)
    }

    /// Equips a map that was unlocked before
    pub fn equip(&mut self, name: &str, map_type: CharacterMapType) -> Result<CharacterMap, Rejection> {
        let Some(character_map) = self.catalog.lookup_typed(name, map_type) else {
            return Err(Rejection::NotInCatalog);
        };

        let record = CharacterMapRecord::new(name, map_type);
        if !self.data.is_record_unlocked(&record) {
            return Err(Rejection::NotUnlocked);
        }
        if self.data.equipped(map_type) == Some(&record) {
            return Err(Rejection::AlreadyEquipped);
        }

        let character_map = character_map.clone();
        self.data.replace_equipped(record);
        self.persist();

        Ok(character_map)
    }

    /// Stores the palette index chosen for a category
    pub fn set_color(&mut self, map_type: CharacterMapType, color_index: u32) -> Result<(), Rejection> {
        let Some(selection) = self
            .data
            .color_selections
            .iter_mut()
            .find(|selection| selection.map_type == map_type)
        else {
            warn!("No color selection stored for '{}'", map_type);
            return Err(Rejection::NoSlot { map_type });
        };

        selection.color_index = color_index;
        self.persist();
        Ok(())
    }
}

impl Initializable for SaveStore {
    /// Loads the catalog and the save, only for the player's owner
    fn initialize_with_player(&mut self, player: &PlayerContext<'_>) {
        if !player.is_owner() {
            return;
        }
        self.catalog.load_all(player.catalog_source());
        self.load_or_create();
    }
}
