use std::{default::Default, path::PathBuf};

/// Contains Config properties which will be used by the SaveStore
#[derive(Clone, Debug)]
pub struct SaveConfig {
    /// Directory holding the primary and backup save files
    pub directory: PathBuf,
    /// Name of the primary save file
    pub file_name: String,
    /// Name of the file the previous primary is rotated into
    pub backup_file_name: String,
}

impl SaveConfig {
    pub fn in_directory(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn primary_path(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.directory.join(&self.backup_file_name)
    }

    /// Staging file the primary is written to before being renamed into place
    pub fn staging_path(&self) -> PathBuf {
        self.directory.join(format!("{}.tmp", self.file_name))
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: default_save_directory(),
            file_name: "gameSave.json".to_string(),
            backup_file_name: "gameSave_backup.json".to_string(),
        }
    }
}

/// Returns the platform-specific per-user data directory.
///
/// On Windows: `%APPDATA%\Outfit\data`
/// On macOS: `~/Library/Application Support/io.outfit.Outfit`
/// On Linux: `~/.local/share/outfit`
///
/// Falls back to the working directory when no home directory is known.
pub fn default_save_directory() -> PathBuf {
    directories::ProjectDirs::from("io", "outfit", "Outfit")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}
