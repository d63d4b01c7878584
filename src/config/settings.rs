//! User settings file (`~/.homesync.toml`).
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Name of the settings file inside the home directory.
pub const SETTINGS_FILE: &str = ".homesync.toml";

/// Name of the directory holding user-defined application definitions.
pub const CUSTOM_APPS_DIR: &str = ".homesync";

/// All user settings, with defaults for anything not written down.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Where backed-up files live.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Which applications to include or ignore.
    #[serde(default)]
    pub applications: ApplicationSettings,
}

/// The `[storage]` section.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StorageSettings {
    /// Storage engine name; parsed by [`crate::storage::Engine::parse`].
    #[serde(default = "default_engine")]
    pub engine: String,
    /// Explicit root for the `file_system` engine.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Directory name appended to the provider folder.
    #[serde(default = "default_directory")]
    pub directory: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            path: None,
            directory: default_directory(),
        }
    }
}

/// The `[applications]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApplicationSettings {
    /// When non-empty, only these application ids are synced.
    #[serde(default)]
    pub sync: Vec<String>,
    /// Application ids excluded from every run.
    #[serde(default)]
    pub ignore: Vec<String>,
}

fn default_engine() -> String {
    "dropbox".to_string()
}

fn default_directory() -> String {
    "homesync".to_string()
}

impl Settings {
    /// Load settings from `<home>/.homesync.toml`.
    ///
    /// A missing file yields the defaults; an unreadable or unparseable file
    /// is an error (the batch must not start on a half-read configuration).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::InvalidToml`].
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = home.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        super::parse_toml(&path.display().to_string(), &text)
    }

    /// Whether the application id is selected by the sync/ignore lists.
    #[must_use]
    pub fn selects(&self, app_id: &str) -> bool {
        if self.applications.ignore.iter().any(|a| a == app_id) {
            return false;
        }
        if self.applications.sync.is_empty() {
            return true;
        }
        self.applications.sync.iter().any(|a| a == app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_settings(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), content).unwrap();
        let home = dir.path().to_path_buf();
        (dir, home)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.storage.engine, "dropbox");
        assert_eq!(settings.storage.directory, "homesync");
    }

    #[test]
    fn load_full_settings() {
        let (_dir, home) = write_settings(
            r#"[storage]
engine = "file_system"
path = "/mnt/sync"
directory = "dotfiles"

[applications]
sync = ["vim", "git"]
ignore = ["ssh"]
"#,
        );
        let settings = Settings::load(&home).unwrap();
        assert_eq!(settings.storage.engine, "file_system");
        assert_eq!(settings.storage.path, Some(PathBuf::from("/mnt/sync")));
        assert_eq!(settings.storage.directory, "dotfiles");
        assert_eq!(settings.applications.sync, vec!["vim", "git"]);
        assert_eq!(settings.applications.ignore, vec!["ssh"]);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let (_dir, home) = write_settings("[applications]\nignore = [\"ssh\"]\n");
        let settings = Settings::load(&home).unwrap();
        assert_eq!(settings.storage.engine, "dropbox");
        assert_eq!(settings.storage.directory, "homesync");
        assert!(settings.applications.sync.is_empty());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let (_dir, home) = write_settings("[storage\nengine = ");
        let err = Settings::load(&home).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToml { .. }));
    }

    #[test]
    fn selects_everything_by_default() {
        let settings = Settings::default();
        assert!(settings.selects("vim"));
        assert!(settings.selects("git"));
    }

    #[test]
    fn ignore_list_wins() {
        let (_dir, home) = write_settings(
            "[applications]\nsync = [\"vim\"]\nignore = [\"vim\"]\n",
        );
        let settings = Settings::load(&home).unwrap();
        assert!(!settings.selects("vim"));
    }

    #[test]
    fn sync_list_narrows_selection() {
        let (_dir, home) = write_settings("[applications]\nsync = [\"vim\"]\n");
        let settings = Settings::load(&home).unwrap();
        assert!(settings.selects("vim"));
        assert!(!settings.selects("git"));
    }
}
