//! Storage provider detection and storage-root resolution.
//!
//! The storage root is `<provider folder>/<storage.directory>`. The provider
//! folder comes from the configured engine: Dropbox's is read from
//! `~/.dropbox/host.db` (whose second line base64-encodes the folder path),
//! Google Drive and iCloud Drive are well-known folders, and `file_system`
//! uses an explicit path from the settings.
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;

use crate::config::Settings;
use crate::error::{ConfigError, HomesyncError, StorageError};

/// Supported storage engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Dropbox sync folder, located via `~/.dropbox/host.db`.
    Dropbox,
    /// `~/Google Drive`.
    GoogleDrive,
    /// iCloud Drive documents folder (macOS).
    ICloud,
    /// An explicit directory given in the settings.
    FileSystem,
}

impl Engine {
    /// Parse the engine name used in the settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEngine`] for anything unrecognised.
    pub fn parse(name: &str) -> Result<Self, ConfigError> {
        match name {
            "dropbox" => Ok(Self::Dropbox),
            "google_drive" => Ok(Self::GoogleDrive),
            "icloud" => Ok(Self::ICloud),
            "file_system" => Ok(Self::FileSystem),
            other => Err(ConfigError::UnknownEngine(other.to_string())),
        }
    }

    /// Human-readable provider name for error messages.
    #[must_use]
    pub const fn provider_name(self) -> &'static str {
        match self {
            Self::Dropbox => "Dropbox",
            Self::GoogleDrive => "Google Drive",
            Self::ICloud => "iCloud Drive",
            Self::FileSystem => "file system",
        }
    }
}

/// Resolve the home directory: an explicit override wins, otherwise `HOME`
/// (or `USERPROFILE` on Windows).
///
/// # Errors
///
/// Returns [`StorageError::HomeUnresolved`] when no source yields a path.
pub fn resolve_home(override_path: Option<&Path>) -> Result<PathBuf, StorageError> {
    if let Some(home) = override_path {
        return Ok(home.to_path_buf());
    }
    let var = if cfg!(target_os = "windows") {
        std::env::var("USERPROFILE").or_else(|_| std::env::var("HOME"))
    } else {
        std::env::var("HOME")
    };
    var.map(PathBuf::from).map_err(|_| {
        StorageError::HomeUnresolved(
            "neither --home nor the HOME environment variable is set".to_string(),
        )
    })
}

/// Resolve the storage root from the settings: provider folder plus the
/// configured directory name.
///
/// # Errors
///
/// Returns a [`ConfigError`] for a bad engine name or a missing
/// `file_system` path, and a [`StorageError`] when the provider folder
/// cannot be located.
pub fn resolve_root(settings: &Settings, home: &Path) -> Result<PathBuf, HomesyncError> {
    let engine = Engine::parse(&settings.storage.engine)?;
    let base = match engine {
        Engine::Dropbox => dropbox_folder(home)?,
        Engine::GoogleDrive => existing_dir(home.join("Google Drive"), engine)?,
        Engine::ICloud => existing_dir(
            home.join("Library/Mobile Documents/com~apple~CloudDocs"),
            engine,
        )?,
        Engine::FileSystem => settings
            .storage
            .path
            .clone()
            .ok_or(ConfigError::MissingStoragePath)?,
    };
    Ok(base.join(&settings.storage.directory))
}

/// Prepare the storage root for a backup run: create it if missing and
/// canonicalize it.
///
/// # Errors
///
/// Returns [`StorageError::NotADirectory`] if something else sits at the
/// path, or [`StorageError::Io`] if it cannot be created.
pub fn prepare_backup_root(root: &Path) -> Result<PathBuf, StorageError> {
    if root.exists() && !root.is_dir() {
        return Err(StorageError::NotADirectory(root.to_path_buf()));
    }
    fs::create_dir_all(root).map_err(|e| StorageError::Io {
        path: root.to_path_buf(),
        source: e,
    })?;
    canonicalize(root)
}

/// Require an existing storage root, as restore and uninstall do.
///
/// # Errors
///
/// Returns [`StorageError::RootMissing`] when the root does not exist and
/// [`StorageError::NotADirectory`] when it is not a directory.
pub fn require_restore_root(root: &Path) -> Result<PathBuf, StorageError> {
    if !root.exists() {
        return Err(StorageError::RootMissing(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(StorageError::NotADirectory(root.to_path_buf()));
    }
    canonicalize(root)
}

fn canonicalize(path: &Path) -> Result<PathBuf, StorageError> {
    dunce::canonicalize(path).map_err(|e| StorageError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Locate the Dropbox folder via `~/.dropbox/host.db`.
///
/// The file's second line holds the folder path, base64-encoded.
fn dropbox_folder(home: &Path) -> Result<PathBuf, StorageError> {
    let host_db = home.join(".dropbox").join("host.db");
    let not_found = |detail: String| StorageError::ProviderNotFound {
        provider: Engine::Dropbox.provider_name(),
        detail,
    };

    let data = fs::read_to_string(&host_db)
        .map_err(|e| not_found(format!("cannot read {}: {e}", host_db.display())))?;
    let encoded = data
        .lines()
        .nth(1)
        .ok_or_else(|| not_found(format!("{} has no folder entry", host_db.display())))?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| not_found(format!("folder entry in host.db is not base64: {e}")))?;
    let folder = String::from_utf8(decoded)
        .map_err(|_| not_found("folder entry in host.db is not valid UTF-8".to_string()))?;
    Ok(PathBuf::from(folder))
}

fn existing_dir(path: PathBuf, engine: Engine) -> Result<PathBuf, StorageError> {
    if path.is_dir() {
        Ok(path)
    } else {
        Err(StorageError::ProviderNotFound {
            provider: engine.provider_name(),
            detail: format!("{} is not a directory", path.display()),
        })
    }
}
