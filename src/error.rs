//! Domain-specific error types for the sync engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors while command handlers at the CLI
//! boundary convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! HomesyncError
//! ├── Config(ConfigError)   — settings and application definition parsing
//! ├── Storage(StorageError) — storage provider detection and root checks
//! └── Path(PathError)       — per-path backup/restore/uninstall outcomes
//! ```
//!
//! The three [`PathError`] variants are recoverable at per-path granularity:
//! the profile logs them and moves on to the next path. [`ConfigError`] and
//! [`StorageError`] are fatal before the batch starts.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the sync engine.
#[derive(Error, Debug)]
pub enum HomesyncError {
    /// Configuration-related error (settings file, application definitions).
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage resolution error (provider detection, root directory checks).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Per-path operation error.
    #[error("path error: {0}")]
    Path(#[from] PathError),
}

/// Errors that arise from loading settings and application definitions.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file names a storage engine that does not exist.
    #[error("unknown storage engine '{0}': must be one of dropbox, google_drive, icloud, file_system")]
    UnknownEngine(String),

    /// The `file_system` engine was selected without a `storage.path`.
    #[error("storage engine 'file_system' requires storage.path to be set")]
    MissingStoragePath,

    /// A TOML file failed to parse.
    #[error("invalid TOML in {file}: {message}")]
    InvalidToml {
        /// Path of the file that failed to parse.
        file: String,
        /// Parser error message.
        message: String,
    },

    /// An I/O error occurred while reading a configuration file.
    #[error("reading {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from resolving and checking the storage root.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The provider's sync folder could not be located on this machine.
    #[error("could not locate the {provider} folder: {detail}")]
    ProviderNotFound {
        /// Human-readable provider name.
        provider: &'static str,
        /// What was looked for and not found.
        detail: String,
    },

    /// The storage root exists but is not a directory.
    #[error("storage root {0} exists but is not a directory")]
    NotADirectory(PathBuf),

    /// The storage root does not exist (required by restore and uninstall).
    #[error("storage root {0} does not exist; run a backup first")]
    RootMissing(PathBuf),

    /// The home root could not be determined.
    #[error("cannot determine the home directory: {0}")]
    HomeUnresolved(String),

    /// An I/O error occurred while preparing the storage root.
    #[error("preparing storage root {path}: {source}")]
    Io {
        /// Path being prepared.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Per-path operation outcome errors.
///
/// All three variants are recoverable: the application profile logs them,
/// skips the path, and continues with the rest of the batch.
#[derive(Error, Debug)]
pub enum PathError {
    /// A real file exists where a symlink or nothing was expected.
    #[error("conflict at {path}: {detail}")]
    Conflict {
        /// The home-relative path in question.
        path: PathBuf,
        /// What was found.
        detail: String,
    },

    /// Nothing present to back up, restore, or uninstall.
    #[error("{path}: {detail}")]
    MissingSource {
        /// The home-relative path in question.
        path: PathBuf,
        /// Why there is nothing to do.
        detail: String,
    },

    /// Underlying filesystem failure (permissions, space, broken path).
    #[error("filesystem error at {path}: {source}")]
    Filesystem {
        /// The absolute path the operation was touching.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl PathError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }
}
