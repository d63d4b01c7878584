//! Applications database: id → display name + ordered managed path list.
//!
//! Definitions come from two places: a set bundled into the binary
//! (`apps/*.toml`) and user-defined files in `~/.homesync/*.toml`. A user
//! definition with the same id replaces the bundled one wholesale.
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Application definitions compiled into the binary.
const BUNDLED: &[(&str, &str)] = &[
    ("alacritty", include_str!("../../apps/alacritty.toml")),
    ("bash", include_str!("../../apps/bash.toml")),
    ("curl", include_str!("../../apps/curl.toml")),
    ("git", include_str!("../../apps/git.toml")),
    ("gnupg", include_str!("../../apps/gnupg.toml")),
    ("hammerspoon", include_str!("../../apps/hammerspoon.toml")),
    ("htop", include_str!("../../apps/htop.toml")),
    ("karabiner", include_str!("../../apps/karabiner.toml")),
    ("neovim", include_str!("../../apps/neovim.toml")),
    ("ssh", include_str!("../../apps/ssh.toml")),
    ("starship", include_str!("../../apps/starship.toml")),
    ("tmux", include_str!("../../apps/tmux.toml")),
    ("vim", include_str!("../../apps/vim.toml")),
    ("zsh", include_str!("../../apps/zsh.toml")),
];

/// One application's definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDefinition {
    /// Display name ("Vim", "GnuPG").
    pub name: String,
    /// Ordered, deduplicated home-relative paths.
    pub files: Vec<PathBuf>,
}

/// On-disk shape of a definition file.
#[derive(Debug, Deserialize)]
struct RawDefinition {
    name: String,
    files: Vec<String>,
}

/// The full database, ordered by application id.
#[derive(Debug, Default)]
pub struct ApplicationsDatabase {
    apps: BTreeMap<String, AppDefinition>,
}

impl ApplicationsDatabase {
    /// Load the bundled definitions plus any user definitions under
    /// `<home>/.homesync/*.toml` (file stem = application id; a user file
    /// replaces a bundled definition with the same id).
    ///
    /// # Errors
    ///
    /// Returns an error if any definition file fails to read or parse.
    pub fn load(custom_dir: &Path) -> Result<Self, ConfigError> {
        let mut db = Self::bundled()?;

        if custom_dir.is_dir() {
            let entries = std::fs::read_dir(custom_dir).map_err(|e| ConfigError::Io {
                path: custom_dir.display().to_string(),
                source: e,
            })?;
            let mut custom: Vec<PathBuf> = entries
                .filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
                .collect();
            custom.sort();

            for path in custom {
                let Some(id) = path.file_stem().map(|s| s.to_string_lossy().to_string())
                else {
                    continue;
                };
                let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
                    path: path.display().to_string(),
                    source: e,
                })?;
                let def = parse_definition(&path.display().to_string(), &text)?;
                db.apps.insert(id, def);
            }
        }

        Ok(db)
    }

    /// The bundled definitions only.
    ///
    /// # Errors
    ///
    /// Returns an error if a bundled definition fails to parse (a packaging
    /// defect, surfaced rather than papered over).
    pub fn bundled() -> Result<Self, ConfigError> {
        let mut apps = BTreeMap::new();
        for (id, text) in BUNDLED {
            apps.insert((*id).to_string(), parse_definition(id, text)?);
        }
        Ok(Self { apps })
    }

    /// Look up one application by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&AppDefinition> {
        self.apps.get(id)
    }

    /// Iterate `(id, definition)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppDefinition)> {
        self.apps.iter().map(|(id, def)| (id.as_str(), def))
    }

    /// Number of known applications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// True when no applications are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}

/// Parse one definition document, validating and deduplicating its paths.
fn parse_definition(label: &str, text: &str) -> Result<AppDefinition, ConfigError> {
    let raw: RawDefinition = super::parse_toml(label, text)?;

    let mut files = Vec::with_capacity(raw.files.len());
    for entry in raw.files {
        let path = PathBuf::from(&entry);
        if !is_safe_relative(&path) {
            return Err(ConfigError::InvalidToml {
                file: label.to_string(),
                message: format!(
                    "file entry '{entry}' must be a relative path without '..' components"
                ),
            });
        }
        if !files.contains(&path) {
            files.push(path);
        }
    }

    Ok(AppDefinition {
        name: raw.name,
        files,
    })
}

/// A managed path must stay inside the roots it is joined to.
fn is_safe_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path.is_relative()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
