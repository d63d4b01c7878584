//! Keep application settings in sync across machines.
//!
//! homesync moves per-application configuration files from the home
//! directory into a shared storage folder (a cloud-synced directory, a
//! network mount, anything) and leaves symlinks behind, so several machines
//! share one canonical copy of each dotfile.
//!
//! The public API is organised into focused layers:
//!
//! - **[`config`]** — user settings and the applications database
//! - **[`storage`]** — storage provider detection and root resolution
//! - **[`resources`]** — the per-path primitive: classify + decide + perform
//! - **[`profile`]** — per-application orchestration over a path list
//! - **[`commands`]** — top-level subcommand wiring (`backup`, `restore`,
//!   `uninstall`, `list`)
//! - **[`logging`]** — structured console/file output and the run summary

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod profile;
pub mod resources;
pub mod storage;
