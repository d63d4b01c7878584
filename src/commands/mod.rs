//! Top-level subcommand orchestration.
pub mod backup;
pub mod list;
pub mod restore;
pub mod uninstall;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::cli::{GlobalOpts, OpOpts};
use crate::config::settings::CUSTOM_APPS_DIR;
use crate::config::{AppDefinition, ApplicationsDatabase, Settings};
use crate::logging::Logger;
use crate::profile::ApplicationProfile;
use crate::resources::Operation;
use crate::storage;

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates home resolution, settings loading, the applications
/// database, and storage-root resolution so that each command does not
/// repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Resolved home root.
    pub home: PathBuf,
    /// Resolved (but not yet prepared/checked) storage root.
    pub storage_root: PathBuf,
    /// User settings.
    pub settings: Settings,
    /// Applications database (bundled + user definitions).
    pub db: ApplicationsDatabase,
}

impl CommandSetup {
    /// Resolve the home directory, load settings and the applications
    /// database, and resolve the storage root.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, the
    /// settings or a definition file fails to parse, or the storage
    /// provider cannot be located. These are the only fatal errors of a
    /// run; everything past setup is best-effort.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let home = storage::resolve_home(global.home.as_deref())?;

        log.stage("Loading configuration");
        let settings = Settings::load(&home)?;
        let db = ApplicationsDatabase::load(&home.join(CUSTOM_APPS_DIR))?;
        log.debug(&format!("{} application definitions", db.len()));

        let storage_root = match &global.storage {
            Some(path) => path.clone(),
            None => storage::resolve_root(&settings, &home)?,
        };
        log.info(&format!("storage: {}", storage_root.display()));

        Ok(Self {
            home,
            storage_root,
            settings,
            db,
        })
    }

    /// Applications selected for this run: database order, filtered by the
    /// settings lists and the `--only`/`--skip` flags.
    #[must_use]
    pub fn selected_apps<'a>(&'a self, opts: &OpOpts) -> Vec<(&'a str, &'a AppDefinition)> {
        self.db
            .iter()
            .filter(|(id, _)| self.settings.selects(id))
            .filter(|(id, _)| {
                if !opts.only.is_empty() {
                    return opts.only.iter().any(|o| o.eq_ignore_ascii_case(id));
                }
                !opts.skip.iter().any(|s| s.eq_ignore_ascii_case(id))
            })
            .collect()
    }
}

/// Run one operation over every selected application, sequentially, and
/// print the summary.
///
/// Per-path and per-application failures are recorded in the summary but do
/// not fail the run: the batch is best-effort by design, and re-running is
/// always safe.
pub fn run_operation(
    setup: &CommandSetup,
    storage_root: &Path,
    op: Operation,
    opts: &OpOpts,
    dry_run: bool,
    log: &Logger,
) {
    let apps = setup.selected_apps(opts);
    if apps.is_empty() {
        log.info("no applications selected");
        return;
    }

    for (_, def) in apps {
        log.stage(&format!("{} {}", op.name(), def.name));
        let profile = ApplicationProfile {
            name: &def.name,
            paths: &def.files,
            home: &setup.home,
            storage: storage_root,
            dry_run,
        };
        let stats = profile.apply(op, log);
        let (status, message) = stats.app_status(dry_run);
        log.record_app(&def.name, status, Some(&message));
    }

    log.print_summary();
}
