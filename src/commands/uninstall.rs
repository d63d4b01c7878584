//! Uninstall command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, UninstallOpts};
use crate::logging::Logger;
use crate::resources::Operation;
use crate::storage;

/// Run the uninstall command.
///
/// Asks for confirmation first (skipped with `--force`; a dry run never
/// prompts because nothing will change). Per-path failures are reported in
/// the summary instead of failing the run.
///
/// # Errors
///
/// Returns an error if setup fails, the storage root does not exist, or the
/// user declines the confirmation.
pub fn run(global: &GlobalOpts, opts: &UninstallOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let root = storage::require_restore_root(&setup.storage_root)?;

    if !global.dry_run && !opts.force && !confirm()? {
        anyhow::bail!("uninstall aborted");
    }

    super::run_operation(
        &setup,
        &root,
        Operation::Uninstall,
        &opts.filter,
        global.dry_run,
        log,
    );

    if !global.dry_run {
        log.info(
            "Every managed file has been unlinked and moved back into your home folder. \
             It is now safe to stop using homesync on this machine.",
        );
    }
    Ok(())
}

/// Interactive confirmation before unlinking everything.
fn confirm() -> Result<bool> {
    inquire::Confirm::new(
        "Every configuration file managed by homesync will be unlinked and moved \
         back to its original place in your home folder. Continue?",
    )
    .with_default(false)
    .prompt()
    .map_err(anyhow::Error::from)
}
