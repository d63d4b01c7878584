//! Backup command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, OpOpts};
use crate::logging::Logger;
use crate::resources::Operation;
use crate::storage;

/// Run the backup command.
///
/// # Errors
///
/// Returns an error if setup fails or the storage root cannot be prepared.
/// Per-path failures are reported in the summary instead.
pub fn run(global: &GlobalOpts, opts: &OpOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;

    // A dry run must not create the storage directory either.
    let root = if global.dry_run {
        setup.storage_root.clone()
    } else {
        storage::prepare_backup_root(&setup.storage_root)?
    };

    super::run_operation(&setup, &root, Operation::Backup, opts, global.dry_run, log);
    Ok(())
}
