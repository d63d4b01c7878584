//! Restore command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, OpOpts};
use crate::logging::Logger;
use crate::resources::Operation;
use crate::storage;

/// Run the restore command.
///
/// # Errors
///
/// Returns an error if setup fails or the storage root does not exist.
/// Per-path failures are reported in the summary instead.
pub fn run(global: &GlobalOpts, opts: &OpOpts, log: &Logger) -> Result<()> {
    let setup = super::CommandSetup::init(global, log)?;
    let root = storage::require_restore_root(&setup.storage_root)?;

    super::run_operation(&setup, &root, Operation::Restore, opts, global.dry_run, log);
    Ok(())
}
