//! List command implementation.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::ApplicationsDatabase;
use crate::config::settings::CUSTOM_APPS_DIR;
use crate::storage;

/// Print every known application (bundled and user-defined).
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or a
/// definition file fails to parse.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let home = storage::resolve_home(global.home.as_deref())?;
    let db = ApplicationsDatabase::load(&home.join(CUSTOM_APPS_DIR))?;

    println!("Supported applications:");
    for (id, def) in db.iter() {
        println!(" - {id} ({})", def.name);
    }
    println!();
    println!(
        "{} applications supported in homesync v{}",
        db.len(),
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
