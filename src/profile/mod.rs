//! Per-application unit of work: apply one operation to every managed path.
use std::path::{Path, PathBuf};

use crate::logging::{AppStatus, Log};
use crate::resources::{Decision, ManagedPath, Operation, decide};

/// One application's profile for a single invocation.
///
/// Combines the application's ordered path list with the two roots and the
/// dry-run flag. Created fresh per operation call; holds no state across
/// applications.
#[derive(Debug, Clone, Copy)]
pub struct ApplicationProfile<'a> {
    /// Application display name (for log lines).
    pub name: &'a str,
    /// Ordered, deduplicated home-relative paths.
    pub paths: &'a [PathBuf],
    /// Home root directory.
    pub home: &'a Path,
    /// Storage root directory.
    pub storage: &'a Path,
    /// When true, report actions without performing them.
    pub dry_run: bool,
}

/// Per-path outcome counts for one application run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileStats {
    /// Paths that changed (or would change, in dry-run mode).
    pub changed: u32,
    /// Paths already in the desired end state.
    pub already_ok: u32,
    /// Paths skipped because preconditions did not hold.
    pub skipped: u32,
    /// Paths that hit a filesystem error.
    pub failed: u32,
}

impl ProfileStats {
    /// Summary status and message for the run report.
    #[must_use]
    pub fn app_status(&self, dry_run: bool) -> (AppStatus, String) {
        if self.failed > 0 {
            return (AppStatus::Failed, format!("{} path(s) failed", self.failed));
        }
        if dry_run && self.changed > 0 {
            return (AppStatus::DryRun, format!("{} would change", self.changed));
        }
        if self.changed > 0 || self.already_ok > 0 {
            return (
                AppStatus::Ok,
                format!(
                    "{} changed, {} already ok, {} skipped",
                    self.changed, self.already_ok, self.skipped
                ),
            );
        }
        (AppStatus::Skipped, "no matching files".to_string())
    }
}

impl ApplicationProfile<'_> {
    /// Apply `op` to every path of this application, independently.
    ///
    /// Each path is classified against the live filesystem, decided, and
    /// (outside dry-run) performed. A failure on one path is reported and
    /// the loop continues; nothing aborts the batch.
    pub fn apply(&self, op: Operation, log: &dyn Log) -> ProfileStats {
        let mut stats = ProfileStats::default();

        for rel in self.paths {
            let mp = ManagedPath::new(self.home, self.storage, rel);

            let state = match mp.classify() {
                Ok(state) => state,
                Err(e) => {
                    log.error(&format!("{}: {e}", self.name));
                    stats.failed += 1;
                    continue;
                }
            };

            match decide(op, &state, rel) {
                Decision::AlreadyDone => {
                    log.debug(&format!("ok: {} (already linked)", rel.display()));
                    stats.already_ok += 1;
                }
                Decision::Skip { error, warn } => {
                    if warn {
                        log.warn(&format!("skipping {error}"));
                    } else {
                        log.debug(&format!("skipping {error}"));
                    }
                    stats.skipped += 1;
                }
                Decision::Perform => {
                    if self.dry_run {
                        log.dry_run(&format!("would {}", mp.describe(op)));
                        stats.changed += 1;
                        continue;
                    }
                    match mp.perform(op) {
                        Ok(()) => {
                            log.debug(&mp.describe(op));
                            stats.changed += 1;
                        }
                        Err(e) => {
                            log.error(&format!("{}: {e}", self.name));
                            stats.failed += 1;
                        }
                    }
                }
            }
        }

        stats
    }
}
