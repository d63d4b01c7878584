//! Core logging types: application entries, status, and the [`Log`] trait.

/// Per-application result for summary reporting.
#[derive(Debug, Clone)]
pub struct AppEntry {
    /// Application display name.
    pub name: String,
    /// Final status of the application's run.
    pub status: AppStatus,
    /// Optional detail message (e.g., skip reason or failure counts).
    pub message: Option<String>,
}

/// Status of one application after an operation ran over its paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppStatus {
    /// At least one path changed (or everything was already in place).
    Ok,
    /// No matching files were found; nothing to do.
    Skipped,
    /// The operation ran in dry-run mode; no changes were applied.
    DryRun,
    /// One or more paths failed with a filesystem error.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production implementation; tests
/// substitute a capturing implementation so that profile and command code can
/// log without knowing where output goes.
pub trait Log {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (shown on console only with `--verbose`).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record an application result for the summary.
    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_status_equality() {
        assert_eq!(AppStatus::Ok, AppStatus::Ok);
        assert_ne!(AppStatus::Ok, AppStatus::Failed);
        assert_ne!(AppStatus::Skipped, AppStatus::DryRun);
    }

    #[test]
    fn app_entry_clone() {
        let entry = AppEntry {
            name: "Vim".to_string(),
            status: AppStatus::Ok,
            message: Some("2 changed".to_string()),
        };
        let cloned = entry.clone();
        assert_eq!(cloned.name, entry.name);
        assert_eq!(cloned.status, entry.status);
        assert_eq!(cloned.message, entry.message);
    }
}
