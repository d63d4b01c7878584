//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{AppEntry, AppStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
///
/// `record_app` is not included because its signature differs from the
/// `fn(&self, &str)` pattern shared by the display methods.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// All messages are written to a persistent log file at
/// `$XDG_CACHE_HOME/homesync/<command>.log` (default
/// `~/.cache/homesync/<command>.log`) with timestamps and ANSI codes
/// stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    apps: Mutex<Vec<AppEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber);
    /// this constructor does not write to it.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            apps: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return a clone of all recorded application entries (test-only).
    #[cfg(test)]
    pub(crate) fn app_entries(&self) -> Vec<AppEntry> {
        self.apps.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "homesync::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "homesync::dry_run", "{msg}");
    }

    /// Record an application result for the summary.
    pub fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.apps.lock() {
            guard.push(AppEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Count the number of failed applications.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.apps.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|a| a.status == AppStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded applications.
    pub fn print_summary(&self) {
        let apps = match self.apps.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return,
        };
        if apps.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for app in &apps {
            let (icon, color) = match app.status {
                AppStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                AppStatus::Skipped => {
                    skipped += 1;
                    ("·", "\x1b[2m")
                }
                AppStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                AppStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = app
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", app.name));
        }

        let total = ok + skipped + dry_run + failed;
        self.info(&format!(
            "{total} applications: \x1b[32m{ok} ok\x1b[0m, \x1b[2m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_app(&self, name: &str, status: AppStatus, message: Option<&str>) {
        self.record_app(name, status, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_starts_empty() {
        let log = Logger::new("test");
        assert!(log.app_entries().is_empty());
    }

    #[test]
    fn record_app_ok() {
        let log = Logger::new("test");
        log.record_app("Vim", AppStatus::Ok, None);
        let apps = log.app_entries();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Vim");
        assert_eq!(apps[0].status, AppStatus::Ok);
    }

    #[test]
    fn record_app_with_message() {
        let log = Logger::new("test");
        log.record_app("Git", AppStatus::Skipped, Some("no matching files"));
        assert_eq!(
            log.app_entries()[0].message,
            Some("no matching files".to_string())
        );
    }

    #[test]
    fn failure_count_counts_only_failures() {
        let log = Logger::new("test");
        assert_eq!(log.failure_count(), 0);
        log.record_app("a", AppStatus::Ok, None);
        log.record_app("b", AppStatus::Failed, Some("1 path failed"));
        log.record_app("c", AppStatus::Failed, Some("2 paths failed"));
        log.record_app("d", AppStatus::Skipped, None);
        assert_eq!(log.failure_count(), 2);
    }

    #[test]
    fn log_trait_delegates_to_logger() {
        let log = Logger::new("test");
        let log_ref: &dyn Log = &log;
        log_ref.record_app("via-trait", AppStatus::DryRun, None);
        assert_eq!(log.app_entries().len(), 1);
    }
}
