// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed home/storage pair so each test can
// exercise the profile operations against an isolated filesystem without
// repeating boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use homesync::logging::Logger;
use homesync::profile::{ApplicationProfile, ProfileStats};
use homesync::resources::Operation;

/// An isolated home + storage tree backed by a [`tempfile::TempDir`].
///
/// Both directories are deleted when the value is dropped.
pub struct SyncEnv {
    _tmp: tempfile::TempDir,
    /// Home root for the test.
    pub home: PathBuf,
    /// Storage root for the test.
    pub storage: PathBuf,
    log: Logger,
}

impl SyncEnv {
    /// Create a fresh environment with empty home and storage roots.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let home = tmp.path().join("home");
        let storage = tmp.path().join("storage");
        fs::create_dir_all(&home).expect("create home root");
        fs::create_dir_all(&storage).expect("create storage root");
        Self {
            _tmp: tmp,
            home,
            storage,
            log: Logger::new("test"),
        }
    }

    /// Absolute path of `rel` under the home root.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Absolute path of `rel` under the storage root.
    pub fn storage_path(&self, rel: &str) -> PathBuf {
        self.storage.join(rel)
    }

    /// Write a file (creating parents) under the home root.
    pub fn write_home(&self, rel: &str, content: &str) {
        write_with_parents(&self.home_path(rel), content);
    }

    /// Write a file (creating parents) under the storage root.
    pub fn write_storage(&self, rel: &str, content: &str) {
        write_with_parents(&self.storage_path(rel), content);
    }

    /// Apply one operation to the given relative paths as an application
    /// named "Test".
    pub fn apply(&self, paths: &[&str], op: Operation, dry_run: bool) -> ProfileStats {
        let paths: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
        let profile = ApplicationProfile {
            name: "Test",
            paths: &paths,
            home: &self.home,
            storage: &self.storage,
            dry_run,
        };
        profile.apply(op, &self.log)
    }

    /// True if the home entry for `rel` is a symlink pointing at the
    /// storage copy.
    pub fn home_links_to_storage(&self, rel: &str) -> bool {
        fs::read_link(self.home_path(rel))
            .map(|target| target == self.storage_path(rel))
            .unwrap_or(false)
    }

    /// True if any entry (including a symlink) exists at the path.
    pub fn entry_exists(path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }
}

fn write_with_parents(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write file");
}
