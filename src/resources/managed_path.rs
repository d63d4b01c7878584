//! One managed path: classification against the live filesystem and the
//! three mutations.
use std::fs;
use std::path::{Path, PathBuf};

use super::{LinkState, Operation};
use crate::error::PathError;

/// A single file or directory managed for one application.
///
/// Combines the two roots with a path relative to the home directory.
/// Ephemeral: created per path per invocation and discarded afterwards.
#[derive(Debug, Clone, Copy)]
pub struct ManagedPath<'a> {
    home: &'a Path,
    storage: &'a Path,
    rel: &'a Path,
}

impl<'a> ManagedPath<'a> {
    /// Create a managed path from the home root, storage root, and a
    /// home-relative path.
    #[must_use]
    pub const fn new(home: &'a Path, storage: &'a Path, rel: &'a Path) -> Self {
        Self { home, storage, rel }
    }

    /// The relative path this value manages.
    #[must_use]
    pub const fn rel(&self) -> &Path {
        self.rel
    }

    /// Absolute location in the home tree.
    #[must_use]
    pub fn home_path(&self) -> PathBuf {
        self.home.join(self.rel)
    }

    /// Absolute location of the storage copy.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage.join(self.rel)
    }

    /// Classify this path against the live filesystem.
    ///
    /// Symlink status of the home entry is checked first, so a symlink is
    /// never treated as the file or directory it points at. Storage presence
    /// is any entry at all (including a symlink someone placed there).
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Filesystem`] if metadata cannot be read for a
    /// reason other than the entry being absent.
    pub fn classify(&self) -> Result<LinkState, PathError> {
        let home_p = self.home_path();
        let storage_p = self.storage_path();
        let storage_present = entry_present(&storage_p);

        match fs::symlink_metadata(&home_p) {
            Ok(meta) if meta.is_symlink() => {
                let target =
                    fs::read_link(&home_p).map_err(|e| PathError::io(home_p.clone(), e))?;
                if paths_equal(&target, &storage_p) {
                    if storage_present {
                        Ok(LinkState::AlreadyLinkedToStorage)
                    } else {
                        Ok(LinkState::BrokenLinkToStorage)
                    }
                } else {
                    Ok(LinkState::ForeignLink {
                        storage_exists: storage_present,
                    })
                }
            }
            Ok(_) => {
                if storage_present {
                    Ok(LinkState::Conflict)
                } else {
                    Ok(LinkState::RealFileInHome)
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if storage_present {
                    Ok(LinkState::OnlyInStorage)
                } else {
                    Ok(LinkState::AbsentEverywhere)
                }
            }
            Err(e) => Err(PathError::io(home_p, e)),
        }
    }

    /// One-line description of what performing `op` would do, for dry-run
    /// and verbose output.
    #[must_use]
    pub fn describe(&self, op: Operation) -> String {
        let home_p = self.home_path();
        let storage_p = self.storage_path();
        match op {
            Operation::Backup => format!(
                "move {} to {} and link it back",
                home_p.display(),
                storage_p.display()
            ),
            Operation::Restore => {
                format!("link {} -> {}", home_p.display(), storage_p.display())
            }
            Operation::Uninstall => format!(
                "unlink {} and move {} back",
                home_p.display(),
                storage_p.display()
            ),
        }
    }

    /// Perform `op`, assuming its preconditions were just checked via
    /// [`classify`](Self::classify) and [`decide`](super::decide).
    ///
    /// Mutations use `rename` only; content is never copied or rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Filesystem`] on any I/O failure. The caller is
    /// expected to report it and continue with the next path.
    pub fn perform(&self, op: Operation) -> Result<(), PathError> {
        match op {
            Operation::Backup => self.do_backup(),
            Operation::Restore => self.do_restore(),
            Operation::Uninstall => self.do_uninstall(),
        }
    }

    /// Move the home entry into storage, then link the home path to it.
    fn do_backup(&self) -> Result<(), PathError> {
        let home_p = self.home_path();
        let storage_p = self.storage_path();

        if let Some(parent) = storage_p.parent() {
            fs::create_dir_all(parent).map_err(|e| PathError::io(parent.to_path_buf(), e))?;
        }
        fs::rename(&home_p, &storage_p).map_err(|e| PathError::io(home_p.clone(), e))?;
        create_symlink(&storage_p, &home_p).map_err(|e| PathError::io(home_p, e))?;
        Ok(())
    }

    /// Link the home path to the existing storage copy.
    fn do_restore(&self) -> Result<(), PathError> {
        let home_p = self.home_path();
        let storage_p = self.storage_path();

        if let Some(parent) = home_p.parent() {
            fs::create_dir_all(parent).map_err(|e| PathError::io(parent.to_path_buf(), e))?;
        }
        create_symlink(&storage_p, &home_p).map_err(|e| PathError::io(home_p, e))?;
        Ok(())
    }

    /// Remove the home symlink and move the storage copy back into place.
    fn do_uninstall(&self) -> Result<(), PathError> {
        let home_p = self.home_path();
        let storage_p = self.storage_path();

        remove_symlink(&home_p).map_err(|e| PathError::io(home_p.clone(), e))?;
        fs::rename(&storage_p, &home_p).map_err(|e| PathError::io(storage_p, e))?;
        Ok(())
    }
}

/// True if any entry (file, directory, or symlink) sits at `path`.
fn entry_present(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    let s = p.to_string_lossy();
    s.strip_prefix(r"\\?\")
        .map_or_else(|| p.to_path_buf(), PathBuf::from)
}

/// Create a symlink at `link` pointing to `target` (platform-specific).
fn create_symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not
/// `remove_file`). Rust's `symlink_metadata().is_dir()` returns `false` for
/// symlinks, so the raw `FILE_ATTRIBUTE_DIRECTORY` flag is checked instead.
fn remove_symlink(path: &Path) -> std::io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Check if metadata represents a directory-like entry.
fn is_dir_like(meta: &fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{Decision, decide};

    struct Roots {
        _dir: tempfile::TempDir,
        home: PathBuf,
        storage: PathBuf,
    }

    fn roots() -> Roots {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let storage = dir.path().join("storage");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&storage).unwrap();
        Roots {
            _dir: dir,
            home,
            storage,
        }
    }

    #[test]
    fn paths_equal_plain() {
        assert!(paths_equal(
            Path::new("/tmp/storage/.vimrc"),
            Path::new("/tmp/storage/.vimrc")
        ));
        assert!(!paths_equal(
            Path::new("/tmp/storage/.vimrc"),
            Path::new("/tmp/other/.vimrc")
        ));
    }

    #[test]
    fn paths_equal_with_unc_prefix() {
        assert!(paths_equal(
            Path::new(r"\\?\C:\sync\.vimrc"),
            Path::new(r"C:\sync\.vimrc")
        ));
    }

    #[test]
    fn classify_absent_everywhere() {
        let r = roots();
        let rel = Path::new(".vimrc");
        let mp = ManagedPath::new(&r.home, &r.storage, rel);
        assert_eq!(mp.classify().unwrap(), LinkState::AbsentEverywhere);
    }

    #[test]
    fn classify_real_file_in_home() {
        let r = roots();
        fs::write(r.home.join(".vimrc"), "X").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        assert_eq!(mp.classify().unwrap(), LinkState::RealFileInHome);
    }

    #[test]
    fn classify_directory_like_file() {
        let r = roots();
        fs::create_dir(r.home.join(".vim")).unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vim"));
        assert_eq!(mp.classify().unwrap(), LinkState::RealFileInHome);
    }

    #[test]
    fn classify_conflict() {
        let r = roots();
        fs::write(r.home.join(".vimrc"), "X").unwrap();
        fs::write(r.storage.join(".vimrc"), "Y").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        assert_eq!(mp.classify().unwrap(), LinkState::Conflict);
    }

    #[test]
    fn classify_only_in_storage() {
        let r = roots();
        fs::write(r.storage.join(".vimrc"), "Y").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        assert_eq!(mp.classify().unwrap(), LinkState::OnlyInStorage);
    }

    #[cfg(unix)]
    #[test]
    fn classify_already_linked() {
        let r = roots();
        fs::write(r.storage.join(".vimrc"), "X").unwrap();
        std::os::unix::fs::symlink(r.storage.join(".vimrc"), r.home.join(".vimrc")).unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        assert_eq!(mp.classify().unwrap(), LinkState::AlreadyLinkedToStorage);
    }

    #[cfg(unix)]
    #[test]
    fn classify_broken_link_to_storage() {
        let r = roots();
        std::os::unix::fs::symlink(r.storage.join(".vimrc"), r.home.join(".vimrc")).unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        assert_eq!(mp.classify().unwrap(), LinkState::BrokenLinkToStorage);
    }

    #[cfg(unix)]
    #[test]
    fn classify_foreign_link() {
        let r = roots();
        fs::write(r.home.join("other"), "Z").unwrap();
        std::os::unix::fs::symlink(r.home.join("other"), r.home.join(".vimrc")).unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        assert_eq!(
            mp.classify().unwrap(),
            LinkState::ForeignLink {
                storage_exists: false
            }
        );

        fs::write(r.storage.join(".vimrc"), "Y").unwrap();
        assert_eq!(
            mp.classify().unwrap(),
            LinkState::ForeignLink {
                storage_exists: true
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn classify_broken_foreign_link() {
        let r = roots();
        std::os::unix::fs::symlink(r.home.join("gone"), r.home.join(".vimrc")).unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        assert_eq!(
            mp.classify().unwrap(),
            LinkState::ForeignLink {
                storage_exists: false
            }
        );
    }

    #[cfg(unix)]
    #[test]
    fn backup_moves_and_links() {
        let r = roots();
        fs::write(r.home.join(".vimrc"), "X").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));

        mp.perform(Operation::Backup).unwrap();

        let meta = fs::symlink_metadata(r.home.join(".vimrc")).unwrap();
        assert!(meta.is_symlink());
        assert_eq!(
            fs::read_link(r.home.join(".vimrc")).unwrap(),
            r.storage.join(".vimrc")
        );
        assert_eq!(fs::read_to_string(r.storage.join(".vimrc")).unwrap(), "X");
        assert_eq!(mp.classify().unwrap(), LinkState::AlreadyLinkedToStorage);
    }

    #[cfg(unix)]
    #[test]
    fn backup_creates_storage_parents() {
        let r = roots();
        let rel = Path::new(".config/htop/htoprc");
        fs::create_dir_all(r.home.join(".config/htop")).unwrap();
        fs::write(r.home.join(rel), "cfg").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, rel);

        mp.perform(Operation::Backup).unwrap();

        assert_eq!(fs::read_to_string(r.storage.join(rel)).unwrap(), "cfg");
        assert_eq!(mp.classify().unwrap(), LinkState::AlreadyLinkedToStorage);
    }

    #[cfg(unix)]
    #[test]
    fn backup_moves_directories_whole() {
        let r = roots();
        fs::create_dir_all(r.home.join(".vim/colors")).unwrap();
        fs::write(r.home.join(".vim/colors/mine.vim"), "hi").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vim"));

        mp.perform(Operation::Backup).unwrap();

        assert!(fs::symlink_metadata(r.home.join(".vim"))
            .unwrap()
            .is_symlink());
        assert_eq!(
            fs::read_to_string(r.storage.join(".vim/colors/mine.vim")).unwrap(),
            "hi"
        );
        // content is reachable through the link as well
        assert_eq!(
            fs::read_to_string(r.home.join(".vim/colors/mine.vim")).unwrap(),
            "hi"
        );
    }

    #[cfg(unix)]
    #[test]
    fn restore_links_home_to_storage() {
        let r = roots();
        fs::write(r.storage.join(".vimrc"), "Y").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));

        mp.perform(Operation::Restore).unwrap();

        assert_eq!(
            fs::read_link(r.home.join(".vimrc")).unwrap(),
            r.storage.join(".vimrc")
        );
        assert_eq!(fs::read_to_string(r.home.join(".vimrc")).unwrap(), "Y");
    }

    #[cfg(unix)]
    #[test]
    fn restore_creates_home_parents() {
        let r = roots();
        let rel = Path::new(".config/git/config");
        fs::create_dir_all(r.storage.join(".config/git")).unwrap();
        fs::write(r.storage.join(rel), "[user]").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, rel);

        mp.perform(Operation::Restore).unwrap();

        assert_eq!(fs::read_to_string(r.home.join(rel)).unwrap(), "[user]");
    }

    #[cfg(unix)]
    #[test]
    fn uninstall_restores_real_file() {
        let r = roots();
        fs::write(r.home.join(".vimrc"), "X").unwrap();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        mp.perform(Operation::Backup).unwrap();

        mp.perform(Operation::Uninstall).unwrap();

        let meta = fs::symlink_metadata(r.home.join(".vimrc")).unwrap();
        assert!(!meta.is_symlink());
        assert!(meta.is_file());
        assert_eq!(fs::read_to_string(r.home.join(".vimrc")).unwrap(), "X");
        assert!(!entry_present(&r.storage.join(".vimrc")));
    }

    #[cfg(unix)]
    #[test]
    fn full_cycle_decisions_match_filesystem() {
        let r = roots();
        fs::write(r.home.join(".vimrc"), "X").unwrap();
        let rel = Path::new(".vimrc");
        let mp = ManagedPath::new(&r.home, &r.storage, rel);

        // unmanaged -> managed
        assert!(matches!(
            decide(Operation::Backup, &mp.classify().unwrap(), rel),
            Decision::Perform
        ));
        mp.perform(Operation::Backup).unwrap();

        // second backup is a no-op
        assert!(matches!(
            decide(Operation::Backup, &mp.classify().unwrap(), rel),
            Decision::AlreadyDone
        ));

        // managed -> unmanaged
        assert!(matches!(
            decide(Operation::Uninstall, &mp.classify().unwrap(), rel),
            Decision::Perform
        ));
        mp.perform(Operation::Uninstall).unwrap();

        // second uninstall has nothing to undo
        assert!(matches!(
            decide(Operation::Uninstall, &mp.classify().unwrap(), rel),
            Decision::Skip { .. }
        ));
    }

    #[test]
    fn describe_mentions_both_locations() {
        let r = roots();
        let mp = ManagedPath::new(&r.home, &r.storage, Path::new(".vimrc"));
        for op in [Operation::Backup, Operation::Restore, Operation::Uninstall] {
            let d = mp.describe(op);
            assert!(d.contains(".vimrc"), "description should name the path: {d}");
        }
    }
}
