//! Idempotent per-path primitives (classify + decide + perform pattern).
//!
//! Every operation on a managed path follows the same shape: inspect the
//! live filesystem ([`ManagedPath::classify`]), derive a decision from the
//! pure table in [`decide`], and only then mutate ([`ManagedPath::perform`]).
//! Dry-run reporting reuses the exact same classification and decision,
//! so a dry run computes what a real run would do without touching anything.

pub mod managed_path;

use std::path::Path;

pub use managed_path::ManagedPath;

use crate::error::PathError;

/// The three state-transition operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Move a real file from home into storage and link back.
    Backup,
    /// Point the home location at an existing storage copy.
    Restore,
    /// Remove the link and move the storage copy back home.
    Uninstall,
}

impl Operation {
    /// Lower-case verb for log messages ("back up", "restore", "uninstall").
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Backup => "back up",
            Self::Restore => "restore",
            Self::Uninstall => "uninstall",
        }
    }

    /// Capitalized name for stage headers.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Backup => "Backup",
            Self::Restore => "Restore",
            Self::Uninstall => "Uninstall",
        }
    }
}

/// Live filesystem classification of one managed path.
///
/// Recomputed from the filesystem on every call; never cached. The
/// classification order is fixed: the home entry's symlink status is
/// inspected first (via `symlink_metadata`, so a symlink is never mistaken
/// for the file or directory it points at, broken or not), then a real home
/// entry is cross-checked against the storage copy, then storage presence
/// alone decides the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Neither the home path nor the storage copy exists.
    AbsentEverywhere,
    /// A real file or directory sits at the home path; storage has nothing.
    RealFileInHome,
    /// Real entries exist at both the home path and the storage copy.
    Conflict,
    /// The home path is a symlink to the storage copy, which exists.
    AlreadyLinkedToStorage,
    /// The home path is a symlink to the storage copy, but the copy is gone.
    BrokenLinkToStorage,
    /// The home path is a symlink pointing somewhere else entirely.
    ForeignLink {
        /// Whether a storage copy exists alongside the foreign link.
        storage_exists: bool,
    },
    /// Only the storage copy exists; the home path is absent.
    OnlyInStorage,
}

/// Outcome of checking an operation's preconditions against a [`LinkState`].
#[derive(Debug)]
pub enum Decision {
    /// Preconditions hold; perform the mutation.
    Perform,
    /// The desired end state is already in place; nothing to do.
    AlreadyDone,
    /// Recoverable skip with a typed reason.
    Skip {
        /// Why the path is skipped.
        error: PathError,
        /// Whether the skip warrants a warning (vs. a quiet debug line).
        warn: bool,
    },
}

/// Derive the decision for `op` on a path currently in `state`.
///
/// Pure function of its inputs; both real runs and dry runs go through it,
/// which is what makes every operation idempotent and dry-run faithful.
#[must_use]
pub fn decide(op: Operation, state: &LinkState, rel: &Path) -> Decision {
    let missing = |detail: &str, warn: bool| Decision::Skip {
        error: PathError::MissingSource {
            path: rel.to_path_buf(),
            detail: detail.to_string(),
        },
        warn,
    };
    let conflict = |detail: &str| Decision::Skip {
        error: PathError::Conflict {
            path: rel.to_path_buf(),
            detail: detail.to_string(),
        },
        warn: true,
    };

    match (op, state) {
        // backup
        (Operation::Backup, LinkState::RealFileInHome) => Decision::Perform,
        (Operation::Backup, LinkState::Conflict) => {
            conflict("a backup already exists in storage; not overwriting it")
        }
        (Operation::Backup, LinkState::AlreadyLinkedToStorage) => Decision::AlreadyDone,
        (
            Operation::Backup,
            LinkState::BrokenLinkToStorage | LinkState::ForeignLink { .. },
        ) => missing("already a symlink; nothing to back up", false),
        (Operation::Backup, LinkState::AbsentEverywhere | LinkState::OnlyInStorage) => {
            missing("nothing to back up", false)
        }

        // restore
        (Operation::Restore, LinkState::OnlyInStorage) => Decision::Perform,
        (Operation::Restore, LinkState::AlreadyLinkedToStorage) => Decision::AlreadyDone,
        (Operation::Restore, LinkState::Conflict) => {
            conflict("a local copy exists; not overwriting it")
        }
        (
            Operation::Restore,
            LinkState::ForeignLink {
                storage_exists: true,
            },
        ) => conflict("an existing symlink points elsewhere; not replacing it"),
        (
            Operation::Restore,
            LinkState::RealFileInHome
            | LinkState::AbsentEverywhere
            | LinkState::BrokenLinkToStorage
            | LinkState::ForeignLink {
                storage_exists: false,
            },
        ) => missing("nothing to restore", false),

        // uninstall
        (Operation::Uninstall, LinkState::AlreadyLinkedToStorage) => Decision::Perform,
        (Operation::Uninstall, LinkState::BrokenLinkToStorage) => {
            missing("the storage copy is missing (broken link)", true)
        }
        (Operation::Uninstall, _) => missing("not managed here; nothing to undo", false),
    }
}
