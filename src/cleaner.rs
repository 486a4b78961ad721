use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::catalog::{PlatformProfile, WhitelistSet};

/// What happened (or, under dry run, would happen) to one disposed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposeAction {
    /// Moved to the platform trash; recoverable.
    Trashed,
    /// Permanently removed.
    Deleted,
    /// Dry-run verdict when no trash mechanism exists and force was not
    /// given: the real run would refuse.
    WouldDeleteButNoTrash,
}

impl DisposeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            DisposeAction::Trashed => "trashed",
            DisposeAction::Deleted => "deleted",
            DisposeAction::WouldDeleteButNoTrash => "would_delete_but_no_trash",
        }
    }
}

impl fmt::Display for DisposeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why one path could not be disposed of. Collected per path; one failure
/// never aborts the rest of the batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisposeError {
    #[error("no longer exists")]
    NotFound,
    /// The path sits under a protected system path. This should have been
    /// filtered out long before disposal; refusing here is the last line.
    #[error("refusing to touch a protected system path")]
    UnsafeTarget,
    /// No recoverable-delete mechanism and force not set. Permanent
    /// deletion requires explicit opt-in.
    #[error("trash unavailable; pass force to delete permanently")]
    RecoveryUnavailable,
    #[error("{0}")]
    Os(String),
}

/// Moves approved paths to the platform trash, or permanently removes them
/// when explicitly forced. Holds its own copy of the whitelist as a hard
/// refusal boundary independent of whatever produced the path list.
pub struct Disposer {
    whitelist: WhitelistSet,
    use_trash: bool,
}

impl Disposer {
    pub fn new() -> Self {
        Self::with_whitelist(WhitelistSet::resolve(&PlatformProfile::current()))
    }

    pub fn with_whitelist(whitelist: WhitelistSet) -> Self {
        Disposer {
            whitelist,
            use_trash: trash_supported(),
        }
    }

    /// Override trash availability, e.g. for headless hosts without a
    /// trash daemon.
    pub fn with_trash(mut self, use_trash: bool) -> Self {
        self.use_trash = use_trash;
        self
    }

    pub fn uses_trash(&self) -> bool {
        self.use_trash
    }

    /// Dispose of each path in order. Returns the successful actions and
    /// the per-path errors side by side so partial success stays
    /// representable; nothing is ever thrown.
    pub fn dispose(
        &self,
        paths: &[PathBuf],
        dry_run: bool,
        force: bool,
    ) -> (Vec<(PathBuf, DisposeAction)>, Vec<(PathBuf, DisposeError)>) {
        let mut results = Vec::new();
        let mut errors = Vec::new();
        for path in paths {
            match self.dispose_one(path, dry_run, force) {
                Ok(action) => results.push((path.clone(), action)),
                Err(err) => errors.push((path.clone(), err)),
            }
        }
        (results, errors)
    }

    fn dispose_one(
        &self,
        path: &Path,
        dry_run: bool,
        force: bool,
    ) -> Result<DisposeAction, DisposeError> {
        // The whitelist check comes first: not even force overrides it.
        if self.whitelist.contains(path) {
            return Err(DisposeError::UnsafeTarget);
        }
        if !path.exists() {
            return Err(DisposeError::NotFound);
        }

        if dry_run {
            return Ok(if self.use_trash {
                DisposeAction::Trashed
            } else if force {
                DisposeAction::Deleted
            } else {
                DisposeAction::WouldDeleteButNoTrash
            });
        }

        if self.use_trash {
            trash::delete(path).map_err(|e| DisposeError::Os(e.to_string()))?;
            return Ok(DisposeAction::Trashed);
        }
        if !force {
            return Err(DisposeError::RecoveryUnavailable);
        }
        remove_permanently(path).map_err(|e| DisposeError::Os(e.to_string()))?;
        Ok(DisposeAction::Deleted)
    }
}

impl Default for Disposer {
    fn default() -> Self {
        Self::new()
    }
}

fn trash_supported() -> bool {
    // The trash crate covers the desktop platforms we run on; anything
    // else falls back to the force-gated permanent path.
    cfg!(any(
        target_os = "windows",
        target_os = "macos",
        target_os = "linux",
        target_os = "freebsd"
    ))
}

/// Permanent removal; directories go children-first.
fn remove_permanently(path: &Path) -> std::io::Result<()> {
    if path.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}
