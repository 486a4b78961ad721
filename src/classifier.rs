use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::catalog::{CandidateDirs, WhitelistSet};
use crate::utils;

/// Files at or above this size are treated as oversized leftovers even when
/// the caller's size threshold is lower.
pub const LARGE_FILE_FLOOR: u64 = 20 * 1024 * 1024;

/// Disposable-by-extension artifacts: editor swaps, partial downloads,
/// rotated logs and friends.
const JUNK_EXTENSIONS: &[&str] = &[
    "tmp",
    "log",
    "bak",
    "old",
    "crdownload",
    "part",
    "cache",
    "swp",
    "~",
    "trashinfo",
];

/// Executable/installer-like extensions. Flagged only inside download or
/// temp zones; anywhere else they are assumed to be installed software.
const DANGEROUS_EXTENSIONS: &[&str] = &[
    "exe", "msi", "bat", "cmd", "ps1", "vbs", "scr", "jar", "apk", "dmg", "pkg",
];

/// Script extensions that warrant review when sitting in download or temp
/// zones.
const SUSPICIOUS_EXTENSIONS: &[&str] = &["sh", "py", "pl", "rb"];

/// The classification outcome for one file. Categories are mutually
/// exclusive per scan; a file matching none of them is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Junk,
    Large,
    Suspicious,
    Harmful,
    Skipped,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Junk,
        Category::Large,
        Category::Suspicious,
        Category::Harmful,
        Category::Skipped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Junk => "junk",
            Category::Large => "large",
            Category::Suspicious => "suspicious",
            Category::Harmful => "harmful",
            Category::Skipped => "skipped",
        }
    }

    pub fn parse(name: &str) -> Option<Category> {
        match name.to_lowercase().as_str() {
            "junk" => Some(Category::Junk),
            "large" => Some(Category::Large),
            "suspicious" => Some(Category::Suspicious),
            "harmful" => Some(Category::Harmful),
            "skipped" => Some(Category::Skipped),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one file, captured for the duration of a single
/// classification decision.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

impl FileRecord {
    /// Stat `path` without following symlinks.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::symlink_metadata(path)?;
        Ok(FileRecord {
            path: path.to_path_buf(),
            size: meta.len(),
            modified: meta.modified()?,
        })
    }

    /// Time since last modification. A timestamp in the future counts as
    /// age zero, which keeps such files on the too-fresh side of the gate.
    pub fn age(&self, now: SystemTime) -> Duration {
        now.duration_since(self.modified).unwrap_or_default()
    }
}

/// Decide which category, if any, a file belongs to. First match wins and
/// the rule order is part of the contract: the whitelist outranks
/// everything, the age gate outranks every extension rule, and extension
/// rules outrank the size fallback.
pub fn classify(
    record: &FileRecord,
    whitelist: &WhitelistSet,
    dirs: &CandidateDirs,
    age_threshold_secs: Option<u64>,
    size_threshold_bytes: Option<u64>,
) -> Option<Category> {
    let path = utils::normalize_path(&record.path);

    if whitelist.contains(&path) {
        return Some(Category::Skipped);
    }

    if let Some(min_age) = age_threshold_secs {
        if record.age(SystemTime::now()).as_secs() < min_age {
            return None;
        }
    }

    if let Some(ext) = extension_of(&path) {
        let ext = ext.as_str();
        if DANGEROUS_EXTENSIONS.contains(&ext) {
            return Some(if dirs.in_download_or_temp(&path) {
                Category::Harmful
            } else {
                // An executable outside the known drop zones is most likely
                // installed software. Never flag it.
                Category::Skipped
            });
        }
        if SUSPICIOUS_EXTENSIONS.contains(&ext) {
            return dirs
                .in_download_or_temp(&path)
                .then_some(Category::Suspicious);
        }
        if JUNK_EXTENSIONS.contains(&ext) {
            if let Some(min_size) = size_threshold_bytes {
                if record.size < min_size {
                    return None;
                }
            }
            return Some(Category::Junk);
        }
    }

    if let Some(threshold) = size_threshold_bytes {
        if record.size >= threshold.max(LARGE_FILE_FLOOR) {
            if dirs.in_download_or_temp(&path) {
                return Some(Category::Large);
            }
            if dirs.in_browser_cache(&path) {
                return Some(Category::Junk);
            }
        }
    }

    None
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_lowercase())
}
