use std::io;
use std::path::PathBuf;
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::catalog::{CandidateDirs, PlatformProfile, WhitelistSet};

/// Files below this size survive `optimize_disk` unless the caller asks
/// for small files too.
const SMALL_FILE_BYTES: u64 = 1024;

/// How many removed paths the summary keeps as a sample.
const REMOVED_SAMPLE_LEN: usize = 20;

/// Outcome of `full_optimize`.
#[derive(Debug, Clone)]
pub struct OptimizeSummary {
    pub memory_status: String,
    pub files_removed: usize,
    pub removed_sample: Vec<PathBuf>,
}

/// One-click cleanup over the temp directories only: no classification, no
/// review step, but the whitelist still applies to every path.
pub struct Optimizer {
    whitelist: WhitelistSet,
    temp_dirs: Vec<PathBuf>,
}

impl Optimizer {
    pub fn new() -> Self {
        let profile = PlatformProfile::current();
        let dirs = CandidateDirs::resolve(&profile, &[]);
        Optimizer {
            whitelist: WhitelistSet::resolve(&profile),
            temp_dirs: dirs.temp_dirs,
        }
    }

    pub fn with_catalog(whitelist: WhitelistSet, temp_dirs: Vec<PathBuf>) -> Self {
        Optimizer {
            whitelist,
            temp_dirs,
        }
    }

    /// Permanently remove temp files older than `max_age_days`. Files under
    /// 1 KiB are kept when `delete_small_files` is false. Per-file failures
    /// are swallowed; the returned list holds what was actually removed.
    pub fn optimize_disk(&self, max_age_days: u64, delete_small_files: bool) -> Vec<PathBuf> {
        let age_seconds = max_age_days * 86_400;
        let now = SystemTime::now();
        let mut removed = Vec::new();

        for folder in &self.temp_dirs {
            for entry in WalkDir::new(folder)
                .follow_links(false)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if self.whitelist.contains(path) {
                    continue;
                }
                let meta = match entry.metadata() {
                    Ok(meta) => meta,
                    Err(_) => continue,
                };
                let age = meta
                    .modified()
                    .ok()
                    .and_then(|m| now.duration_since(m).ok())
                    .unwrap_or_default();
                if age.as_secs() < age_seconds {
                    continue;
                }
                if !delete_small_files && meta.len() < SMALL_FILE_BYTES {
                    continue;
                }
                if std::fs::remove_file(path).is_ok() {
                    removed.push(path.to_path_buf());
                }
            }
        }
        removed
    }

    /// Best-effort hint to the OS to release cached memory. On Linux this
    /// syncs pending writes and asks the kernel to drop page and dentry
    /// caches, which needs elevated privileges; elsewhere it refreshes the
    /// process table. Nothing here is load-bearing.
    pub fn optimize_memory(&self) -> io::Result<()> {
        #[cfg(target_os = "linux")]
        {
            unsafe { libc::sync() };
            std::fs::write("/proc/sys/vm/drop_caches", "3")?;
            Ok(())
        }
        #[cfg(not(target_os = "linux"))]
        {
            let mut sys = sysinfo::System::new();
            sys.refresh_processes(sysinfo::ProcessesToUpdate::All, true);
            Ok(())
        }
    }

    /// Memory hint plus disk cleanup, with a compact summary.
    pub fn full_optimize(&self, max_age_days: u64) -> OptimizeSummary {
        let memory_status = match self.optimize_memory() {
            Ok(()) => "Memory optimization completed.".to_string(),
            Err(err) => format!("Memory optimization failed: {err}"),
        };
        let removed = self.optimize_disk(max_age_days, true);
        let removed_sample = removed.iter().take(REMOVED_SAMPLE_LEN).cloned().collect();
        OptimizeSummary {
            memory_status,
            files_removed: removed.len(),
            removed_sample,
        }
    }
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn removes_files_past_the_age_cutoff() {
        let tmp = TempDir::new().unwrap();
        let big = tmp.path().join("big.tmp");
        fs::write(&big, vec![b'x'; 4096]).unwrap();

        let opt = Optimizer::with_catalog(WhitelistSet::default(), vec![tmp.path().to_path_buf()]);
        // Zero days: every existing file is past the cutoff.
        let removed = opt.optimize_disk(0, true);
        assert_eq!(removed.len(), 1);
        assert!(!big.exists());
    }

    #[test]
    fn keeps_fresh_files() {
        let tmp = TempDir::new().unwrap();
        let fresh = tmp.path().join("fresh.tmp");
        fs::write(&fresh, vec![b'x'; 4096]).unwrap();

        let opt = Optimizer::with_catalog(WhitelistSet::default(), vec![tmp.path().to_path_buf()]);
        let removed = opt.optimize_disk(7, true);
        assert!(removed.is_empty());
        assert!(fresh.exists());
    }

    #[test]
    fn small_files_survive_when_asked() {
        let tmp = TempDir::new().unwrap();
        let small = tmp.path().join("small.tmp");
        let big = tmp.path().join("big.tmp");
        fs::write(&small, b"tiny").unwrap();
        fs::write(&big, vec![b'x'; 4096]).unwrap();

        let opt = Optimizer::with_catalog(WhitelistSet::default(), vec![tmp.path().to_path_buf()]);
        let removed = opt.optimize_disk(0, false);
        assert_eq!(removed.len(), 1);
        assert!(small.exists());
        assert!(!big.exists());
    }

    #[test]
    fn whitelisted_temp_files_are_untouched() {
        let tmp = TempDir::new().unwrap();
        let protected = tmp.path().join("protected");
        fs::create_dir(&protected).unwrap();
        let file = protected.join("keep.tmp");
        fs::write(&file, vec![b'x'; 4096]).unwrap();

        let opt = Optimizer::with_catalog(
            WhitelistSet::from_paths(vec![protected.clone()]),
            vec![tmp.path().to_path_buf()],
        );
        let removed = opt.optimize_disk(0, true);
        assert!(removed.is_empty());
        assert!(file.exists());
    }

    #[test]
    fn full_optimize_summarizes_removals() {
        let tmp = TempDir::new().unwrap();
        for i in 0..3 {
            fs::write(tmp.path().join(format!("{i}.tmp")), vec![b'x'; 2048]).unwrap();
        }

        let opt = Optimizer::with_catalog(WhitelistSet::default(), vec![tmp.path().to_path_buf()]);
        let summary = opt.full_optimize(0);
        assert_eq!(summary.files_removed, 3);
        assert_eq!(summary.removed_sample.len(), 3);
        assert!(!summary.memory_status.is_empty());
    }
}
