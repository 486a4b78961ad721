use std::collections::HashMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::catalog::{CandidateDirs, PlatformProfile, WhitelistSet};
use crate::classifier::{classify, Category, FileRecord};
use crate::report::ScanReport;
use crate::utils;

/// Options for one `scan_all` pass.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Minimum age before a file is considered at all. `None` disables the
    /// gate and lets freshly written files through.
    pub age_seconds: Option<u64>,
    /// Junk files below this size are ignored, and the large-file fallback
    /// only fires when this is set. `None` disables both.
    pub size_threshold_bytes: Option<u64>,
    pub include_downloads: bool,
    pub include_browser_cache: bool,
    /// Extra folders to walk this scan, on top of the catalog's candidates.
    pub extra_scan_dirs: Vec<PathBuf>,
    /// Per-category cap on how many paths the report stores.
    pub category_limits: HashMap<Category, usize>,
    /// Carried through to the report untouched; the scanner itself never
    /// deletes anything either way.
    pub dry_run: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            age_seconds: Some(86_400),
            size_threshold_bytes: Some(1024),
            include_downloads: false,
            include_browser_cache: true,
            extra_scan_dirs: Vec::new(),
            category_limits: HashMap::new(),
            dry_run: true,
        }
    }
}

/// The walker/aggregator. Resolves the path catalog once at construction;
/// each `scan_all` call walks independently and produces its own report, so
/// a `Scanner` can be shared freely across sequential scans.
pub struct Scanner {
    whitelist: WhitelistSet,
    dirs: CandidateDirs,
}

impl Scanner {
    /// Catalog from the current platform and environment. `extra_dirs`
    /// join the temp set permanently for this scanner.
    pub fn new(extra_dirs: &[PathBuf]) -> Self {
        let profile = PlatformProfile::current();
        Scanner {
            whitelist: WhitelistSet::resolve(&profile),
            dirs: CandidateDirs::resolve(&profile, extra_dirs),
        }
    }

    /// Scanner over a caller-supplied catalog.
    pub fn with_catalog(whitelist: WhitelistSet, dirs: CandidateDirs) -> Self {
        Scanner { whitelist, dirs }
    }

    pub fn whitelist(&self) -> &WhitelistSet {
        &self.whitelist
    }

    pub fn dirs(&self) -> &CandidateDirs {
        &self.dirs
    }

    /// Walk every effective candidate folder, classify each file, and
    /// aggregate the outcome. Always completes with a report; inaccessible
    /// folders and unreadable entries are recorded as errors, never raised.
    pub fn scan_all(&self, options: &ScanOptions) -> ScanReport {
        let mut report = ScanReport::new(options.dry_run);
        report.whitelist_paths = self.whitelist.paths().to_vec();
        report.download_dirs = self.dirs.download_dirs.clone();
        report.browser_cache_dirs = self.dirs.browser_cache_dirs.clone();

        let folders = self.effective_folders(options);
        for folder in &folders {
            self.walk_folder(folder, options, &mut report);
        }
        report.scanned_folders = folders;
        report
    }

    /// temp ∪ browser-cache (if requested) ∪ downloads (if requested) ∪
    /// per-call extras; de-duplicated first-seen, existing dirs only.
    fn effective_folders(&self, options: &ScanOptions) -> Vec<PathBuf> {
        let mut folders = self.dirs.temp_dirs.clone();
        if options.include_browser_cache {
            folders.extend(self.dirs.browser_cache_dirs.iter().cloned());
        }
        if options.include_downloads {
            folders.extend(self.dirs.download_dirs.iter().cloned());
        }
        folders.extend(options.extra_scan_dirs.iter().cloned());
        utils::existing_deduped(folders)
    }

    fn walk_folder(&self, folder: &Path, options: &ScanOptions, report: &mut ScanReport) {
        let whitelist = &self.whitelist;
        let walker = WalkDir::new(folder)
            .follow_links(false)
            .into_iter()
            // Whitelisted subtrees are pruned outright, not just skipped
            // file by file.
            .filter_entry(|e| !(e.file_type().is_dir() && whitelist.contains(e.path())));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    report
                        .errors
                        .push(format!("cannot read entry under {}: {err}", folder.display()));
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let record = match file_record(&entry) {
                Some(record) => record,
                None => {
                    // Unreadable metadata: the file still shows up in the
                    // report, just as skipped.
                    let limit = options.category_limits.get(&Category::Skipped).copied();
                    report.record(Category::Skipped, entry.path().to_path_buf(), 0, limit);
                    continue;
                }
            };

            if let Some(category) = classify(
                &record,
                whitelist,
                &self.dirs,
                options.age_seconds,
                options.size_threshold_bytes,
            ) {
                let limit = options.category_limits.get(&category).copied();
                report.record(category, record.path, record.size, limit);
            }
        }
    }
}

fn file_record(entry: &walkdir::DirEntry) -> Option<FileRecord> {
    let meta = entry.metadata().ok()?;
    let modified = meta.modified().ok()?;
    Some(FileRecord {
        path: entry.path().to_path_buf(),
        size: meta.len(),
        modified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        root: PathBuf,
        scanner: Scanner,
    }

    /// A synthetic catalog: `temp/` and `Downloads/` under a tempdir, with
    /// `temp/protected/` whitelisted.
    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().to_path_buf();
        fs::create_dir(root.join("temp")).unwrap();
        fs::create_dir(root.join("temp").join("protected")).unwrap();
        fs::create_dir(root.join("Downloads")).unwrap();

        let scanner = Scanner::with_catalog(
            WhitelistSet::from_paths(vec![root.join("temp").join("protected")]),
            CandidateDirs {
                temp_dirs: vec![root.join("temp")],
                browser_cache_dirs: vec![],
                download_dirs: vec![root.join("Downloads")],
            },
        );
        Fixture {
            _tmp: tmp,
            root,
            scanner,
        }
    }

    /// No age gate so freshly written fixtures are visible.
    fn options() -> ScanOptions {
        ScanOptions {
            age_seconds: None,
            ..ScanOptions::default()
        }
    }

    fn write(path: &Path, len: usize) {
        fs::write(path, vec![b'x'; len]).unwrap();
    }

    #[test]
    fn finds_junk_in_temp_dirs() {
        let f = fixture();
        write(&f.root.join("temp").join("a.tmp"), 2048);
        write(&f.root.join("temp").join("b.log"), 4096);
        write(&f.root.join("temp").join("note.txt"), 2048);

        let report = f.scanner.scan_all(&options());
        assert_eq!(report.count(Category::Junk), 2);
        assert_eq!(report.bytes(Category::Junk), 6144);
        // Unmatched files are left alone, not reported.
        assert_eq!(report.total_files(), 2);
    }

    #[test]
    fn downloads_only_walked_when_requested() {
        let f = fixture();
        write(&f.root.join("Downloads").join("setup.exe"), 2048);

        let report = f.scanner.scan_all(&options());
        assert_eq!(report.count(Category::Harmful), 0);

        let report = f.scanner.scan_all(&ScanOptions {
            include_downloads: true,
            ..options()
        });
        assert_eq!(report.count(Category::Harmful), 1);
        assert!(report
            .scanned_folders
            .contains(&utils::normalize_path(&f.root.join("Downloads"))));
    }

    #[test]
    fn whitelisted_subtrees_are_never_entered() {
        let f = fixture();
        write(
            &f.root.join("temp").join("protected").join("vital.tmp"),
            4096,
        );
        write(&f.root.join("temp").join("loose.tmp"), 4096);

        let report = f.scanner.scan_all(&options());
        let junk = report.files(Category::Junk);
        assert_eq!(junk.len(), 1);
        assert!(junk[0].ends_with("loose.tmp"));
    }

    #[test]
    fn category_cap_limits_storage_not_count() {
        let f = fixture();
        for i in 0..5 {
            write(&f.root.join("temp").join(format!("{i}.tmp")), 2048);
        }

        let mut opts = options();
        opts.category_limits.insert(Category::Junk, 2);
        let report = f.scanner.scan_all(&opts);
        assert_eq!(report.files(Category::Junk).len(), 2);
        assert_eq!(report.count(Category::Junk), 5);
        assert_eq!(report.bytes(Category::Junk), 4096);
    }

    #[test]
    fn dry_run_scans_are_idempotent() {
        let f = fixture();
        write(&f.root.join("temp").join("a.tmp"), 2048);
        write(&f.root.join("temp").join("big.dat"), 1024);

        let opts = options();
        let first = f.scanner.scan_all(&opts);
        let second = f.scanner.scan_all(&opts);

        assert_eq!(first.scanned_folders, second.scanned_folders);
        for category in Category::ALL {
            assert_eq!(first.files(category), second.files(category));
            assert_eq!(first.count(category), second.count(category));
            assert_eq!(first.bytes(category), second.bytes(category));
        }
        // And the filesystem is untouched.
        assert!(f.root.join("temp").join("a.tmp").exists());
    }

    #[test]
    fn age_gate_excludes_fresh_files() {
        let f = fixture();
        write(&f.root.join("temp").join("fresh.tmp"), 2048);

        let report = f.scanner.scan_all(&ScanOptions::default());
        assert_eq!(report.count(Category::Junk), 0);
    }

    #[test]
    fn no_candidates_yields_empty_report_not_error() {
        let tmp = TempDir::new().unwrap();
        let scanner = Scanner::with_catalog(
            WhitelistSet::default(),
            CandidateDirs {
                temp_dirs: vec![tmp.path().join("nope")],
                browser_cache_dirs: vec![],
                download_dirs: vec![],
            },
        );
        let report = scanner.scan_all(&options());
        assert_eq!(report.total_files(), 0);
        assert!(report.scanned_folders.is_empty());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn report_carries_audit_metadata() {
        let f = fixture();
        let report = f.scanner.scan_all(&options());
        assert!(report.dry_run);
        assert_eq!(report.whitelist_paths, f.scanner.whitelist().paths());
        assert_eq!(report.download_dirs, f.scanner.dirs().download_dirs);
    }
}
