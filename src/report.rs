use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::classifier::Category;
use crate::utils;

/// Accumulated results for one category within a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryBucket {
    /// Stored paths, in discovery order, truncated at the caller's
    /// per-category cap.
    pub files: Vec<PathBuf>,
    /// Every file observed for this category, including ones past the cap.
    pub count: usize,
    /// Bytes summed over the stored list only. A capped bucket
    /// under-reports the true total.
    pub bytes: u64,
}

/// Immutable snapshot of one scan pass. Built fresh by `Scanner::scan_all`
/// and handed to the caller; a later scan produces a new report instead of
/// mutating this one.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    buckets: BTreeMap<Category, CategoryBucket>,
    /// Folders the walk actually entered, after de-duplication and
    /// existence filtering.
    pub scanned_folders: Vec<PathBuf>,
    /// Traversal-level failures (permission denied, broken entries). These
    /// never abort a scan.
    pub errors: Vec<String>,
    pub dry_run: bool,
    /// Catalog state the scan ran against, kept for auditability.
    pub whitelist_paths: Vec<PathBuf>,
    pub download_dirs: Vec<PathBuf>,
    pub browser_cache_dirs: Vec<PathBuf>,
}

impl ScanReport {
    pub(crate) fn new(dry_run: bool) -> Self {
        let mut buckets = BTreeMap::new();
        for category in Category::ALL {
            buckets.insert(category, CategoryBucket::default());
        }
        ScanReport {
            buckets,
            dry_run,
            ..Default::default()
        }
    }

    /// Record one classified file, storing its path unless the bucket has
    /// already reached `limit`.
    pub(crate) fn record(
        &mut self,
        category: Category,
        path: PathBuf,
        size: u64,
        limit: Option<usize>,
    ) {
        let bucket = self.buckets.entry(category).or_default();
        bucket.count += 1;
        if limit.map_or(true, |cap| bucket.files.len() < cap) {
            bucket.bytes += size;
            bucket.files.push(path);
        }
    }

    pub fn bucket(&self, category: Category) -> &CategoryBucket {
        static EMPTY: CategoryBucket = CategoryBucket {
            files: Vec::new(),
            count: 0,
            bytes: 0,
        };
        self.buckets.get(&category).unwrap_or(&EMPTY)
    }

    pub fn files(&self, category: Category) -> &[PathBuf] {
        &self.bucket(category).files
    }

    pub fn count(&self, category: Category) -> usize {
        self.bucket(category).count
    }

    pub fn bytes(&self, category: Category) -> u64 {
        self.bucket(category).bytes
    }

    pub fn size_human(&self, category: Category) -> String {
        utils::format_size(self.bytes(category))
    }

    /// Files observed across all categories, including skipped ones.
    pub fn total_files(&self) -> usize {
        self.buckets.values().map(|b| b.count).sum()
    }

    /// Bytes across all stored lists.
    pub fn total_bytes(&self) -> u64 {
        self.buckets.values().map(|b| b.bytes).sum()
    }

    pub fn total_size_human(&self) -> String {
        utils::format_size(self.total_bytes())
    }

    pub fn is_empty(&self) -> bool {
        self.total_files() == 0
    }

    /// Buckets in category order, for rendering.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryBucket)> {
        self.buckets.iter().map(|(cat, bucket)| (*cat, bucket))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_starts_with_all_categories_empty() {
        let report = ScanReport::new(true);
        assert!(report.dry_run);
        assert!(report.is_empty());
        for category in Category::ALL {
            assert_eq!(report.count(category), 0);
            assert_eq!(report.bytes(category), 0);
            assert!(report.files(category).is_empty());
        }
    }

    #[test]
    fn cap_truncates_storage_but_not_count() {
        let mut report = ScanReport::new(true);
        for i in 0..5 {
            report.record(
                Category::Junk,
                PathBuf::from(format!("/x/{i}.tmp")),
                100,
                Some(2),
            );
        }
        assert_eq!(report.count(Category::Junk), 5);
        assert_eq!(report.files(Category::Junk).len(), 2);
        // Bytes cover the stored sample only.
        assert_eq!(report.bytes(Category::Junk), 200);
    }

    #[test]
    fn totals_span_categories() {
        let mut report = ScanReport::new(false);
        report.record(Category::Junk, PathBuf::from("/a.tmp"), 1024, None);
        report.record(Category::Large, PathBuf::from("/b.iso"), 4096, None);
        assert_eq!(report.total_files(), 2);
        assert_eq!(report.total_bytes(), 5120);
        assert_eq!(report.total_size_human(), "5.00 KB");
    }
}
