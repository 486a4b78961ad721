pub mod catalog;
pub mod classifier;
pub mod cleaner;
pub mod optimizer;
pub mod report;
pub mod scanner;
pub mod system_info;
pub mod utils;

pub use catalog::{CandidateDirs, OsFamily, PlatformProfile, WhitelistSet};
pub use classifier::{classify, Category, FileRecord};
pub use cleaner::{DisposeAction, DisposeError, Disposer};
pub use optimizer::{OptimizeSummary, Optimizer};
pub use report::{CategoryBucket, ScanReport};
pub use scanner::{ScanOptions, Scanner};
