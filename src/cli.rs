use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "reclaim",
    about = "Find and remove junk, leftover, and suspicious files",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Knobs shared by scan and clean.
#[derive(Args)]
pub struct ScanArgs {
    /// Only consider files older than this many seconds (0 disables the gate)
    #[arg(long, default_value_t = 86_400)]
    pub age_seconds: u64,

    /// Ignore junk files smaller than this (e.g. "1KB", "5MB")
    #[arg(long, default_value = "1KB")]
    pub min_size: String,

    /// Also scan the Downloads directory
    #[arg(long)]
    pub include_downloads: bool,

    /// Skip browser cache directories
    #[arg(long)]
    pub no_browser_cache: bool,

    /// Additional directory to scan (repeatable)
    #[arg(long = "dir", value_name = "PATH")]
    pub dirs: Vec<PathBuf>,

    /// Cap how many paths are kept per category
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan candidate directories and report reclaimable files (never deletes)
    Scan {
        #[command(flatten)]
        args: ScanArgs,

        /// Print every stored path instead of a short sample
        #[arg(long)]
        all: bool,
    },

    /// Scan, then dispose of one category's files (requires --confirm)
    Clean {
        #[command(flatten)]
        args: ScanArgs,

        /// Category to dispose: junk, large, suspicious or harmful
        #[arg(long, default_value = "junk")]
        category: String,

        /// Actually delete files. Without this flag, behaves like scan.
        #[arg(long)]
        confirm: bool,

        /// Permanently delete when no trash mechanism is available
        #[arg(long)]
        force: bool,

        /// Bypass the trash entirely (combine with --force to delete)
        #[arg(long)]
        no_trash: bool,
    },

    /// One-shot cleanup of old temp files, optionally with a memory hint
    Optimize {
        /// Delete temp files older than this many days
        #[arg(long, default_value_t = 7)]
        max_age_days: u64,

        /// Keep temp files smaller than 1 KB
        #[arg(long)]
        keep_small_files: bool,

        /// Also ask the OS to drop reclaimable caches
        #[arg(long)]
        memory: bool,
    },

    /// Show host information (OS, CPU, memory, disk)
    Info,
}
