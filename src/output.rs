use colored::Colorize;

use std::path::PathBuf;

use reclaim::classifier::Category;
use reclaim::cleaner::{DisposeAction, DisposeError};
use reclaim::report::ScanReport;
use reclaim::utils;

/// How many paths a category section prints unless --all is given.
const SAMPLE_LEN: usize = 10;

pub fn print_banner() {
    println!("{}", "reclaim - disk cleanup tool".bold().cyan());
    println!();
}

pub fn print_report(report: &ScanReport, show_all: bool) {
    if report.scanned_folders.is_empty() {
        print_info("No candidate directories exist on this system.");
        return;
    }

    println!("{}", "Scanned folders:".bold().white());
    for folder in &report.scanned_folders {
        println!("  {}", utils::display_path(folder).dimmed());
    }
    println!();

    for (category, bucket) in report.iter() {
        if bucket.count == 0 {
            continue;
        }
        println!(
            "{}  {} files, {}",
            format!("=== {category} ===").bold().white(),
            bucket.count,
            utils::format_size(bucket.bytes).yellow()
        );
        let shown = if show_all {
            bucket.files.len()
        } else {
            bucket.files.len().min(SAMPLE_LEN)
        };
        for path in &bucket.files[..shown] {
            println!("  {}", utils::display_path(path).dimmed());
        }
        if bucket.files.len() > shown {
            println!(
                "  {}",
                format!("... and {} more stored", bucket.files.len() - shown).dimmed()
            );
        }
        if bucket.count > bucket.files.len() {
            println!(
                "  {}",
                format!(
                    "({} more observed past the cap; sizes cover stored files only)",
                    bucket.count - bucket.files.len()
                )
                .dimmed()
            );
        }
        println!();
    }

    for err in &report.errors {
        print_warning(err);
    }

    println!("{}", "=== Summary ===".bold().white());
    println!("  {:<16} {}", "Total files:".bold(), report.total_files());
    println!(
        "  {:<16} {}",
        "Total size:".bold(),
        report.total_size_human().green().bold()
    );
    println!();

    if report.dry_run {
        println!(
            "{}",
            "This was a dry run. Run `reclaim clean --confirm` to delete."
                .yellow()
                .bold()
        );
    }
}

pub fn print_category_heading(category: Category, count: usize) {
    println!(
        "{}",
        format!("Disposing of {count} {category} file(s):")
            .bold()
            .white()
    );
}

pub fn print_dispose_results(
    results: &[(PathBuf, DisposeAction)],
    errors: &[(PathBuf, DisposeError)],
) {
    for (path, action) in results {
        println!(
            "  {}  {}",
            utils::display_path(path).dimmed(),
            action.to_string().green()
        );
    }
    for (path, err) in errors {
        println!(
            "  {} {} — {}",
            "Failed".red().bold(),
            utils::display_path(path).dimmed(),
            err.to_string().red()
        );
    }
    println!();
    let summary = format!("{} succeeded, {} failed.", results.len(), errors.len());
    if errors.is_empty() {
        println!("{}", summary.green().bold());
    } else {
        println!("{}", summary.yellow().bold());
    }
}

/// Removed-path listing for an optimize run; long lists are cut off.
pub fn print_removed_paths(removed: &[PathBuf]) {
    println!(
        "  {} {}",
        "Temp files removed:".bold(),
        removed.len().to_string().green()
    );
    for path in removed.iter().take(20) {
        println!("  {}", utils::display_path(path).dimmed());
    }
    if removed.len() > 20 {
        println!("  {}", format!("... and {} more", removed.len() - 20).dimmed());
    }
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "Warning:".red().bold(), msg.red());
}

pub fn print_info(msg: &str) {
    println!("{} {}", "Info:".cyan().bold(), msg);
}

pub fn print_no_confirm_warning() {
    println!(
        "{}",
        "No --confirm flag provided. Running as dry-run."
            .yellow()
            .bold()
    );
    println!();
}
