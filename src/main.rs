mod cli;
mod output;

use std::process::ExitCode;

use clap::Parser;

use reclaim::classifier::Category;
use reclaim::cleaner::Disposer;
use reclaim::optimizer::Optimizer;
use reclaim::scanner::{ScanOptions, Scanner};
use reclaim::system_info::SystemInfo;
use reclaim::utils;

use cli::{Cli, Command, ScanArgs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    output::print_banner();

    match cli.command {
        Command::Scan { args, all } => {
            let (scanner, options) = match build_scan(&args, true) {
                Ok(pair) => pair,
                Err(msg) => return fail(&msg),
            };
            let report = scanner.scan_all(&options);
            output::print_report(&report, all);
        }
        Command::Clean {
            args,
            category,
            confirm,
            force,
            no_trash,
        } => {
            let category = match Category::parse(&category) {
                Some(Category::Skipped) | None => {
                    return fail(&format!(
                        "unknown category '{category}' (expected junk, large, suspicious or harmful)"
                    ));
                }
                Some(cat) => cat,
            };
            if !confirm {
                output::print_no_confirm_warning();
            }
            let dry_run = !confirm;

            let (scanner, options) = match build_scan(&args, dry_run) {
                Ok(pair) => pair,
                Err(msg) => return fail(&msg),
            };
            let report = scanner.scan_all(&options);
            let targets = report.files(category);
            if targets.is_empty() {
                output::print_info(&format!("No {category} files found."));
                return ExitCode::SUCCESS;
            }

            output::print_category_heading(category, targets.len());
            let mut disposer = Disposer::with_whitelist(scanner.whitelist().clone());
            if no_trash {
                disposer = disposer.with_trash(false);
            }
            let (results, errors) = disposer.dispose(targets, dry_run, force);
            output::print_dispose_results(&results, &errors);
            if dry_run {
                output::print_info("Dry run only. Re-run with --confirm to apply.");
            }
            if !errors.is_empty() {
                return ExitCode::FAILURE;
            }
        }
        Command::Optimize {
            max_age_days,
            keep_small_files,
            memory,
        } => {
            let optimizer = Optimizer::new();
            if memory {
                match optimizer.optimize_memory() {
                    Ok(()) => output::print_info("Memory optimization completed."),
                    Err(err) => {
                        output::print_warning(&format!("Memory optimization failed: {err}"))
                    }
                }
            }
            let removed = optimizer.optimize_disk(max_age_days, !keep_small_files);
            output::print_removed_paths(&removed);
        }
        Command::Info => {
            print!("{}", SystemInfo::collect().render());
        }
    }

    ExitCode::SUCCESS
}

fn build_scan(args: &ScanArgs, dry_run: bool) -> Result<(Scanner, ScanOptions), String> {
    let size_threshold = utils::parse_size(&args.min_size)?;

    let mut options = ScanOptions {
        age_seconds: (args.age_seconds > 0).then_some(args.age_seconds),
        size_threshold_bytes: (size_threshold > 0).then_some(size_threshold),
        include_downloads: args.include_downloads,
        include_browser_cache: !args.no_browser_cache,
        extra_scan_dirs: args.dirs.clone(),
        dry_run,
        ..ScanOptions::default()
    };
    if let Some(cap) = args.limit {
        if cap == 0 {
            return Err("--limit must be a positive integer".to_string());
        }
        for category in Category::ALL {
            options.category_limits.insert(category, cap);
        }
    }

    Ok((Scanner::new(&[]), options))
}

fn fail(msg: &str) -> ExitCode {
    output::print_warning(msg);
    ExitCode::FAILURE
}
