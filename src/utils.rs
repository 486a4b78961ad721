use std::path::{Component, Path, PathBuf};

/// Get home directory or panic with a clear message.
pub fn home_dir() -> PathBuf {
    dirs::home_dir().expect("Could not determine home directory")
}

/// Make a path absolute and lexically clean: `.` components are dropped and
/// `..` pops its parent. Symlinks are deliberately left unresolved so that
/// containment checks always compare the same shape a caller handed us.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// True if `path` equals `base` or sits anywhere below it.
/// The separator is appended to `base` before the prefix check so that
/// `/foo` does not claim `/foobar`; a bare filesystem root therefore only
/// matches itself.
pub fn path_is_under(path: &Path, base: &Path) -> bool {
    if path == base {
        return true;
    }
    let mut prefix = base.as_os_str().to_string_lossy().into_owned();
    prefix.push(std::path::MAIN_SEPARATOR);
    path.as_os_str().to_string_lossy().starts_with(&prefix)
}

/// Normalize, drop non-existent entries, and de-duplicate keeping the first
/// occurrence of each directory.
pub fn existing_deduped(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut kept: Vec<PathBuf> = Vec::new();
    for path in paths {
        if !path.exists() {
            continue;
        }
        let normalized = normalize_path(&path);
        if !kept.contains(&normalized) {
            kept.push(normalized);
        }
    }
    kept
}

/// Parse human-readable size string ("100MB") into bytes.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1_073_741_824u64)
    } else if let Some(n) = s.strip_suffix("gb") {
        (n, 1_073_741_824)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1_048_576)
    } else if let Some(n) = s.strip_suffix("mb") {
        (n, 1_048_576)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1_024)
    } else if let Some(n) = s.strip_suffix("kb") {
        (n, 1_024)
    } else if let Some(n) = s.strip_suffix("B") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix("b") {
        (n, 1)
    } else {
        // assume bytes if no suffix
        (s, 1)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    if num < 0.0 {
        return Err("Size cannot be negative".to_string());
    }

    Ok((num * multiplier as f64) as u64)
}

/// Format byte count as human-readable string.
pub fn format_size(bytes: u64) -> String {
    if bytes >= 1_073_741_824 {
        format!("{:.2} GB", bytes as f64 / 1_073_741_824.0)
    } else if bytes >= 1_048_576 {
        format!("{:.2} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1_024 {
        format!("{:.2} KB", bytes as f64 / 1_024.0)
    } else {
        format!("{} B", bytes)
    }
}

/// Shorten a path for display by replacing home dir with ~.
pub fn display_path(path: &Path) -> String {
    let home = home_dir();
    if let Ok(relative) = path.strip_prefix(&home) {
        format!("~/{}", relative.display())
    } else {
        path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_size_accepts_suffixes() {
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("2mb").unwrap(), 2 * 1_048_576);
        assert_eq!(parse_size("1.5GB").unwrap(), (1.5 * 1_073_741_824.0) as u64);
        assert_eq!(parse_size("512").unwrap(), 512);
        assert!(parse_size("-1KB").is_err());
        assert!(parse_size("abc").is_err());
    }

    #[test]
    fn format_size_picks_unit() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1_048_576), "3.00 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn normalize_resolves_dot_components() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("b").join("..").join(".").join("c");
        assert_eq!(normalize_path(&input), normalize_path(&tmp.path().join("c")));
    }

    #[test]
    fn path_is_under_requires_separator_boundary() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().join("data");
        assert!(path_is_under(&base, &base));
        assert!(path_is_under(&base.join("file.log"), &base));
        // Shared string prefix without a separator boundary is not
        // containment.
        let sibling = PathBuf::from(format!("{}base", base.display()));
        assert!(!path_is_under(&sibling, &base));
    }

    #[cfg(unix)]
    #[test]
    fn bare_root_only_matches_itself() {
        let root = Path::new("/");
        assert!(path_is_under(Path::new("/"), root));
        assert!(!path_is_under(Path::new("/etc/hosts"), root));
    }

    #[test]
    fn existing_deduped_filters_and_keeps_first() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::create_dir(&a).unwrap();
        std::fs::create_dir(&b).unwrap();
        let missing = tmp.path().join("missing");

        let result = existing_deduped(vec![a.clone(), missing, b.clone(), a.clone()]);
        assert_eq!(result, vec![normalize_path(&a), normalize_path(&b)]);
    }
}
