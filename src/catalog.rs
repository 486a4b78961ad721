use std::env;
use std::path::{Path, PathBuf};

use crate::utils;

/// Operating-system family the directory tables key on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::MacOs
        } else {
            OsFamily::Linux
        }
    }
}

/// Environment-derived roots, captured once at startup and immutable for the
/// process lifetime. Missing Windows variables fall back to their stock
/// locations so the tables below always have something to join against.
#[derive(Debug, Clone)]
pub struct PlatformProfile {
    pub os: OsFamily,
    pub home: PathBuf,
    pub windir: PathBuf,
    pub system_drive: PathBuf,
    pub user_profile: Option<PathBuf>,
    pub local_app_data: Option<PathBuf>,
}

impl PlatformProfile {
    pub fn current() -> Self {
        Self {
            os: OsFamily::current(),
            home: utils::home_dir(),
            windir: env::var_os("WINDIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(r"C:\Windows")),
            // SYSTEMDRIVE is usually a bare "C:"; joining onto that gives a
            // drive-relative path, so restore the trailing separator.
            system_drive: env::var_os("SYSTEMDRIVE")
                .map(|raw| {
                    let mut s = raw.to_string_lossy().into_owned();
                    if s.ends_with(':') {
                        s.push('\\');
                    }
                    PathBuf::from(s)
                })
                .unwrap_or_else(|| PathBuf::from("C:\\")),
            user_profile: env::var_os("USERPROFILE").map(PathBuf::from),
            local_app_data: env::var_os("LOCALAPPDATA").map(PathBuf::from),
        }
    }
}

/// Absolute, normalized directory paths that must never be classified as
/// removable and are never entered during traversal. Entries that do not
/// exist on this machine are dropped at resolution time.
#[derive(Debug, Clone, Default)]
pub struct WhitelistSet {
    paths: Vec<PathBuf>,
}

impl WhitelistSet {
    /// Protected system paths for the given platform.
    pub fn resolve(profile: &PlatformProfile) -> Self {
        let mut raw: Vec<PathBuf> = Vec::new();
        match profile.os {
            OsFamily::Windows => {
                raw.push(profile.windir.clone());
                raw.push(profile.system_drive.join("Program Files"));
                raw.push(profile.system_drive.join("Program Files (x86)"));
                if let Some(user) = &profile.user_profile {
                    raw.push(user.join("AppData").join("Roaming"));
                    raw.push(user.join("AppData").join("Local").join("Programs"));
                }
            }
            OsFamily::Linux | OsFamily::MacOs => {
                for root in [
                    "/", "/bin", "/sbin", "/usr", "/usr/bin", "/usr/sbin", "/lib", "/lib64",
                    "/etc", "/var",
                ] {
                    raw.push(PathBuf::from(root));
                }
                if profile.os == OsFamily::MacOs {
                    raw.push(PathBuf::from("/System"));
                    raw.push(PathBuf::from("/Applications"));
                }
            }
        }
        Self::from_paths(raw)
    }

    /// Build from explicit paths: non-existent entries are dropped, the rest
    /// are normalized, and the first occurrence of a duplicate wins.
    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        WhitelistSet {
            paths: utils::existing_deduped(paths.into_iter().collect()),
        }
    }

    /// True if `path` equals a whitelist entry or sits anywhere below one.
    pub fn contains(&self, path: &Path) -> bool {
        let normalized = utils::normalize_path(path);
        self.paths
            .iter()
            .any(|entry| utils::path_is_under(&normalized, entry))
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The directories one scan may walk, split by role. All entries exist at
/// resolution time; order is insertion order with first-occurrence
/// de-duplication.
#[derive(Debug, Clone, Default)]
pub struct CandidateDirs {
    pub temp_dirs: Vec<PathBuf>,
    pub browser_cache_dirs: Vec<PathBuf>,
    pub download_dirs: Vec<PathBuf>,
}

impl CandidateDirs {
    /// Candidate directories for the given platform. Caller-supplied extra
    /// directories join the temp set, so files inside them get the same
    /// location treatment as system temp files.
    pub fn resolve(profile: &PlatformProfile, extra_dirs: &[PathBuf]) -> Self {
        let mut temp = temp_dirs(profile);
        temp.extend(extra_dirs.iter().cloned());

        CandidateDirs {
            temp_dirs: utils::existing_deduped(temp),
            browser_cache_dirs: utils::existing_deduped(browser_cache_dirs(profile)),
            download_dirs: utils::existing_deduped(download_dirs(profile)),
        }
    }

    /// True if `path` (already normalized) lies inside a download or temp
    /// directory, the zones where executables and leftovers are flagged.
    pub fn in_download_or_temp(&self, path: &Path) -> bool {
        self.download_dirs
            .iter()
            .chain(self.temp_dirs.iter())
            .any(|dir| utils::path_is_under(path, dir))
    }

    /// True if `path` (already normalized) lies inside a browser cache.
    pub fn in_browser_cache(&self, path: &Path) -> bool {
        self.browser_cache_dirs
            .iter()
            .any(|dir| utils::path_is_under(path, dir))
    }
}

fn temp_dirs(profile: &PlatformProfile) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    match profile.os {
        OsFamily::Windows => {
            dirs.push(env::temp_dir());
            dirs.push(profile.windir.join("Temp"));
            if let Some(user) = &profile.user_profile {
                dirs.push(user.join("AppData").join("Local").join("Temp"));
            }
        }
        OsFamily::Linux => {
            dirs.push(PathBuf::from("/tmp"));
            dirs.push(profile.home.join(".cache"));
        }
        OsFamily::MacOs => {
            dirs.push(PathBuf::from("/tmp"));
            dirs.push(profile.home.join("Library").join("Caches"));
        }
    }
    dirs
}

fn browser_cache_dirs(profile: &PlatformProfile) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    match profile.os {
        OsFamily::Windows => {
            // Default-profile locations; portable installs may differ.
            if let Some(local) = &profile.local_app_data {
                dirs.push(
                    local
                        .join("Google")
                        .join("Chrome")
                        .join("User Data")
                        .join("Default")
                        .join("Cache"),
                );
                dirs.push(
                    local
                        .join("Microsoft")
                        .join("Edge")
                        .join("User Data")
                        .join("Default")
                        .join("Cache"),
                );
                dirs.push(local.join("Mozilla").join("Firefox").join("Profiles"));
            }
        }
        OsFamily::Linux => {
            dirs.push(profile.home.join(".cache").join("google-chrome"));
            dirs.push(profile.home.join(".cache").join("chromium"));
            dirs.push(profile.home.join(".cache").join("mozilla"));
        }
        OsFamily::MacOs => {
            let caches = profile.home.join("Library").join("Caches");
            dirs.push(caches.join("Google").join("Chrome"));
            dirs.push(caches.join("Firefox"));
        }
    }
    dirs
}

fn download_dirs(profile: &PlatformProfile) -> Vec<PathBuf> {
    match profile.os {
        OsFamily::Windows => profile
            .user_profile
            .iter()
            .map(|user| user.join("Downloads"))
            .collect(),
        OsFamily::Linux | OsFamily::MacOs => vec![profile.home.join("Downloads")],
    }
}
