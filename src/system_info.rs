use sysinfo::System;

use crate::utils;

/// Totals for the volume holding the root filesystem.
#[derive(Debug, Clone, Copy)]
pub struct DiskUsage {
    pub total: u64,
    pub available: u64,
    pub used: u64,
}

impl DiskUsage {
    pub fn usage_percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.used as f32 / self.total as f32
    }
}

/// Read-only snapshot of the host. No invariants; shown by `info`.
#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os_name: String,
    pub os_version: String,
    pub cpu_cores: Option<usize>,
    pub logical_cpus: usize,
    pub total_memory: u64,
    pub used_memory: u64,
    pub disk: Option<DiskUsage>,
}

impl SystemInfo {
    pub fn collect() -> Self {
        let sys = System::new_all();

        SystemInfo {
            os_name: System::name().unwrap_or_else(|| "unknown".to_string()),
            os_version: System::os_version().unwrap_or_default(),
            cpu_cores: sys.physical_core_count(),
            logical_cpus: sys.cpus().len(),
            total_memory: sys.total_memory(),
            used_memory: sys.used_memory(),
            disk: root_disk_usage(),
        }
    }

    /// Multi-line rendering in the shape the dashboard shows.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("OS: {} {}\n", self.os_name, self.os_version));
        if let Some(cores) = self.cpu_cores {
            out.push_str(&format!("CPU Cores: {cores}\n"));
        }
        out.push_str(&format!("Logical CPUs: {}\n", self.logical_cpus));
        out.push_str(&format!(
            "RAM: {} used / {} total\n",
            utils::format_size(self.used_memory),
            utils::format_size(self.total_memory)
        ));
        if let Some(disk) = &self.disk {
            out.push_str(&format!(
                "Disk: {} used / {} total ({} free, {:.0}% full)\n",
                utils::format_size(disk.used),
                utils::format_size(disk.total),
                utils::format_size(disk.available),
                disk.usage_percent() * 100.0
            ));
        }
        out
    }
}

/// statvfs on the root mount; block counts times the fragment size.
#[cfg(unix)]
pub fn root_disk_usage() -> Option<DiskUsage> {
    use std::mem::MaybeUninit;

    let mut stat = MaybeUninit::<libc::statvfs>::uninit();
    let path = b"/\0";
    let ret = unsafe { libc::statvfs(path.as_ptr() as *const libc::c_char, stat.as_mut_ptr()) };
    if ret != 0 {
        return None;
    }
    let stat = unsafe { stat.assume_init() };
    let block_size = stat.f_frsize as u64;
    let total = stat.f_blocks as u64 * block_size;
    let available = stat.f_bavail as u64 * block_size;
    let used = total.saturating_sub(available);
    Some(DiskUsage {
        total,
        available,
        used,
    })
}

/// No statvfs; take the largest mounted disk sysinfo reports.
#[cfg(not(unix))]
pub fn root_disk_usage() -> Option<DiskUsage> {
    let disks = sysinfo::Disks::new_with_refreshed_list();
    disks
        .iter()
        .max_by_key(|disk| disk.total_space())
        .map(|disk| {
            let total = disk.total_space();
            let available = disk.available_space();
            DiskUsage {
                total,
                available,
                used: total.saturating_sub(available),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_percent_handles_zero_total() {
        let empty = DiskUsage {
            total: 0,
            available: 0,
            used: 0,
        };
        assert_eq!(empty.usage_percent(), 0.0);

        let half = DiskUsage {
            total: 100,
            available: 50,
            used: 50,
        };
        assert!((half.usage_percent() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn collect_produces_a_renderable_snapshot() {
        let info = SystemInfo::collect();
        assert!(!info.os_name.is_empty());
        let rendered = info.render();
        assert!(rendered.contains("RAM:"));
        assert!(rendered.contains("Logical CPUs:"));
    }
}
