//! Per-process resource metrics for the detail view.

use sysinfo::{Pid, ProcessesToUpdate, System};

#[derive(Clone, Copy, Debug)]
pub struct PidMetrics {
    pub pid: u32,
    /// CPU usage as percentage (0.0 - 100.0)
    pub cpu_percent: f32,
    /// Resident memory in bytes
    pub memory_bytes: u64,
}

/// Samples one process at a time; refreshing only the asked-for PID keeps
/// the call cheap enough to run on every detail refresh.
pub struct PidSampler {
    system: System,
}

impl PidSampler {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// CPU% and RSS for one process; `None` when it is gone.
    pub fn sample(&mut self, pid: u32) -> Option<PidMetrics> {
        self.system
            .refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]), true);

        let process = self.system.process(Pid::from_u32(pid))?;
        Some(PidMetrics {
            pid,
            cpu_percent: process.cpu_usage(),
            memory_bytes: process.memory(),
        })
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1}GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1}MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0}KB", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}
