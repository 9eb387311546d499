use std::fmt;

#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

/// Stages reported by the monitor; mirrors the engine's extract/transform/load calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Fetch,
    Score,
    Persist,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RunPhase::Fetch => "fetch",
            RunPhase::Score => "score+sample",
            RunPhase::Persist => "persist",
        };
        f.write_str(label)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ProcessStats {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

#[cfg(feature = "cli")]
pub struct ProcessMonitor {
    probe: Option<(Mutex<System>, Pid)>,
    started: Instant,
    peak_memory_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl ProcessMonitor {
    pub fn new(enabled: bool) -> Self {
        let probe = if enabled {
            match sysinfo::get_current_pid() {
                Ok(pid) => {
                    let mut system = System::new_with_specifics(RefreshKind::everything());
                    system.refresh_all();
                    Some((Mutex::new(system), pid))
                }
                Err(e) => {
                    tracing::warn!("Process monitoring unavailable: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            probe,
            started: Instant::now(),
            peak_memory_mb: Mutex::new(0),
        }
    }

    pub fn stats(&self) -> Option<ProcessStats> {
        let (system, pid) = self.probe.as_ref()?;
        let mut system = system.lock().ok()?;
        system.refresh_all();

        let process = system.process(*pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = self.peak_memory_mb.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        Some(ProcessStats {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: *peak,
            elapsed: self.started.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: RunPhase) {
        if let Some(stats) = self.stats() {
            tracing::info!(
                phase = %phase,
                cpu = format!("{:.1}%", stats.cpu_usage),
                memory_mb = stats.memory_mb,
                peak_mb = stats.peak_memory_mb,
                elapsed = ?stats.elapsed,
                "Process stats"
            );
        }
    }

    pub fn log_final(&self) {
        if let Some(stats) = self.stats() {
            tracing::info!(
                elapsed = ?stats.elapsed,
                peak_mb = stats.peak_memory_mb,
                "Final process stats"
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.probe.is_some()
    }
}

#[cfg(not(feature = "cli"))]
pub struct ProcessMonitor;

#[cfg(not(feature = "cli"))]
impl ProcessMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: RunPhase) {}

    pub fn log_final(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = ProcessMonitor::new(false);
        assert!(!monitor.is_enabled());
        monitor.log_phase(RunPhase::Fetch);
        monitor.log_final();
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(RunPhase::Fetch.to_string(), "fetch");
        assert_eq!(RunPhase::Persist.to_string(), "persist");
    }
}
