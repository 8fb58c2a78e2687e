use std::time::{Duration, Instant};
use sysinfo::{ProcessExt, System, SystemExt};

/// Resident memory of the current process in bytes, 0 when unavailable.
pub fn process_memory() -> u64 {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return 0;
    };
    let mut system = System::new();
    system.refresh_process(pid);
    system.process(pid).map(|p| p.memory()).unwrap_or(0)
}

/// Times a batch job and reports how much memory it took on.
pub struct JobMonitor {
    job: &'static str,
    started: Instant,
    start_memory: u64,
}

impl JobMonitor {
    pub fn start(job: &'static str) -> Self {
        Self {
            job,
            started: Instant::now(),
            start_memory: process_memory(),
        }
    }

    pub fn finish(self) -> Duration {
        let elapsed = self.started.elapsed();
        let memory = process_memory().saturating_sub(self.start_memory);
        tracing::info!(
            job = self.job,
            elapsed_ms = elapsed.as_millis() as u64,
            memory_delta_bytes = memory,
            "Job finished"
        );
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_process_reports_memory() {
        assert!(process_memory() > 0);
    }

    #[test]
    fn monitor_measures_elapsed_time() {
        let monitor = JobMonitor::start("test");
        std::thread::sleep(Duration::from_millis(5));
        assert!(monitor.finish() >= Duration::from_millis(5));
    }
}
