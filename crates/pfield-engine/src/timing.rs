//! Device time accounting.

use pfield_device::{DeviceError, LaunchEvent, LaunchTiming};

/// Sums device execution time over launches.
///
/// Only the start/end timestamps of each launch count; time spent waiting
/// in the queue is excluded. A launch whose timestamps cannot be read is
/// logged and skipped.
#[derive(Clone, Debug, Default)]
pub struct ExecutionTimer {
    device_secs: f64,
    profiled: u64,
    failed: u64,
}

impl ExecutionTimer {
    /// Fresh timer at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one launch.
    pub fn record(&mut self, event: &LaunchEvent, timing: Result<LaunchTiming, DeviceError>) {
        match timing {
            Ok(t) => {
                self.device_secs += t.elapsed_secs();
                self.profiled += 1;
            }
            Err(e) => {
                self.failed += 1;
                tracing::warn!(seq = event.seq(), error = %e, "launch profiling failed");
            }
        }
    }

    /// Accumulated device time in seconds.
    pub fn seconds(&self) -> f64 {
        self.device_secs
    }

    /// Accumulated device time in minutes.
    pub fn minutes(&self) -> f64 {
        self.device_secs / 60.0
    }

    /// Accumulated device time in both units, e.g. `" 3.00 seconds (0.05 mins)"`.
    pub fn elapsed_text(&self) -> String {
        format!("{:5.2} seconds ({:.2} mins)", self.seconds(), self.minutes())
    }

    /// Launches whose timing was accumulated.
    pub fn profiled(&self) -> u64 {
        self.profiled
    }

    /// Launches whose timing could not be read.
    pub fn failed(&self) -> u64 {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_successful_launches() {
        let mut timer = ExecutionTimer::new();
        let event = LaunchEvent::pending(0);
        timer.record(
            &event,
            Ok(LaunchTiming {
                start_ns: 1_000,
                end_ns: 1_500_001_000,
            }),
        );
        timer.record(
            &event,
            Ok(LaunchTiming {
                start_ns: 0,
                end_ns: 500_000_000,
            }),
        );
        assert!((timer.seconds() - 2.0).abs() < 1e-9);
        assert!((timer.minutes() - 2.0 / 60.0).abs() < 1e-9);
        assert_eq!(timer.profiled(), 2);
    }

    #[test]
    fn elapsed_text_carries_both_units() {
        let mut timer = ExecutionTimer::new();
        assert_eq!(timer.elapsed_text(), " 0.00 seconds (0.00 mins)");
        timer.record(
            &LaunchEvent::pending(0),
            Ok(LaunchTiming {
                start_ns: 0,
                end_ns: 90_000_000_000,
            }),
        );
        assert_eq!(timer.elapsed_text(), "90.00 seconds (1.50 mins)");
    }

    #[test]
    fn failures_are_counted_not_summed() {
        let mut timer = ExecutionTimer::new();
        let event = LaunchEvent::pending(3);
        timer.record(&event, Err(DeviceError::ProfilingUnavailable { seq: 3 }));
        assert_eq!(timer.seconds(), 0.0);
        assert_eq!(timer.failed(), 1);
        assert_eq!(timer.profiled(), 0);
    }
}
