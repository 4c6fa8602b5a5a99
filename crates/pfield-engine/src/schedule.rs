//! Checkpoint cadence.

use pfield_core::SimulationConfig;

/// Which iterations produce snapshots.
///
/// Periodic checkpoints fall on every loop index `i < ITERS` with
/// `i % interval == 0`; the final checkpoint is always written at `ITERS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckpointSchedule {
    interval: u32,
    iterations: u32,
}

impl CheckpointSchedule {
    /// Schedule for `config` (`interval = max(1, ITERS / NSave)`).
    pub fn new(config: &SimulationConfig) -> Self {
        Self::with_interval(config.iterations, config.checkpoint_interval())
    }

    /// Schedule with an explicit interval; an interval of 0 is treated as 1.
    pub fn with_interval(iterations: u32, interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            iterations,
        }
    }

    /// Iterations between periodic checkpoints.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Total iterations.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Whether loop index `iteration` writes a periodic checkpoint.
    pub fn is_periodic(&self, iteration: u32) -> bool {
        iteration < self.iterations && iteration % self.interval == 0
    }

    /// Every checkpoint label, in order, the final one included.
    pub fn labels(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.iterations)
            .step_by(self.interval as usize)
            .chain(std::iter::once(self.iterations))
    }

    /// Number of checkpoints a full run writes.
    pub fn count(&self) -> usize {
        self.iterations.div_ceil(self.interval) as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn dividing_cadence() {
        let s = CheckpointSchedule::with_interval(100, 10);
        let labels: Vec<u32> = s.labels().collect();
        assert_eq!(labels, vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(s.count(), 11);
        assert!(s.is_periodic(0));
        assert!(!s.is_periodic(5));
        assert!(!s.is_periodic(100));
    }

    #[test]
    fn non_dividing_cadence() {
        // ITERS = 10, NSave = 3 -> interval 3.
        let s = CheckpointSchedule::with_interval(10, 3);
        let labels: Vec<u32> = s.labels().collect();
        assert_eq!(labels, vec![0, 3, 6, 9, 10]);
        assert_eq!(s.count(), 5);
    }

    proptest! {
        #[test]
        fn count_matches_labels(iters in 1u32..500, interval in 1u32..100) {
            let s = CheckpointSchedule::with_interval(iters, interval);
            prop_assert_eq!(s.labels().count(), s.count());
            let periodic = (0..iters).filter(|&i| s.is_periodic(i)).count();
            prop_assert_eq!(periodic + 1, s.count());
        }
    }
}
