//! Work-group edge selection.

use crate::device::KernelLimits;

/// Pick a square work-group edge for a `size`×`size` launch.
///
/// Starts at 2 and doubles while the doubled candidate still divides
/// `size` and `candidate² × 4` stays strictly below the kernel's maximum
/// work-group size. Returns the last candidate that passed, or 2 when no
/// doubling passes. That fallback of 2 is returned even when it does not
/// divide an odd `size`; callers must check divisibility before launching.
pub fn advise_work_group_size(limits: &KernelLimits, size: usize) -> usize {
    let mut candidate = 2usize;
    loop {
        let next = candidate * 2;
        let fits = next
            .checked_mul(next)
            .and_then(|sq| sq.checked_mul(4))
            .is_some_and(|footprint| footprint < limits.max_work_group_size);
        if !fits || size % next != 0 {
            return candidate;
        }
        candidate = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn limits(max: usize) -> KernelLimits {
        KernelLimits {
            max_work_group_size: max,
            local_mem_bytes: 32 * 1024,
        }
    }

    #[test]
    fn typical_gpu_limit() {
        // 4² × 4 = 64 < 256 passes; 8² × 4 = 256 is not strictly below.
        assert_eq!(advise_work_group_size(&limits(256), 64), 4);
    }

    #[test]
    fn larger_limit_allows_larger_tiles() {
        assert_eq!(advise_work_group_size(&limits(1024), 64), 8);
    }

    #[test]
    fn divisibility_stops_doubling() {
        assert_eq!(advise_work_group_size(&limits(1 << 20), 12), 4);
        assert_eq!(advise_work_group_size(&limits(1 << 20), 6), 2);
    }

    #[test]
    fn tiny_limit_falls_back_to_two() {
        assert_eq!(advise_work_group_size(&limits(1), 64), 2);
    }

    proptest! {
        #[test]
        fn advice_respects_limits(size in 1usize..2048, max in 1usize..4096) {
            let wg = advise_work_group_size(&limits(max), size);
            prop_assert!(wg >= 2);
            prop_assert!(wg.is_power_of_two());
            if wg > 2 {
                prop_assert_eq!(size % wg, 0);
                prop_assert!(wg * wg * 4 < max);
            }
        }
    }
}
