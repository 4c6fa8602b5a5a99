//! Periodic noise injection for the dendritic models.

use rand::Rng;

/// Iterations between noise draws.
pub const NOISE_PERIOD: u32 = 50;

/// Noise drawn every [`NOISE_PERIOD`] iterations and zero otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NoiseSchedule {
    /// Peak-to-peak amplitude.
    pub amplitude: f32,
    /// Iterations between draws.
    pub period: u32,
}

impl NoiseSchedule {
    /// Schedule with the standard period.
    pub fn new(amplitude: f32) -> Self {
        Self {
            amplitude,
            period: NOISE_PERIOD,
        }
    }

    /// Noise for `iteration`: `amplitude * (u - 0.5)` with `u ∈ [0, 1)`
    /// when `iteration % period == 0`, else 0. Draws from `rng` only on
    /// those iterations.
    pub fn draw<R: Rng>(&self, iteration: u32, rng: &mut R) -> f32 {
        if self.period != 0 && iteration % self.period == 0 {
            let u: f32 = rng.random();
            self.amplitude * (u - 0.5)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn zero_off_period() {
        let s = NoiseSchedule::new(0.01);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for i in 1..50 {
            assert_eq!(s.draw(i, &mut rng), 0.0);
        }
    }

    #[test]
    fn drawn_on_period_within_band() {
        let s = NoiseSchedule::new(0.01);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for i in (0..1000).step_by(50) {
            let n = s.draw(i, &mut rng);
            assert!((-0.005..=0.005).contains(&n));
        }
    }

    #[test]
    fn off_period_does_not_consume_randomness() {
        let s = NoiseSchedule::new(1.0);
        let mut a = ChaCha8Rng::seed_from_u64(9);
        let mut b = ChaCha8Rng::seed_from_u64(9);
        s.draw(7, &mut a);
        assert_eq!(s.draw(0, &mut a), s.draw(0, &mut b));
    }
}
