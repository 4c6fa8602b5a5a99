//! Allocation policies for initial field state.
//!
//! Every constructor returns a fresh row-major grid. Stamps overwrite the
//! cells inside a shape centred at `(size/2, size/2)` and leave every
//! other cell untouched.

use std::time::{SystemTime, UNIX_EPOCH};

use pfield_core::Grid;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Every cell set to `value`.
pub fn uniform(size: usize, value: f32) -> Grid {
    Grid::uniform(size, value)
}

/// Interior `interior`, with fixed edge values.
///
/// Top is row 0, bottom is the last row, left is column 0, right is the
/// last column. Corners take the top/bottom value.
pub fn with_boundary(
    size: usize,
    interior: f32,
    left: f32,
    right: f32,
    top: f32,
    bottom: f32,
) -> Grid {
    let mut grid = Grid::uniform(size, interior);
    if size == 0 {
        return grid;
    }
    let last = size - 1;
    for row in 0..size {
        grid.set(row, 0, left);
        grid.set(row, last, right);
    }
    for col in 0..size {
        grid.set(0, col, top);
        grid.set(last, col, bottom);
    }
    grid
}

/// Uniform noise in `[mean - amplitude/2, mean + amplitude/2)`.
///
/// Seeded from the wall clock at one-second resolution, so two calls in
/// the same second produce identical fields. Use [`random_with`] for
/// reproducible or independent draws.
pub fn random(size: usize, mean: f32, amplitude: f32) -> Grid {
    let mut rng = ChaCha8Rng::seed_from_u64(wall_clock_seed());
    random_with(size, mean, amplitude, &mut rng)
}

/// Seconds since the Unix epoch, or 0 if the clock is before it.
pub fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Uniform noise in `[mean - amplitude/2, mean + amplitude/2)` drawn from
/// `rng`.
pub fn random_with<R: Rng>(size: usize, mean: f32, amplitude: f32, rng: &mut R) -> Grid {
    let mut grid = Grid::uniform(size, mean);
    for cell in grid.as_mut_slice() {
        let u: f32 = rng.random();
        *cell = mean + amplitude * (u - 0.5);
    }
    grid
}

/// Set every cell within `radius` of the centre to `value`.
///
/// The centre cell is always included, even for radius 0.
pub fn stamp_circle(grid: &mut Grid, radius: usize, value: f32) {
    let size = grid.size();
    let centre = (size / 2) as i64;
    let r2 = (radius as i64) * (radius as i64);
    for row in 0..size {
        let dr = row as i64 - centre;
        for col in 0..size {
            let dc = col as i64 - centre;
            if dr * dr + dc * dc <= r2 {
                grid.set(row, col, value);
            }
        }
    }
}

/// Set every cell whose row and column offsets from the centre are both
/// strictly below `half_width` to `value`.
///
/// The centre cell is included for any `half_width >= 1`; a half-width of
/// 0 stamps nothing.
pub fn stamp_square(grid: &mut Grid, half_width: usize, value: f32) {
    let size = grid.size();
    if size == 0 || half_width == 0 {
        return;
    }
    let centre = size / 2;
    let lo = centre + 1 - half_width.min(centre + 1);
    let hi = (centre + half_width - 1).min(size - 1);
    for row in lo..=hi {
        for col in lo..=hi {
            grid.set(row, col, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_literal() {
        let g = with_boundary(5, 0.0, 1.0, 2.0, 3.0, 4.0);
        #[rustfmt::skip]
        let expected = vec![
            3.0, 3.0, 3.0, 3.0, 3.0,
            1.0, 0.0, 0.0, 0.0, 2.0,
            1.0, 0.0, 0.0, 0.0, 2.0,
            1.0, 0.0, 0.0, 0.0, 2.0,
            4.0, 4.0, 4.0, 4.0, 4.0,
        ];
        assert_eq!(g.as_slice(), expected.as_slice());
    }

    #[test]
    fn random_with_stays_in_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let g = random_with(16, 0.5, 0.1, &mut rng);
        assert!(g
            .as_slice()
            .iter()
            .all(|&v| (0.449..=0.551).contains(&v)));
    }

    #[test]
    fn random_with_is_reproducible() {
        let a = random_with(8, 0.0, 1.0, &mut ChaCha8Rng::seed_from_u64(3));
        let b = random_with(8, 0.0, 1.0, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn wall_clock_random_has_right_shape() {
        let g = random(4, 1.0, 0.0);
        assert_eq!(g.len(), 16);
        assert!(g.as_slice().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn circle_radius_zero_sets_only_centre() {
        let mut g = uniform(9, 0.0);
        stamp_circle(&mut g, 0, 1.0);
        assert_eq!(g.sum(), 1.0);
        assert_eq!(g.get(4, 4), Some(1.0));
    }

    #[test]
    fn circle_radius_one_is_a_plus() {
        let mut g = uniform(8, 0.0);
        stamp_circle(&mut g, 1, 1.0);
        assert_eq!(g.sum(), 5.0);
        for (r, c) in [(4, 4), (3, 4), (5, 4), (4, 3), (4, 5)] {
            assert_eq!(g.get(r, c), Some(1.0));
        }
    }

    #[test]
    fn square_excludes_its_half_width() {
        let mut g = uniform(10, 0.0);
        stamp_square(&mut g, 2, 1.0);
        assert_eq!(g.sum(), 9.0);
        assert_eq!(g.get(4, 4), Some(1.0));
        assert_eq!(g.get(6, 6), Some(1.0));
        assert_eq!(g.get(3, 5), Some(0.0));
    }

    #[test]
    fn square_half_width_one_is_centre() {
        let mut g = uniform(7, 0.0);
        stamp_square(&mut g, 1, 1.0);
        assert_eq!(g.sum(), 1.0);
        assert_eq!(g.get(3, 3), Some(1.0));
    }

    proptest! {
        #[test]
        fn stamps_keep_exterior_and_set_centre(
            size in 1usize..40,
            radius in 0usize..20,
            half in 1usize..20,
        ) {
            let mut circle = uniform(size, -1.0);
            stamp_circle(&mut circle, radius, 2.0);
            let c = size / 2;
            prop_assert_eq!(circle.get(c, c), Some(2.0));
            for row in 0..size {
                for col in 0..size {
                    let dr = row as i64 - c as i64;
                    let dc = col as i64 - c as i64;
                    let inside = dr * dr + dc * dc <= (radius * radius) as i64;
                    let expect = if inside { 2.0 } else { -1.0 };
                    prop_assert_eq!(circle.get(row, col), Some(expect));
                }
            }

            let mut square = uniform(size, -1.0);
            stamp_square(&mut square, half, 2.0);
            prop_assert_eq!(square.get(c, c), Some(2.0));
            for row in 0..size {
                for col in 0..size {
                    let inside = row.abs_diff(c) < half && col.abs_diff(c) < half;
                    let expect = if inside { 2.0 } else { -1.0 };
                    prop_assert_eq!(square.get(row, col), Some(expect));
                }
            }
        }
    }
}
