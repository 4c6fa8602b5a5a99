//! Finite-difference stencils on a periodic square grid.
//!
//! All operators take the row-major field, its side length, and the cell
//! coordinates; neighbours wrap around the edges.

#[inline]
fn wrap(i: usize, delta: isize, size: usize) -> usize {
    (i as isize + delta).rem_euclid(size as isize) as usize
}

/// Value at `(row + dr, col + dc)` with periodic wrap.
#[inline]
pub fn at(field: &[f32], size: usize, row: usize, col: usize, dr: isize, dc: isize) -> f32 {
    field[wrap(row, dr, size) * size + wrap(col, dc, size)]
}

/// Five-point Laplacian with spacing `h`.
#[inline]
pub fn laplacian(field: &[f32], size: usize, row: usize, col: usize, h: f32) -> f32 {
    let centre = field[row * size + col];
    let sum = at(field, size, row, col, -1, 0)
        + at(field, size, row, col, 1, 0)
        + at(field, size, row, col, 0, -1)
        + at(field, size, row, col, 0, 1);
    (sum - 4.0 * centre) / (h * h)
}

/// Central difference along columns (x).
#[inline]
pub fn grad_x(field: &[f32], size: usize, row: usize, col: usize, h: f32) -> f32 {
    (at(field, size, row, col, 0, 1) - at(field, size, row, col, 0, -1)) / (2.0 * h)
}

/// Central difference along rows (y).
#[inline]
pub fn grad_y(field: &[f32], size: usize, row: usize, col: usize, h: f32) -> f32 {
    (at(field, size, row, col, 1, 0) - at(field, size, row, col, -1, 0)) / (2.0 * h)
}
