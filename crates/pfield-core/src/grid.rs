//! The row-major square field storage shared by every model.

use std::fmt;

/// A SIZE×SIZE row-major `f32` field.
///
/// Dimensions are fixed at construction. The type exposes mutable access
/// to cell values but no way to resize the backing storage, so a grid
/// handed to the device always matches the compiled `SIZE`.
#[derive(Clone, PartialEq)]
pub struct Grid {
    size: usize,
    data: Vec<f32>,
}

impl Grid {
    /// Create a grid with every cell set to `value`.
    pub fn uniform(size: usize, value: f32) -> Self {
        Self {
            size,
            data: vec![value; size * size],
        }
    }

    /// Wrap an existing row-major buffer.
    ///
    /// Returns `None` if `data.len() != size * size`.
    pub fn from_vec(size: usize, data: Vec<f32>) -> Option<Self> {
        if data.len() == size * size {
            Some(Self { size, data })
        } else {
            None
        }
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells (`size * size`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major cell values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Mutable row-major cell values.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Value at `(row, col)`, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row < self.size && col < self.size {
            Some(self.data[row * self.size + col])
        } else {
            None
        }
    }

    /// Overwrite the value at `(row, col)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        if row < self.size && col < self.size {
            self.data[row * self.size + col] = value;
        }
    }

    /// Iterate rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact(0) panics; an empty grid has no rows.
        self.data.chunks_exact(self.size.max(1))
    }

    /// Sum of all cells, accumulated in `f64`.
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| f64::from(v)).sum()
    }

    /// Consume the grid, returning its backing buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("size", &self.size)
            .field("sum", &self.sum())
            .finish()
    }
}
