//! Comma-separated snapshot format.
//!
//! The first row is SIZE zeros; it carries no data and is kept so that
//! existing post-processing scripts, which skip one row, still line up.
//! The next SIZE rows hold the field, six decimals per value.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use pfield_core::Grid;

use crate::error::OutputError;

/// Write `grid` as CSV.
pub fn write_csv<W: Write>(out: &mut W, grid: &Grid) -> io::Result<()> {
    let size = grid.size();
    write_row(out, std::iter::repeat(0.0f32).take(size))?;
    for row in grid.rows() {
        write_row(out, row.iter().copied())?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, values: impl Iterator<Item = f32>) -> io::Result<()> {
    for (i, v) in values.enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        write!(out, "{v:.6}")?;
    }
    out.write_all(b"\n")
}

/// Read a CSV snapshot back into a grid, skipping the header row.
pub fn read_csv_field(path: &Path) -> Result<Grid, OutputError> {
    let text = fs::read_to_string(path).map_err(|e| OutputError::io(path, e))?;
    let malformed = |line: usize, reason: String| OutputError::Malformed {
        path: path.to_path_buf(),
        line,
        reason,
    };

    let mut lines = text.lines().enumerate();
    let size = match lines.next() {
        Some((_, header)) => header.split(',').count(),
        None => return Err(malformed(1, "empty file".into())),
    };

    let mut data = Vec::with_capacity(size * size);
    for (idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let before = data.len();
        for cell in line.split(',') {
            let value: f32 = cell
                .trim()
                .parse()
                .map_err(|_| malformed(idx + 1, format!("invalid value '{cell}'")))?;
            data.push(value);
        }
        if data.len() - before != size {
            return Err(malformed(
                idx + 1,
                format!("expected {size} values, found {}", data.len() - before),
            ));
        }
    }

    Grid::from_vec(size, data).ok_or_else(|| malformed(size + 1, format!("expected {size} data rows")))
}
