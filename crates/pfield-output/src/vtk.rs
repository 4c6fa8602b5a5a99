//! Legacy ASCII VTK structured-points format.

use std::io::{self, Write};

use pfield_core::Grid;

/// Write `grid` as a legacy VTK structured-points dataset.
///
/// `label` names the dataset (`<label>_fields`); `spacing` is the grid
/// spacing in both in-plane directions.
pub fn write_vtk<W: Write>(out: &mut W, label: &str, grid: &Grid, spacing: f32) -> io::Result<()> {
    let size = grid.size();
    let h = sci(f64::from(spacing));
    writeln!(out, "# vtk DataFile Version 3.0")?;
    writeln!(out, "{label}_fields")?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET STRUCTURED_POINTS")?;
    writeln!(out, "DIMENSIONS {size} {size} 1")?;
    writeln!(out, "ORIGIN 0 0 0")?;
    writeln!(out, "SPACING {h} {h} {}", sci(1.0))?;
    writeln!(out, "POINT_DATA {}", size * size)?;
    writeln!(out, "SCALARS FCC double 1")?;
    writeln!(out, "LOOKUP_TABLE default")?;
    for &v in grid.as_slice() {
        writeln!(out, "{}", sci(f64::from(v)))?;
    }
    Ok(())
}

/// Scientific notation with six mantissa decimals and a signed,
/// at-least-two-digit exponent: `1.500000e-03`.
pub fn sci(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let raw = format!("{value:.6e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}
