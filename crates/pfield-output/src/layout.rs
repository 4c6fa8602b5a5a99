//! Output tree naming.

use std::path::{Path, PathBuf};

use pfield_core::OutputFormat;

/// Run directory: `<root>/<TAG>_<SIZE>S_<ITERS>ITERS`.
pub fn run_directory(root: &Path, tag: &str, size: usize, iterations: u32) -> PathBuf {
    root.join(format!("{tag}_{size}S_{iterations}ITERS"))
}

/// Snapshot file name: `<LABEL>_<iteration>.<ext>`.
pub fn snapshot_file_name(label: &str, iteration: u32, format: OutputFormat) -> String {
    format!("{label}_{iteration}.{}", format.extension())
}
