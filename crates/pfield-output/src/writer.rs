//! The checkpoint sink that writes snapshot files.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use pfield_core::{CheckpointSink, Grid, OutputFormat, SimError, SimulationConfig};

use crate::csv::write_csv;
use crate::error::OutputError;
use crate::layout::{run_directory, snapshot_file_name};
use crate::vtk::write_vtk;

/// Writes one file per field per checkpoint into the run directory.
#[derive(Debug)]
pub struct SnapshotWriter {
    directory: PathBuf,
    format: OutputFormat,
    spacing: f32,
    written: Vec<PathBuf>,
}

impl SnapshotWriter {
    /// Create (if absent) the run directory for `tag` under `root`.
    pub fn create(root: &Path, tag: &str, config: &SimulationConfig) -> Result<Self, OutputError> {
        let directory = run_directory(root, tag, config.size, config.iterations);
        fs::create_dir_all(&directory).map_err(|e| OutputError::io(&directory, e))?;
        Ok(Self {
            directory,
            format: config.output_format,
            spacing: config.dx,
            written: Vec::new(),
        })
    }

    /// Run directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Every file written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Write one snapshot and return its path.
    pub fn write_snapshot(
        &mut self,
        label: &str,
        iteration: u32,
        grid: &Grid,
    ) -> Result<PathBuf, OutputError> {
        let path = self
            .directory
            .join(snapshot_file_name(label, iteration, self.format));
        let file = File::create(&path).map_err(|e| OutputError::io(&path, e))?;
        let mut out = BufWriter::new(file);
        match self.format {
            OutputFormat::Csv => write_csv(&mut out, grid),
            OutputFormat::Vtk => write_vtk(&mut out, label, grid, self.spacing),
        }
        .and_then(|()| out.flush())
        .map_err(|e| OutputError::io(&path, e))?;
        tracing::info!("   : Completed writing data to file {}", path.display());
        self.written.push(path.clone());
        Ok(path)
    }
}

impl CheckpointSink for SnapshotWriter {
    fn write_field(&mut self, label: &str, iteration: u32, grid: &Grid) -> Result<(), SimError> {
        self.write_snapshot(label, iteration, grid)?;
        Ok(())
    }
}
