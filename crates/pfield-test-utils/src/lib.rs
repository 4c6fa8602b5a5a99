//! Test fixtures and mock types for pfield development.
//!
//! - [`MemorySink`] records every checkpoint in memory.
//! - [`FailingSink`] fails after a fixed number of writes.
//! - [`fixtures`] holds configuration text, kernel sources, and a device
//!   wrapper that injects faults.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::path::PathBuf;

use pfield_core::{CheckpointSink, Grid, OutputFormat, SimError, SimulationConfig};

/// One recorded checkpoint write.
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded {
    pub label: String,
    pub iteration: u32,
    pub grid: Grid,
}

/// A [`CheckpointSink`] that keeps every write in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub writes: Vec<Recorded>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct checkpoint iterations, in write order.
    pub fn iterations(&self) -> Vec<u32> {
        let mut out: Vec<u32> = Vec::new();
        for w in &self.writes {
            if out.last() != Some(&w.iteration) {
                out.push(w.iteration);
            }
        }
        out
    }

    /// Every write of `label`, in order.
    pub fn field(&self, label: &str) -> Vec<&Recorded> {
        self.writes.iter().filter(|w| w.label == label).collect()
    }

    /// Last write of `label`.
    pub fn last(&self, label: &str) -> Option<&Recorded> {
        self.writes.iter().rev().find(|w| w.label == label)
    }
}

impl CheckpointSink for MemorySink {
    fn write_field(&mut self, label: &str, iteration: u32, grid: &Grid) -> Result<(), SimError> {
        self.writes.push(Recorded {
            label: label.to_string(),
            iteration,
            grid: grid.clone(),
        });
        Ok(())
    }
}

/// Accepts `remaining` writes, then fails every write with an I/O error.
#[derive(Debug)]
pub struct FailingSink {
    pub remaining: usize,
}

impl FailingSink {
    pub fn after(writes: usize) -> Self {
        Self { remaining: writes }
    }
}

impl CheckpointSink for FailingSink {
    fn write_field(&mut self, label: &str, iteration: u32, _grid: &Grid) -> Result<(), SimError> {
        if self.remaining == 0 {
            return Err(SimError::Io {
                path: PathBuf::from(format!("{label}_{iteration}")),
                reason: "disk full".into(),
            });
        }
        self.remaining -= 1;
        Ok(())
    }
}

/// A valid configuration with a fixed seed and an advised work group.
pub fn sim_config(size: usize, iterations: u32, n_save: u32) -> SimulationConfig {
    SimulationConfig {
        size,
        dx: 0.03,
        dt: 0.0001,
        iterations,
        n_save,
        output_format: OutputFormat::Csv,
        work_group_size: 0,
        platform_id: 0,
        device_id: 0,
        seed: Some(42),
    }
}

/// A fresh, empty directory under the system temp dir, unique per process
/// and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pfield-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}
