//! Validated simulation configuration.
//!
//! [`SimulationConfig`] holds the keys shared by every model. It is built
//! once from [`ConfigRecords`] and is immutable afterwards; model-specific
//! parameters live with their models.

use crate::error::ConfigError;
use crate::records::ConfigRecords;

// ── OutputFormat ───────────────────────────────────────────────────

/// Snapshot file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Comma-separated values (config code 0).
    Csv,
    /// Legacy ASCII VTK structured points (config code 1).
    Vtk,
}

impl OutputFormat {
    /// Map the `OutDataFileType` code to a format.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Csv),
            1 => Some(Self::Vtk),
            _ => None,
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Vtk => "vtk",
        }
    }
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Common simulation parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Grid side length (`SIZE`).
    pub size: usize,
    /// Grid spacing (`DX`).
    pub dx: f32,
    /// Timestep (`DT`).
    pub dt: f32,
    /// Number of iterations (`ITERS`).
    pub iterations: u32,
    /// Number of periodic snapshots (`NSave`).
    pub n_save: u32,
    /// Snapshot file format (`OutDataFileType`).
    pub output_format: OutputFormat,
    /// Configured work-group edge (`WGsize`). Values below 8 request the
    /// advisor.
    pub work_group_size: usize,
    /// Platform index (`platformID`).
    pub platform_id: usize,
    /// Device index within the platform (`deviceID`).
    pub device_id: usize,
    /// RNG seed (`Seed`). `None` seeds from wall-clock time.
    pub seed: Option<u64>,
}

/// Smallest explicitly configured work-group edge; anything smaller asks
/// the advisor.
pub const MIN_CONFIGURED_WORK_GROUP: usize = 8;

impl SimulationConfig {
    /// Build and validate from parsed records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        let code: u32 = records.require("OutDataFileType")?;
        let output_format =
            OutputFormat::from_code(code).ok_or_else(|| ConfigError::OutOfRange {
                key: "OutDataFileType".into(),
                reason: format!("must be 0 (CSV) or 1 (VTK), got {code}"),
            })?;
        let config = Self {
            size: records.require("SIZE")?,
            dx: records.require("DX")?,
            dt: records.require("DT")?,
            iterations: records.require("ITERS")?,
            n_save: records.require("NSave")?,
            output_format,
            work_group_size: records.require("WGsize")?,
            platform_id: records.require("platformID")?,
            device_id: records.require("deviceID")?,
            seed: records.optional("Seed")?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size == 0 {
            return Err(out_of_range("SIZE", "must be at least 1".into()));
        }
        if !self.dx.is_finite() || self.dx <= 0.0 {
            return Err(out_of_range("DX", format!("must be finite and > 0, got {}", self.dx)));
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(out_of_range("DT", format!("must be finite and > 0, got {}", self.dt)));
        }
        if self.iterations == 0 {
            return Err(out_of_range("ITERS", "must be at least 1".into()));
        }
        if self.n_save == 0 || self.n_save > self.iterations {
            return Err(out_of_range(
                "NSave",
                format!("must be in [1, ITERS={}], got {}", self.iterations, self.n_save),
            ));
        }
        if self.work_group_size >= MIN_CONFIGURED_WORK_GROUP
            && self.size % self.work_group_size != 0
        {
            return Err(out_of_range(
                "WGsize",
                format!(
                    "{} does not divide SIZE={}",
                    self.work_group_size, self.size
                ),
            ));
        }
        Ok(())
    }

    /// Whether the work-group edge should come from the advisor.
    pub fn wants_advised_work_group(&self) -> bool {
        self.work_group_size < MIN_CONFIGURED_WORK_GROUP
    }

    /// Iterations between periodic checkpoints (`ITERS / NSave`, at least 1).
    pub fn checkpoint_interval(&self) -> u32 {
        (self.iterations / self.n_save).max(1)
    }

    /// Number of cells per field.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }
}

fn out_of_range(key: &str, reason: String) -> ConfigError {
    ConfigError::OutOfRange {
        key: key.to_string(),
        reason,
    }
}
