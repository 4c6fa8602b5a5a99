//! pfield: a phase-field simulation driver.
//!
//! This is the top-level facade crate that re-exports the public API of
//! the pfield sub-crates and provides [`run_simulation`], the whole
//! pipeline from input file to snapshot tree.
//!
//! # Quick start
//!
//! ```no_run
//! use pfield::prelude::*;
//!
//! let options = RunOptions::for_model(ModelKind::Diffusion);
//! let report = pfield::run_simulation(&options)?;
//! println!("{} checkpoints", report.checkpoints.len());
//! # Ok::<(), SimError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `pfield-core` | `Grid`, configuration, errors, `CheckpointSink` |
//! | [`arena`] | `pfield-arena` | Allocation policies, `Mirrored`, `BufferPair` |
//! | [`device`] | `pfield-device` | `ComputeDevice`, program loading, host backend, advisor |
//! | [`models`] | `pfield-models` | `Model` trait and the four phase-field models |
//! | [`engine`] | `pfield-engine` | `SimulationContext`, `EvolutionDriver` |
//! | [`output`] | `pfield-output` | CSV and VTK snapshot writers |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

/// Core types, configuration, and errors (`pfield-core`).
pub use pfield_core as types;

/// Grid allocation and buffer management (`pfield-arena`).
pub use pfield_arena as arena;

/// Compute devices, program loading, and the host backend (`pfield-device`).
pub use pfield_device as device;

/// The [`models::Model`] trait and its four implementations (`pfield-models`).
pub use pfield_models as models;

/// Evolution driver (`pfield-engine`).
pub use pfield_engine as engine;

/// Snapshot writers (`pfield-output`).
pub use pfield_output as output;

use pfield_core::{ConfigRecords, SimError, SimulationConfig};
use pfield_device::host::{self, HostPlatform};
use pfield_device::{load_source, ComputeDevice};
use pfield_engine::{EvolutionDriver, RunReport, SimulationContext};
use pfield_models::{build_model, ModelKind};
use pfield_output::SnapshotWriter;

/// Common imports for typical pfield usage.
pub mod prelude {
    pub use pfield_core::{
        CheckpointSink, ConfigError, ConfigRecords, Grid, OutputFormat, SimError,
        SimulationConfig,
    };
    pub use pfield_device::{ComputeDevice, DeviceError, KernelDefines};
    pub use pfield_engine::{DriverState, EvolutionDriver, RunReport, SimulationContext};
    pub use pfield_models::{build_model, Model, ModelKind};
    pub use pfield_output::SnapshotWriter;

    pub use crate::{run_simulation, RunOptions};
}

// ── RunOptions ─────────────────────────────────────────────────────

/// Inputs of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOptions {
    /// Model to evolve.
    pub model: ModelKind,
    /// Configuration file.
    pub input: PathBuf,
    /// Kernel program source.
    pub kernel: PathBuf,
    /// Directory under which the run directory is created.
    pub output_root: PathBuf,
    /// Overrides the `Seed` key of the input file.
    pub seed: Option<u64>,
}

impl RunOptions {
    /// Default paths for `model`: `InputFiles/<Model>.in`,
    /// `kernels/<Model>Kern.cl`, output under `OutDataFiles`.
    pub fn for_model(model: ModelKind) -> Self {
        Self {
            model,
            input: PathBuf::from(model.default_input()),
            kernel: PathBuf::from(model.default_kernel()),
            output_root: PathBuf::from("OutDataFiles"),
            seed: None,
        }
    }
}

// ── Pipeline ───────────────────────────────────────────────────────

/// Load the configuration, compile the kernel on the host backend, run
/// every iteration, and write the snapshot tree.
///
/// # Errors
///
/// Configuration and build errors are returned before any device work;
/// submission and I/O errors abort the run.
pub fn run_simulation(options: &RunOptions) -> Result<RunReport, SimError> {
    let records = ConfigRecords::from_file(&options.input)?;
    let mut config = SimulationConfig::from_records(&records)?;
    if options.seed.is_some() {
        config.seed = options.seed;
    }
    let model = build_model(options.model, &records)?;
    let source = load_source(&options.kernel)?;
    tracing::info!(
        model = %options.model,
        input = %options.input.display(),
        kernel = %options.kernel.display(),
        "starting run"
    );

    let device = host::open(
        &HostPlatform::enumerate(),
        config.platform_id,
        config.device_id,
        model.host_kernel(),
    )?;
    tracing::info!("   : Using device {}", device.info().name);

    let tag = model.tag();
    let mut ctx = SimulationContext::initialize(config, model, device, &source)?;
    let mut writer = SnapshotWriter::create(&options.output_root, tag, ctx.config())?;
    EvolutionDriver::new(&mut ctx).run(&mut writer)
}

/// Text report of every platform and device the host backend exposes.
pub fn device_report() -> String {
    let platforms: Vec<_> = HostPlatform::enumerate()
        .iter()
        .map(|p| p.info().clone())
        .collect();
    pfield_device::report::device_report(&platforms)
}
