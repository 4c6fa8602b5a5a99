//! Benchmark profiles for the pfield simulation driver.
//!
//! - [`bench_config`]: a seeded configuration that never reaches its
//!   final iteration, so drivers can be stepped indefinitely
//! - [`model_context`]: a host-backed context for any model
//! - [`DiscardSink`]: a checkpoint sink that drops every write

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use pfield_core::{
    CheckpointSink, ConfigRecords, Grid, OutputFormat, SimError, SimulationConfig,
};
use pfield_device::host::{self, HostDevice, HostPlatform};
use pfield_engine::SimulationContext;
use pfield_models::{build_model, ModelKind};

/// Kernel text accepted by the host backend.
pub const BENCH_KERNEL_SOURCE: &str =
    "__kernel void phase_field_evol_kern(__global float *in, __global float *out) {}\n";

/// Model keys for every model, with values that are stable at `DX = 0.03`,
/// `DT = 1e-5`.
pub const BENCH_MODEL_KEYS: &str = "\
DIFFUSION_COEFFICIENT = 1.0;
MEAN_CONCENTRATION = 0.0;
NOISE_AMP = 0.01;
KAPPA = 0.0005;
MOBILITY = 1.0;
EPS_BAR = 0.01;
ALPHA = 0.9;
GAMMA = 10.0;
DELTA = 0.02;
J = 6;
TAU = 0.0003;
THETA0 = 0.2;
PHASE_BOUND_LEFT = 0.0;
PHASE_BOUND_RIGHT = 1.0;
PHASE_BOUND_TOP = 1.0;
PHASE_BOUND_BOTTOM = 1.0;
THERMAL_DIFFUSIVITY = 1.0;
LATENT_HEAT_SLD = 1.8;
TEMP_INIT = 0.0;
TEMP_MELT = 1.0;
TEMP_BOUND = 1.0;
TEMP_BOUND_LEFT = 1.0;
TEMP_BOUND_RIGHT = 0.0;
TEMP_BOUND_TOP = 0.0;
TEMP_BOUND_BOTTOM = 0.0;
";

/// A `size`×`size` configuration with an advised work group and a fixed
/// seed. Only iteration 0 is checkpointed.
pub fn bench_config(size: usize) -> SimulationConfig {
    SimulationConfig {
        size,
        dx: 0.03,
        dt: 1e-5,
        iterations: u32::MAX,
        n_save: 1,
        output_format: OutputFormat::Csv,
        work_group_size: 0,
        platform_id: 0,
        device_id: 0,
        seed: Some(0x5EED),
    }
}

/// A host-backed context for `kind` at `size`.
pub fn model_context(
    kind: ModelKind,
    size: usize,
) -> Result<SimulationContext<HostDevice>, SimError> {
    let model = build_model(kind, &ConfigRecords::parse(BENCH_MODEL_KEYS))?;
    let device = host::open(&HostPlatform::enumerate(), 0, 0, model.host_kernel())?;
    SimulationContext::initialize(bench_config(size), model, device, BENCH_KERNEL_SOURCE)
}

/// Drops every checkpoint.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardSink;

impl CheckpointSink for DiscardSink {
    fn write_field(&mut self, _label: &str, _iteration: u32, _grid: &Grid) -> Result<(), SimError> {
        Ok(())
    }
}
