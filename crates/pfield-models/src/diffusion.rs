//! Linear diffusion: `∂c/∂t = D ∇²c`.

use std::sync::Arc;

use pfield_arena::init;
use pfield_core::{ConfigError, ConfigRecords, SimulationConfig};
use pfield_device::host::{ArgAccess, HostKernel, HostKernelFactory, KernelIo};
use pfield_device::{DeviceError, KernelArg, KernelArgs, KernelDefines};
use rand_chacha::ChaCha8Rng;
use smallvec::smallvec;

use crate::buffers::{FieldInit, InitialFields, ModelBuffers};
use crate::model::{FieldLayout, Model, ModelKind};
use crate::stencil::laplacian;

/// Diffusion parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionParams {
    /// `DIFFUSION_COEFFICIENT`.
    pub diffusion_coefficient: f32,
}

impl DiffusionParams {
    /// Load from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        Ok(Self {
            diffusion_coefficient: records.require("DIFFUSION_COEFFICIENT")?,
        })
    }
}

/// The diffusion model. One field, initially zero with a disc of ones of
/// radius `SIZE/8` at the centre.
#[derive(Clone, Debug)]
pub struct Diffusion {
    params: DiffusionParams,
}

impl Diffusion {
    /// Model with the given parameters.
    pub fn new(params: DiffusionParams) -> Self {
        Self { params }
    }

    /// Load parameters from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        DiffusionParams::from_records(records).map(Self::new)
    }

    /// Model parameters.
    pub fn params(&self) -> &DiffusionParams {
        &self.params
    }
}

impl Model for Diffusion {
    fn kind(&self) -> ModelKind {
        ModelKind::Diffusion
    }

    fn defines(&self, config: &SimulationConfig) -> KernelDefines {
        KernelDefines::new()
            .int("SIZE", config.size as i64)
            .float("H", config.dx)
            .float("DT", config.dt)
            .float("COEFF", self.params.diffusion_coefficient)
    }

    fn layout(&self) -> FieldLayout {
        FieldLayout {
            fields: &["PHASE"],
            work_buffers: 0,
        }
    }

    fn initial_fields(&self, config: &SimulationConfig, _rng: &mut ChaCha8Rng) -> InitialFields {
        let mut phase = init::uniform(config.size, 0.0);
        init::stamp_circle(&mut phase, config.size / 8, 1.0);
        InitialFields {
            fields: vec![FieldInit {
                label: "PHASE",
                a: phase,
                b: init::uniform(config.size, 0.0),
            }],
            work: Vec::new(),
        }
    }

    fn bind_half_step(
        &self,
        buffers: &mut ModelBuffers,
        _noise: f32,
    ) -> Result<KernelArgs, DeviceError> {
        let (input, output) = buffers.pair_mut(0)?.bind();
        Ok(smallvec![KernelArg::Buffer(input), KernelArg::Buffer(output)])
    }

    fn host_kernel(&self) -> Arc<dyn HostKernelFactory> {
        Arc::new(DiffusionKernel::build)
    }
}

// ── Host kernel ────────────────────────────────────────────────────

/// `out = in + DT·COEFF·∇²in`, periodic boundaries.
#[derive(Clone, Debug)]
pub struct DiffusionKernel {
    size: usize,
    h: f32,
    dt: f32,
    coeff: f32,
}

impl DiffusionKernel {
    /// Instantiate from injected definitions.
    pub fn build(defines: &KernelDefines) -> Result<Box<dyn HostKernel>, String> {
        Ok(Box::new(Self {
            size: defines.get_usize("SIZE")?,
            h: defines.get_f32("H")?,
            dt: defines.get_f32("DT")?,
            coeff: defines.get_f32("COEFF")?,
        }))
    }
}

impl HostKernel for DiffusionKernel {
    fn signature(&self) -> &[ArgAccess] {
        &[ArgAccess::Read, ArgAccess::Write]
    }

    fn execute(&mut self, io: &mut KernelIo<'_>) -> Result<(), String> {
        if io.size() != self.size {
            return Err(format!(
                "launch size {} does not match SIZE={}",
                io.size(),
                self.size
            ));
        }
        let input = io.read(0)?;
        let out = io.take_write(1)?;
        let n = self.size;
        let rate = self.dt * self.coeff;
        for row in 0..n {
            for col in 0..n {
                let i = row * n + col;
                out[i] = input[i] + rate * laplacian(input, n, row, col, self.h);
            }
        }
        Ok(())
    }
}
