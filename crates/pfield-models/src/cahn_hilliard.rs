//! Cahn–Hilliard spinodal decomposition.
//!
//! `∂c/∂t = M ∇²μ` with chemical potential `μ = c³ − c − κ∇²c`. The
//! kernel computes `μ` into a work buffer bound at position 0, then
//! applies the conserved update.

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

/// Cahn–Hilliard parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CahnHilliardParams {
    /// `MEAN_CONCENTRATION`.
    pub mean_concentration: f32,
    /// `NOISE_AMP`: spread of the random initial concentration.
    pub noise_amplitude: f32,
    /// `KAPPA`: gradient energy coefficient.
    pub kappa: f32,
    /// `MOBILITY`.
    pub mobility: f32,
}

impl CahnHilliardParams {
    /// Load from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        Ok(Self {
            mean_concentration: records.require("MEAN_CONCENTRATION")?,
            noise_amplitude: records.require("NOISE_AMP")?,
            kappa: records.require("KAPPA")?,
            mobility: records.require("MOBILITY")?,
        })
    }
}

/// The Cahn–Hilliard model.
#[derive(Clone, Debug)]
pub struct CahnHilliard {
    params: CahnHilliardParams,
}

impl CahnHilliard {
    /// Model with the given parameters.
    pub fn new(params: CahnHilliardParams) -> Self {
        Self { params }
    }

    /// Load parameters from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        CahnHilliardParams::from_records(records).map(Self::new)
    }

    /// Model parameters.
    pub fn params(&self) -> &CahnHilliardParams {
        &self.params
    }
}

impl Model for CahnHilliard {
    fn kind(&self) -> ModelKind {
        ModelKind::CahnHilliard
    }

    fn defines(&self, config: &SimulationConfig) -> KernelDefines {
        KernelDefines::new()
            .int("SIZE", config.size as i64)
            .float("H", config.dx)
            .float("DT", config.dt)
            .float("MOBILITY", self.params.mobility)
            .float("KAPPA", self.params.kappa)
    }

    fn layout(&self) -> FieldLayout {
        FieldLayout {
            fields: &["PHASE"],
            work_buffers: 1,
        }
    }

    fn initial_fields(&self, config: &SimulationConfig, rng: &mut ChaCha8Rng) -> InitialFields {
        let p = &self.params;
        InitialFields {
            fields: vec![FieldInit {
                label: "PHASE",
                a: init::random_with(config.size, p.mean_concentration, p.noise_amplitude, rng),
                b: init::uniform(config.size, 0.0),
            }],
            work: vec![init::uniform(config.size, 0.0)],
        }
    }

    fn bind_half_step(
        &self,
        buffers: &mut ModelBuffers,
        _noise: f32,
    ) -> Result<KernelArgs, DeviceError> {
        let mu = buffers.work_mut(0)?.bind();
        let (input, output) = buffers.pair_mut(0)?.bind();
        Ok(smallvec![
            KernelArg::Buffer(mu),
            KernelArg::Buffer(input),
            KernelArg::Buffer(output),
        ])
    }

    fn host_kernel(&self) -> Arc<dyn HostKernelFactory> {
        Arc::new(CahnHilliardKernel::build)
    }
}

// ── Host kernel ────────────────────────────────────────────────────

/// Two-pass Cahn–Hilliard update, periodic boundaries.
#[derive(Clone, Debug)]
pub struct CahnHilliardKernel {
    size: usize,
    h: f32,
    dt: f32,
    mobility: f32,
    kappa: f32,
}

impl CahnHilliardKernel {
    /// Instantiate from injected definitions.
    pub fn build(defines: &KernelDefines) -> Result<Box<dyn HostKernel>, String> {
        Ok(Box::new(Self {
            size: defines.get_usize("SIZE")?,
            h: defines.get_f32("H")?,
            dt: defines.get_f32("DT")?,
            mobility: defines.get_f32("MOBILITY")?,
            kappa: defines.get_f32("KAPPA")?,
        }))
    }
}

impl HostKernel for CahnHilliardKernel {
    fn signature(&self) -> &[ArgAccess] {
        &[ArgAccess::ReadWrite, ArgAccess::Read, ArgAccess::Write]
    }

    fn execute(&mut self, io: &mut KernelIo<'_>) -> Result<(), String> {
        if io.size() != self.size {
            return Err(format!(
                "launch size {} does not match SIZE={}",
                io.size(),
                self.size
            ));
        }
        let mu = io.take_write(0)?;
        let c = io.read(1)?;
        let out = io.take_write(2)?;
        let n = self.size;

        for row in 0..n {
            for col in 0..n {
                let i = row * n + col;
                let ci = c[i];
                mu[i] = ci * ci * ci - ci - self.kappa * laplacian(c, n, row, col, self.h);
            }
        }
        let rate = self.dt * self.mobility;
        for row in 0..n {
            for col in 0..n {
                let i = row * n + col;
                out[i] = c[i] + rate * laplacian(mu, n, row, col, self.h);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pfield_device::host::IoSlot;
    use pfield_device::LaunchGeometry;
    use rand::SeedableRng;

    fn kernel(size: usize) -> Box<dyn HostKernel> {
        let defines = KernelDefines::new()
            .int("SIZE", size as i64)
            .float("H", 1.0)
            .float("DT", 0.01)
            .float("MOBILITY", 1.0)
            .float("KAPPA", 0.5);
        CahnHilliardKernel::build(&defines).unwrap()
    }

    fn step(kernel: &mut dyn HostKernel, c: &[f32], size: usize) -> Vec<f32> {
        let mut mu = vec![0.0f32; size * size];
        let mut out = vec![0.0f32; size * size];
        let mut io = KernelIo::new(
            vec![IoSlot::Write(&mut mu), IoSlot::Read(c), IoSlot::Write(&mut out)],
            LaunchGeometry::square(size, 1),
        );
        kernel.execute(&mut io).unwrap();
        drop(io);
        out
    }

    #[test]
    fn uniform_field_is_stationary() {
        let mut k = kernel(4);
        let c = vec![0.3f32; 16];
        let out = step(k.as_mut(), &c, 4);
        assert!(out.iter().all(|&v| (v - 0.3).abs() < 1e-6));
    }

    #[test]
    fn mass_is_conserved() {
        let model = CahnHilliard::new(CahnHilliardParams {
            mean_concentration: 0.0,
            noise_amplitude: 0.1,
            kappa: 0.5,
            mobility: 1.0,
        });
        let config = SimulationConfig {
            size: 16,
            dx: 1.0,
            dt: 0.01,
            iterations: 1,
            n_save: 1,
            output_format: pfield_core::OutputFormat::Csv,
            work_group_size: 4,
            platform_id: 0,
            device_id: 0,
            seed: Some(1),
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let init = model.initial_fields(&config, &mut rng);
        let mut c = init.fields[0].a.as_slice().to_vec();
        let before: f64 = c.iter().map(|&v| f64::from(v)).sum();
        let mut k = kernel(16);
        for _ in 0..20 {
            c = step(k.as_mut(), &c, 16);
        }
        let after: f64 = c.iter().map(|&v| f64::from(v)).sum();
        assert!((before - after).abs() < 1e-3);
    }

    #[test]
    fn work_buffer_binds_first() {
        let model = CahnHilliard::new(CahnHilliardParams {
            mean_concentration: 0.0,
            noise_amplitude: 0.0,
            kappa: 1.0,
            mobility: 1.0,
        });
        let sig = CahnHilliardKernel::build(&model.defines(&SimulationConfig {
            size: 8,
            dx: 1.0,
            dt: 0.1,
            iterations: 1,
            n_save: 1,
            output_format: pfield_core::OutputFormat::Vtk,
            work_group_size: 8,
            platform_id: 0,
            device_id: 0,
            seed: None,
        }))
        .unwrap()
        .signature()
        .to_vec();
        assert_eq!(sig[0], ArgAccess::ReadWrite);
        assert_eq!(model.layout().work_buffers, 1);
    }
}
