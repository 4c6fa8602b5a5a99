//! Kobayashi dendritic solidification, isotropic and anisotropic.
//!
//! Both variants evolve a phase field `p` and a temperature field `T`
//! with one shared kernel:
//!
//! ```text
//! m  = α/π · atan(γ (T_melt − T))
//! Δp = Δt/τ · ( ∂y(ε ε' ∂x p) − ∂x(ε ε' ∂y p) + ε² ∇²p
//!              + p (1 − p)(p − ½ + m) + noise · p (1 − p) )
//! p' = p + Δp
//! T' = T + Δt · D ∇²T + L · Δp
//! ```
//!
//! The anisotropic variant uses `ε = ε̄ (1 + δ cos(j (θ − θ₀)))` with
//! `θ = atan2(∂y p, ∂x p)`; the isotropic variant uses `ε = ε̄`, `ε' = 0`
//! and holds its edge rows and columns at the configured boundary values.

use std::f32::consts::PI;
use std::sync::Arc;

use pfield_arena::init;
use pfield_core::{ConfigError, ConfigRecords, SimulationConfig};
use pfield_device::host::{ArgAccess, HostKernel, HostKernelFactory, KernelIo};
use pfield_device::{DeviceError, KernelArg, KernelArgs, KernelDefines};
use rand_chacha::ChaCha8Rng;
use smallvec::smallvec;

use crate::buffers::{FieldInit, InitialFields, ModelBuffers};
use crate::model::{FieldLayout, Model, ModelKind};
use crate::noise::NoiseSchedule;
use crate::stencil::{grad_x, grad_y, laplacian};

/// Field labels shared by both variants.
const FIELDS: &[&str] = &["PHASE", "TEMP"];

// ── Parameters ─────────────────────────────────────────────────────

/// Fixed values for the four edges of the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeValues {
    /// Column 0.
    pub left: f32,
    /// Last column.
    pub right: f32,
    /// Row 0.
    pub top: f32,
    /// Last row.
    pub bottom: f32,
}

impl EdgeValues {
    fn from_records(records: &ConfigRecords, prefix: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            left: records.require(&format!("{prefix}_LEFT"))?,
            right: records.require(&format!("{prefix}_RIGHT"))?,
            top: records.require(&format!("{prefix}_TOP"))?,
            bottom: records.require(&format!("{prefix}_BOTTOM"))?,
        })
    }

    /// Value for an edge cell, or `None` for interior cells. Rows win at
    /// the corners.
    fn at(&self, row: usize, col: usize, size: usize) -> Option<f32> {
        let last = size - 1;
        if row == 0 {
            Some(self.top)
        } else if row == last {
            Some(self.bottom)
        } else if col == 0 {
            Some(self.left)
        } else if col == last {
            Some(self.right)
        } else {
            None
        }
    }
}

/// Isotropic Kobayashi parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KobayashiIsoParams {
    /// `EPS_BAR`: mean interface thickness.
    pub eps_bar: f32,
    /// `ALPHA`.
    pub alpha: f32,
    /// `GAMMA`.
    pub gamma: f32,
    /// `TAU`: phase relaxation time.
    pub tau: f32,
    /// `NOISE_AMP`.
    pub noise_amplitude: f32,
    /// `PHASE_BOUND_{LEFT,RIGHT,TOP,BOTTOM}`.
    pub phase_bound: EdgeValues,
    /// `THERMAL_DIFFUSIVITY`.
    pub thermal_diffusivity: f32,
    /// `LATENT_HEAT_SLD`.
    pub latent_heat: f32,
    /// `TEMP_INIT`.
    pub temp_init: f32,
    /// `TEMP_MELT`.
    pub temp_melt: f32,
    /// `TEMP_BOUND_{LEFT,RIGHT,TOP,BOTTOM}`.
    pub temp_bound: EdgeValues,
}

impl KobayashiIsoParams {
    /// Load from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        Ok(Self {
            eps_bar: records.require("EPS_BAR")?,
            alpha: records.require("ALPHA")?,
            gamma: records.require("GAMMA")?,
            tau: records.require("TAU")?,
            noise_amplitude: records.require("NOISE_AMP")?,
            phase_bound: EdgeValues::from_records(records, "PHASE_BOUND")?,
            thermal_diffusivity: records.require("THERMAL_DIFFUSIVITY")?,
            latent_heat: records.require("LATENT_HEAT_SLD")?,
            temp_init: records.require("TEMP_INIT")?,
            temp_melt: records.require("TEMP_MELT")?,
            temp_bound: EdgeValues::from_records(records, "TEMP_BOUND")?,
        })
    }
}

/// Anisotropic Kobayashi parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KobayashiAnisoParams {
    /// `EPS_BAR`.
    pub eps_bar: f32,
    /// `ALPHA`.
    pub alpha: f32,
    /// `GAMMA`.
    pub gamma: f32,
    /// `DELTA`: anisotropy strength.
    pub delta: f32,
    /// `J`: anisotropy mode number.
    pub j: f32,
    /// `TAU`.
    pub tau: f32,
    /// `THETA0`: preferred growth angle.
    pub theta0: f32,
    /// `NOISE_AMP`.
    pub noise_amplitude: f32,
    /// `THERMAL_DIFFUSIVITY`.
    pub thermal_diffusivity: f32,
    /// `LATENT_HEAT_SLD`.
    pub latent_heat: f32,
    /// `TEMP_INIT`.
    pub temp_init: f32,
    /// `TEMP_MELT`.
    pub temp_melt: f32,
    /// `TEMP_BOUND`: temperature of the initial seed.
    pub temp_bound: f32,
}

impl KobayashiAnisoParams {
    /// Load from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        Ok(Self {
            eps_bar: records.require("EPS_BAR")?,
            alpha: records.require("ALPHA")?,
            gamma: records.require("GAMMA")?,
            delta: records.require("DELTA")?,
            j: records.require("J")?,
            tau: records.require("TAU")?,
            theta0: records.require("THETA0")?,
            noise_amplitude: records.require("NOISE_AMP")?,
            thermal_diffusivity: records.require("THERMAL_DIFFUSIVITY")?,
            latent_heat: records.require("LATENT_HEAT_SLD")?,
            temp_init: records.require("TEMP_INIT")?,
            temp_melt: records.require("TEMP_MELT")?,
            temp_bound: records.require("TEMP_BOUND")?,
        })
    }
}

// ── Models ─────────────────────────────────────────────────────────

fn bind_phase_temp(buffers: &mut ModelBuffers, noise: f32) -> Result<KernelArgs, DeviceError> {
    let (p_in, p_out) = buffers.pair_mut(0)?.bind();
    let (t_in, t_out) = buffers.pair_mut(1)?.bind();
    Ok(smallvec![
        KernelArg::Buffer(p_in),
        KernelArg::Buffer(p_out),
        KernelArg::Buffer(t_in),
        KernelArg::Buffer(t_out),
        KernelArg::Scalar(noise),
    ])
}

/// Isotropic dendritic growth with fixed edge values. Both fields start
/// uniform: phase 1 and temperature `TEMP_INIT`.
#[derive(Clone, Debug)]
pub struct KobayashiIso {
    params: KobayashiIsoParams,
}

impl KobayashiIso {
    /// Model with the given parameters.
    pub fn new(params: KobayashiIsoParams) -> Self {
        Self { params }
    }

    /// Load parameters from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        KobayashiIsoParams::from_records(records).map(Self::new)
    }

    /// Model parameters.
    pub fn params(&self) -> &KobayashiIsoParams {
        &self.params
    }
}

impl Model for KobayashiIso {
    fn kind(&self) -> ModelKind {
        ModelKind::KobayashiIso
    }

    fn defines(&self, config: &SimulationConfig) -> KernelDefines {
        let p = &self.params;
        KernelDefines::new()
            .int("SIZE", config.size as i64)
            .float("H", config.dx)
            .float("DT", config.dt)
            .float("EPS_BAR", p.eps_bar)
            .float("ALPHA", p.alpha)
            .float("GAMMA", p.gamma)
            .float("TAU", p.tau)
            .float("PH_L", p.phase_bound.left)
            .float("PH_R", p.phase_bound.right)
            .float("PH_T", p.phase_bound.top)
            .float("PH_B", p.phase_bound.bottom)
            .float("THERM_DIFF", p.thermal_diffusivity)
            .float("LAT_H", p.latent_heat)
            .float("T_MELT", p.temp_melt)
            .float("T_L", p.temp_bound.left)
            .float("T_R", p.temp_bound.right)
            .float("T_T", p.temp_bound.top)
            .float("T_B", p.temp_bound.bottom)
    }

    fn layout(&self) -> FieldLayout {
        FieldLayout {
            fields: FIELDS,
            work_buffers: 0,
        }
    }

    fn initial_fields(&self, config: &SimulationConfig, _rng: &mut ChaCha8Rng) -> InitialFields {
        let n = config.size;
        let p = &self.params;
        let (pb, tb) = (p.phase_bound, p.temp_bound);
        InitialFields {
            fields: vec![
                FieldInit {
                    label: "PHASE",
                    a: init::with_boundary(n, 1.0, pb.left, pb.right, pb.top, pb.bottom),
                    b: init::uniform(n, 1.0),
                },
                FieldInit {
                    label: "TEMP",
                    a: init::with_boundary(n, p.temp_init, tb.left, tb.right, tb.top, tb.bottom),
                    b: init::uniform(n, p.temp_init),
                },
            ],
            work: Vec::new(),
        }
    }

    fn bind_half_step(
        &self,
        buffers: &mut ModelBuffers,
        noise: f32,
    ) -> Result<KernelArgs, DeviceError> {
        bind_phase_temp(buffers, noise)
    }

    fn noise_schedule(&self) -> Option<NoiseSchedule> {
        Some(NoiseSchedule::new(self.params.noise_amplitude))
    }

    fn host_kernel(&self) -> Arc<dyn HostKernelFactory> {
        Arc::new(KobayashiKernel::build_iso)
    }
}

/// Anisotropic dendritic growth from a central seed, periodic boundaries.
///
/// Phase starts at 1 with a disc of 0 of radius `SIZE/32`; temperature
/// starts at `TEMP_INIT` with the same disc at `TEMP_BOUND`.
#[derive(Clone, Debug)]
pub struct KobayashiAniso {
    params: KobayashiAnisoParams,
}

impl KobayashiAniso {
    /// Model with the given parameters.
    pub fn new(params: KobayashiAnisoParams) -> Self {
        Self { params }
    }

    /// Load parameters from configuration records.
    pub fn from_records(records: &ConfigRecords) -> Result<Self, ConfigError> {
        KobayashiAnisoParams::from_records(records).map(Self::new)
    }

    /// Model parameters.
    pub fn params(&self) -> &KobayashiAnisoParams {
        &self.params
    }
}

impl Model for KobayashiAniso {
    fn kind(&self) -> ModelKind {
        ModelKind::KobayashiAniso
    }

    fn defines(&self, config: &SimulationConfig) -> KernelDefines {
        let p = &self.params;
        KernelDefines::new()
            .int("SIZE", config.size as i64)
            .float("H", config.dx)
            .float("EPS_BAR", p.eps_bar)
            .float("ALPHA", p.alpha)
            .float("GAMMA", p.gamma)
            .float("DELTA", p.delta)
            .float("TAU", p.tau)
            .float("THETA0", p.theta0)
            .float("J", p.j)
            .float("DT", config.dt)
            .float("THERM_DIFF", p.thermal_diffusivity)
            .float("LAT_H", p.latent_heat)
            .float("T_MELT", p.temp_melt)
    }

    fn layout(&self) -> FieldLayout {
        FieldLayout {
            fields: FIELDS,
            work_buffers: 0,
        }
    }

    fn initial_fields(&self, config: &SimulationConfig, _rng: &mut ChaCha8Rng) -> InitialFields {
        let n = config.size;
        let p = &self.params;
        let mut phase = init::uniform(n, 1.0);
        init::stamp_circle(&mut phase, n / 32, 0.0);
        let mut temp = init::uniform(n, p.temp_init);
        init::stamp_circle(&mut temp, n / 32, p.temp_bound);
        InitialFields {
            fields: vec![
                FieldInit {
                    label: "PHASE",
                    a: phase,
                    b: init::uniform(n, 1.0),
                },
                FieldInit {
                    label: "TEMP",
                    a: temp,
                    b: init::uniform(n, p.temp_init),
                },
            ],
            work: Vec::new(),
        }
    }

    fn bind_half_step(
        &self,
        buffers: &mut ModelBuffers,
        noise: f32,
    ) -> Result<KernelArgs, DeviceError> {
        bind_phase_temp(buffers, noise)
    }

    fn noise_schedule(&self) -> Option<NoiseSchedule> {
        Some(NoiseSchedule::new(self.params.noise_amplitude))
    }

    fn host_kernel(&self) -> Arc<dyn HostKernelFactory> {
        Arc::new(KobayashiKernel::build_aniso)
    }
}

// ── Host kernel ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum Interface {
    Isotropic {
        phase_bound: EdgeValues,
        temp_bound: EdgeValues,
    },
    Anisotropic {
        delta: f32,
        j: f32,
        theta0: f32,
    },
}

/// Phase/temperature update shared by both variants.
#[derive(Clone, Debug)]
pub struct KobayashiKernel {
    size: usize,
    h: f32,
    dt: f32,
    eps_bar: f32,
    alpha: f32,
    gamma: f32,
    tau: f32,
    thermal_diffusivity: f32,
    latent_heat: f32,
    temp_melt: f32,
    interface: Interface,
    // ε ε' ∂x p and ε ε' ∂y p, then ε², filled by the first pass.
    flux_x: Vec<f32>,
    flux_y: Vec<f32>,
    eps_sq: Vec<f32>,
}

impl KobayashiKernel {
    fn common(defines: &KernelDefines, interface: Interface) -> Result<Self, String> {
        let size = defines.get_usize("SIZE")?;
        Ok(Self {
            size,
            h: defines.get_f32("H")?,
            dt: defines.get_f32("DT")?,
            eps_bar: defines.get_f32("EPS_BAR")?,
            alpha: defines.get_f32("ALPHA")?,
            gamma: defines.get_f32("GAMMA")?,
            tau: defines.get_f32("TAU")?,
            thermal_diffusivity: defines.get_f32("THERM_DIFF")?,
            latent_heat: defines.get_f32("LAT_H")?,
            temp_melt: defines.get_f32("T_MELT")?,
            interface,
            flux_x: vec![0.0; size * size],
            flux_y: vec![0.0; size * size],
            eps_sq: vec![0.0; size * size],
        })
    }

    /// Isotropic kernel from injected definitions.
    pub fn build_iso(defines: &KernelDefines) -> Result<Box<dyn HostKernel>, String> {
        let interface = Interface::Isotropic {
            phase_bound: EdgeValues {
                left: defines.get_f32("PH_L")?,
                right: defines.get_f32("PH_R")?,
                top: defines.get_f32("PH_T")?,
                bottom: defines.get_f32("PH_B")?,
            },
            temp_bound: EdgeValues {
                left: defines.get_f32("T_L")?,
                right: defines.get_f32("T_R")?,
                top: defines.get_f32("T_T")?,
                bottom: defines.get_f32("T_B")?,
            },
        };
        Ok(Box::new(Self::common(defines, interface)?))
    }

    /// Anisotropic kernel from injected definitions.
    pub fn build_aniso(defines: &KernelDefines) -> Result<Box<dyn HostKernel>, String> {
        let interface = Interface::Anisotropic {
            delta: defines.get_f32("DELTA")?,
            j: defines.get_f32("J")?,
            theta0: defines.get_f32("THETA0")?,
        };
        Ok(Box::new(Self::common(defines, interface)?))
    }

    /// `(ε, ε')` for the interface normal angle `theta`.
    fn epsilon(&self, theta: f32) -> (f32, f32) {
        match self.interface {
            Interface::Isotropic { .. } => (self.eps_bar, 0.0),
            Interface::Anisotropic { delta, j, theta0 } => {
                let arg = j * (theta - theta0);
                (
                    self.eps_bar * (1.0 + delta * arg.cos()),
                    -self.eps_bar * j * delta * arg.sin(),
                )
            }
        }
    }
}

impl HostKernel for KobayashiKernel {
    fn signature(&self) -> &[ArgAccess] {
        &[
            ArgAccess::Read,
            ArgAccess::Write,
            ArgAccess::Read,
            ArgAccess::Write,
            ArgAccess::Scalar,
        ]
    }

    fn execute(&mut self, io: &mut KernelIo<'_>) -> Result<(), String> {
        let n = self.size;
        if io.size() != n {
            return Err(format!("launch size {} does not match SIZE={n}", io.size()));
        }
        let p = io.read(0)?;
        let t = io.read(2)?;
        let noise = io.scalar(4)?;
        let p_out = io.take_write(1)?;
        let t_out = io.take_write(3)?;
        let h = self.h;

        for row in 0..n {
            for col in 0..n {
                let i = row * n + col;
                let px = grad_x(p, n, row, col, h);
                let py = grad_y(p, n, row, col, h);
                let (eps, deps) = self.epsilon(py.atan2(px));
                self.flux_x[i] = eps * deps * px;
                self.flux_y[i] = eps * deps * py;
                self.eps_sq[i] = eps * eps;
            }
        }

        let rate = self.dt / self.tau;
        for row in 0..n {
            for col in 0..n {
                let i = row * n + col;
                if let Interface::Isotropic {
                    phase_bound,
                    temp_bound,
                } = &self.interface
                {
                    if let (Some(pb), Some(tb)) =
                        (phase_bound.at(row, col, n), temp_bound.at(row, col, n))
                    {
                        p_out[i] = pb;
                        t_out[i] = tb;
                        continue;
                    }
                }
                let pi = p[i];
                let m = self.alpha / PI * (self.gamma * (self.temp_melt - t[i])).atan();
                let term1 = grad_y(&self.flux_x, n, row, col, h);
                let term2 = -grad_x(&self.flux_y, n, row, col, h);
                let term3 = self.eps_sq[i] * laplacian(p, n, row, col, h);
                let well = pi * (1.0 - pi);
                let dp = rate * (term1 + term2 + term3 + well * (pi - 0.5 + m) + noise * well);
                p_out[i] = pi + dp;
                t_out[i] =
                    t[i] + self.dt * self.thermal_diffusivity * laplacian(t, n, row, col, h)
                        + self.latent_heat * dp;
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

    fn iso_records() -> ConfigRecords {
        ConfigRecords::parse(
            "EPS_BAR = 0.01;\nALPHA = 0.9;\nGAMMA = 10.0;\nTAU = 0.0003;\nNOISE_AMP = 0.01;\n\
             PHASE_BOUND_LEFT = 0.0;\nPHASE_BOUND_RIGHT = 1.0;\nPHASE_BOUND_TOP = 1.0;\n\
             PHASE_BOUND_BOTTOM = 1.0;\nTHERMAL_DIFFUSIVITY = 1.0;\nLATENT_HEAT_SLD = 1.8;\n\
             TEMP_INIT = 0.0;\nTEMP_MELT = 1.0;\nTEMP_BOUND_LEFT = 1.0;\nTEMP_BOUND_RIGHT = 0.0;\n\
             TEMP_BOUND_TOP = 0.0;\nTEMP_BOUND_BOTTOM = 0.0;\n",
        )
    }

    fn config(size: usize) -> SimulationConfig {
        SimulationConfig {
            size,
            dx: 0.03,
            dt: 0.0001,
            iterations: 10,
            n_save: 1,
            output_format: pfield_core::OutputFormat::Csv,
            work_group_size: 8,
            platform_id: 0,
            device_id: 0,
            seed: None,
        }
    }

    fn run(
        kernel: &mut dyn HostKernel,
        p: &[f32],
        t: &[f32],
        noise: f32,
        size: usize,
    ) -> (Vec<f32>, Vec<f32>) {
        let mut p_out = vec![0.0f32; size * size];
        let mut t_out = vec![0.0f32; size * size];
        {
            let mut io = KernelIo::new(
                vec![
                    IoSlot::Read(p),
                    IoSlot::Write(&mut p_out),
                    IoSlot::Read(t),
                    IoSlot::Write(&mut t_out),
                    IoSlot::Scalar(noise),
                ],
                LaunchGeometry::square(size, 1),
            );
            kernel.execute(&mut io).unwrap();
        }
        (p_out, t_out)
    }

    #[test]
    fn iso_holds_edges_at_boundary_values() {
        let model = KobayashiIso::from_records(&iso_records()).unwrap();
        let cfg = config(8);
        let mut kernel = KobayashiKernel::build_iso(&model.defines(&cfg)).unwrap();
        let p = vec![1.0f32; 64];
        let t = vec![0.0f32; 64];
        let (p_out, t_out) = run(kernel.as_mut(), &p, &t, 0.0, 8);
        // Left column (rows 1..7) uses the left values; corners use top/bottom.
        assert_eq!(p_out[8], 0.0);
        assert_eq!(t_out[8], 1.0);
        assert_eq!(p_out[0], 1.0);
        assert_eq!(t_out[0], 0.0);
        assert_eq!(t_out[63], 0.0);
        // Interior stays finite.
        assert!(p_out.iter().chain(&t_out).all(|v| v.is_finite()));
    }

    #[test]
    fn bulk_phases_are_fixed_points() {
        let records = ConfigRecords::parse(
            "EPS_BAR = 0.01;\nALPHA = 0.9;\nGAMMA = 10.0;\nDELTA = 0.02;\nJ = 6;\nTAU = 0.0003;\n\
             THETA0 = 0.2;\nNOISE_AMP = 0.01;\nTHERMAL_DIFFUSIVITY = 1.0;\nLATENT_HEAT_SLD = 1.8;\n\
             TEMP_INIT = 0.0;\nTEMP_MELT = 1.0;\nTEMP_BOUND = 1.0;\n",
        );
        let model = KobayashiAniso::from_records(&records).unwrap();
        let mut kernel = KobayashiKernel::build_aniso(&model.defines(&config(8))).unwrap();
        for bulk in [0.0f32, 1.0] {
            let p = vec![bulk; 64];
            let t = vec![0.5f32; 64];
            let (p_out, t_out) = run(kernel.as_mut(), &p, &t, 0.3, 8);
            assert!(p_out.iter().all(|&v| v == bulk));
            assert!(t_out.iter().all(|&v| (v - 0.5).abs() < 1e-6));
        }
    }

    #[test]
    fn iso_initial_state_carries_edges() {
        let model = KobayashiIso::from_records(&iso_records()).unwrap();
        let mut rng = <ChaCha8Rng as rand::SeedableRng>::seed_from_u64(0);
        let fields = model.initial_fields(&config(8), &mut rng);
        let phase = &fields.fields[0].a;
        let temp = &fields.fields[1].a;
        assert_eq!(phase.get(4, 0), Some(0.0));
        assert_eq!(phase.get(0, 0), Some(1.0));
        assert_eq!(phase.get(4, 4), Some(1.0));
        assert_eq!(temp.get(4, 0), Some(1.0));
        assert_eq!(temp.get(7, 7), Some(0.0));
    }

    #[test]
    fn aniso_seed_is_centred() {
        let records = ConfigRecords::parse(
            "EPS_BAR = 0.01;\nALPHA = 0.9;\nGAMMA = 10.0;\nDELTA = 0.02;\nJ = 6;\nTAU = 0.0003;\n\
             THETA0 = 0.2;\nNOISE_AMP = 0.01;\nTHERMAL_DIFFUSIVITY = 1.0;\nLATENT_HEAT_SLD = 1.8;\n\
             TEMP_INIT = 0.0;\nTEMP_MELT = 1.0;\nTEMP_BOUND = 1.0;\n",
        );
        let model = KobayashiAniso::from_records(&records).unwrap();
        let mut rng = <ChaCha8Rng as rand::SeedableRng>::seed_from_u64(0);
        let fields = model.initial_fields(&config(64), &mut rng);
        let phase = &fields.fields[0].a;
        let temp = &fields.fields[1].a;
        assert_eq!(phase.get(32, 32), Some(0.0));
        assert_eq!(phase.get(32, 35), Some(1.0));
        assert_eq!(temp.get(32, 33), Some(1.0));
        assert_eq!(temp.get(0, 0), Some(0.0));
        // Radius 64/32 = 2 covers 13 cells.
        assert_eq!(phase.sum(), (64.0 * 64.0) - 13.0);
    }

    #[test]
    fn iso_defines_include_edge_constants() {
        let model = KobayashiIso::from_records(&iso_records()).unwrap();
        let defines = model.defines(&config(16));
        for name in ["PH_L", "PH_R", "PH_T", "PH_B", "T_L", "T_R", "T_T", "T_B"] {
            assert!(defines.get(name).is_some(), "{name} missing");
        }
        assert_eq!(defines.get("SIZE"), Some("16"));
    }

    #[test]
    fn missing_anisotropy_define_fails_build() {
        let defines = KernelDefines::new()
            .int("SIZE", 8)
            .float("H", 1.0)
            .float("DT", 0.1)
            .float("EPS_BAR", 0.01);
        let err = KobayashiKernel::build_aniso(&defines).err().unwrap();
        assert!(err.contains("'DELTA'"));
    }
}
