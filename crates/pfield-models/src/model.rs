//! The [`Model`] trait and model selection.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use pfield_core::{ConfigError, ConfigRecords, SimulationConfig};
use pfield_device::host::HostKernelFactory;
use pfield_device::{DeviceError, KernelArgs, KernelDefines};
use rand_chacha::ChaCha8Rng;

use crate::buffers::{InitialFields, ModelBuffers};
use crate::cahn_hilliard::CahnHilliard;
use crate::diffusion::Diffusion;
use crate::kobayashi::{KobayashiAniso, KobayashiIso};
use crate::noise::NoiseSchedule;

// ── ModelKind ──────────────────────────────────────────────────────

/// The four supported physical systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// Linear diffusion.
    Diffusion,
    /// Cahn–Hilliard spinodal decomposition.
    CahnHilliard,
    /// Kobayashi dendritic growth, isotropic interface energy.
    KobayashiIso,
    /// Kobayashi dendritic growth, anisotropic interface energy.
    KobayashiAniso,
}

impl ModelKind {
    /// Every kind, in declaration order.
    pub const ALL: [ModelKind; 4] = [
        Self::Diffusion,
        Self::CahnHilliard,
        Self::KobayashiIso,
        Self::KobayashiAniso,
    ];

    /// Output directory tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Diffusion => "DIFFUSION",
            Self::CahnHilliard => "CAHN_HILLIARD",
            Self::KobayashiIso => "KOB_ISO",
            Self::KobayashiAniso => "KOB_ANISO",
        }
    }

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Diffusion => "diffusion",
            Self::CahnHilliard => "cahn-hilliard",
            Self::KobayashiIso => "kobayashi-iso",
            Self::KobayashiAniso => "kobayashi-aniso",
        }
    }

    fn file_stem(self) -> &'static str {
        match self {
            Self::Diffusion => "Diffusion",
            Self::CahnHilliard => "CahnHilliard",
            Self::KobayashiIso => "KobayashiIso",
            Self::KobayashiAniso => "KobayashiAniso",
        }
    }

    /// Default input file, relative to the working directory.
    pub fn default_input(self) -> String {
        format!("InputFiles/{}.in", self.file_stem())
    }

    /// Default kernel source file, relative to the working directory.
    pub fn default_kernel(self) -> String {
        format!("kernels/{}Kern.cl", self.file_stem())
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelKind {
    type Err = ConfigError;

    /// Accepts the command-line name or the output tag, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted) || k.tag().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownModel {
                name: s.to_string(),
            })
    }
}

// ── Model ──────────────────────────────────────────────────────────

/// Field labels and work buffer count of a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldLayout {
    /// Labels of the evolving fields, in binding order.
    pub fields: &'static [&'static str],
    /// Number of work buffers.
    pub work_buffers: usize,
}

/// A phase-field model driven by the evolution driver.
///
/// # Contract
///
/// - `initial_fields` returns one [`FieldInit`](crate::FieldInit) per
///   label in `layout().fields` and `layout().work_buffers` work grids,
///   each `config.size` square.
/// - `bind_half_step` binds arguments in the kernel's positional order.
///   It does not swap; the driver swaps every pair after submission.
/// - The kernel returned by `host_kernel` reads its constants from the
///   definitions produced by `defines`.
pub trait Model: Send {
    /// Which system this is.
    fn kind(&self) -> ModelKind;

    /// Output directory tag.
    fn tag(&self) -> &'static str {
        self.kind().tag()
    }

    /// Compile-time constants for the kernel program.
    fn defines(&self, config: &SimulationConfig) -> KernelDefines;

    /// Field labels and work buffers.
    fn layout(&self) -> FieldLayout;

    /// Initial host state.
    fn initial_fields(&self, config: &SimulationConfig, rng: &mut ChaCha8Rng) -> InitialFields;

    /// Kernel arguments for the next half-step.
    fn bind_half_step(
        &self,
        buffers: &mut ModelBuffers,
        noise: f32,
    ) -> Result<KernelArgs, DeviceError>;

    /// Noise injection schedule, for models that take a noise argument.
    fn noise_schedule(&self) -> Option<NoiseSchedule> {
        None
    }

    /// Native kernel for the host backend.
    fn host_kernel(&self) -> Arc<dyn HostKernelFactory>;
}

/// Load the parameters of `kind` from `records` and build the model.
pub fn build_model(kind: ModelKind, records: &ConfigRecords) -> Result<Box<dyn Model>, ConfigError> {
    Ok(match kind {
        ModelKind::Diffusion => Box::new(Diffusion::from_records(records)?),
        ModelKind::CahnHilliard => Box::new(CahnHilliard::from_records(records)?),
        ModelKind::KobayashiIso => Box::new(KobayashiIso::from_records(records)?),
        ModelKind::KobayashiAniso => Box::new(KobayashiAniso::from_records(records)?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_tags() {
        assert_eq!("diffusion".parse::<ModelKind>(), Ok(ModelKind::Diffusion));
        assert_eq!("KOB_ANISO".parse::<ModelKind>(), Ok(ModelKind::KobayashiAniso));
        assert_eq!(
            "Cahn-Hilliard".parse::<ModelKind>(),
            Ok(ModelKind::CahnHilliard)
        );
        assert!(matches!(
            "ising".parse::<ModelKind>(),
            Err(ConfigError::UnknownModel { .. })
        ));
    }

    #[test]
    fn default_paths() {
        assert_eq!(
            ModelKind::KobayashiIso.default_input(),
            "InputFiles/KobayashiIso.in"
        );
        assert_eq!(
            ModelKind::CahnHilliard.default_kernel(),
            "kernels/CahnHilliardKern.cl"
        );
    }

    #[test]
    fn build_reports_missing_model_keys() {
        let records = ConfigRecords::parse("SIZE = 8;");
        let err = build_model(ModelKind::Diffusion, &records).err();
        assert_eq!(
            err,
            Some(ConfigError::MissingKey {
                key: "DIFFUSION_COEFFICIENT".into()
            })
        );
    }
}
