//! Everything a run owns: configuration, model, device, kernel, buffers.

use pfield_arena::init::wall_clock_seed;
use pfield_core::{ConfigError, SimError, SimulationConfig};
use pfield_device::{
    advise_work_group_size, compile_kernel, ComputeDevice, KernelHandle, LaunchGeometry,
};
use pfield_models::{Model, ModelBuffers};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A fully initialised simulation, ready to be driven.
///
/// Built by [`initialize`](Self::initialize); immutable in configuration
/// and model from then on. The device buffers belong to the context for
/// the whole run.
pub struct SimulationContext<D: ComputeDevice> {
    pub(crate) config: SimulationConfig,
    pub(crate) model: Box<dyn Model>,
    pub(crate) device: D,
    pub(crate) kernel: KernelHandle,
    pub(crate) geometry: LaunchGeometry,
    pub(crate) buffers: ModelBuffers,
    pub(crate) rng: ChaCha8Rng,
    seed: u64,
}

impl<D: ComputeDevice> SimulationContext<D> {
    /// Validate `config`, compile `source` with the model's definitions,
    /// settle the work-group size, and upload the initial fields.
    ///
    /// # Errors
    ///
    /// [`SimError::Configuration`] for an invalid configuration, including
    /// an advised work-group size that does not divide SIZE,
    /// [`SimError::Build`] if the program does not compile, and
    /// [`SimError::Submission`] if a buffer cannot be created.
    pub fn initialize(
        config: SimulationConfig,
        model: Box<dyn Model>,
        mut device: D,
        source: &str,
    ) -> Result<Self, SimError> {
        config.validate()?;

        let defines = model.defines(&config);
        let kernel = compile_kernel(&mut device, source, &defines)?;

        let work_group = if config.wants_advised_work_group() {
            let limits = device.kernel_limits(kernel)?;
            advise_work_group_size(&limits, config.size)
        } else {
            config.work_group_size
        };
        if config.size % work_group != 0 {
            return Err(ConfigError::OutOfRange {
                key: "WGsize".to_string(),
                reason: format!(
                    "work-group size {work_group} does not divide SIZE={}",
                    config.size
                ),
            }
            .into());
        }
        tracing::info!("   : Work group size: {work_group}");
        let geometry = LaunchGeometry::square(config.size, work_group);

        let seed = config.seed.unwrap_or_else(wall_clock_seed);
        tracing::debug!(seed, model = %model.kind(), "seeding noise generator");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let initial = model.initial_fields(&config, &mut rng);
        let buffers = ModelBuffers::upload(initial, &mut device)?;

        Ok(Self {
            config,
            model,
            device,
            kernel,
            geometry,
            buffers,
            rng,
            seed,
        })
    }

    /// Validated configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The model being evolved.
    pub fn model(&self) -> &dyn Model {
        self.model.as_ref()
    }

    /// The compute device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Launch geometry used for every half-step.
    pub fn geometry(&self) -> LaunchGeometry {
        self.geometry
    }

    /// Work-group edge in effect (configured or advised).
    pub fn work_group_size(&self) -> usize {
        self.geometry.local[0]
    }

    /// RNG seed in effect.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Device buffers of the model.
    pub fn buffers(&self) -> &ModelBuffers {
        &self.buffers
    }
}
