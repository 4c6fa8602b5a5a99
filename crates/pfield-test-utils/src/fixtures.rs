//! Configuration text, kernel sources, and fault-injecting devices.

use pfield_device::{
    BufferId, ComputeDevice, DeviceError, DeviceInfo, Drained, KernelArg, KernelHandle,
    KernelLimits, LaunchEvent, LaunchGeometry, LaunchTiming,
};

/// Minimal program text with the required entry point.
pub const KERNEL_SOURCE: &str = "\
__kernel void phase_field_evol_kern(__global float *in, __global float *out)
{
    int i = get_global_id(0);
    out[i] = in[i];
}
";

/// Program text without the entry point.
pub const KERNEL_SOURCE_WRONG_ENTRY: &str = "\
__kernel void evolve(__global float *in, __global float *out) {}
";

/// Diffusion input file, 32×32, 100 iterations, 10 saves.
pub const DIFFUSION_INPUT: &str = "\
# Diffusion test input
platformID = 0;
deviceID = 0;
WGsize = 0;
SIZE = 32;
DX = 0.03;
ITERS = 100;
DT = 0.0001;
NSave = 10;
OutDataFileType = 0;
Seed = 42;

DIFFUSION_COEFFICIENT = 1.0;
";

/// Cahn–Hilliard model keys.
pub const CAHN_HILLIARD_KEYS: &str = "\
MEAN_CONCENTRATION = 0.0;
NOISE_AMP = 0.1;
KAPPA = 0.0005;
MOBILITY = 1.0;
";

/// Isotropic Kobayashi model keys.
pub const KOBAYASHI_ISO_KEYS: &str = "\
EPS_BAR = 0.01;
ALPHA = 0.9;
GAMMA = 10.0;
TAU = 0.0003;
NOISE_AMP = 0.01;
PHASE_BOUND_LEFT = 0.0;
PHASE_BOUND_RIGHT = 1.0;
PHASE_BOUND_TOP = 1.0;
PHASE_BOUND_BOTTOM = 1.0;
THERMAL_DIFFUSIVITY = 1.0;
LATENT_HEAT_SLD = 1.8;
TEMP_INIT = 0.0;
TEMP_MELT = 1.0;
TEMP_BOUND_LEFT = 1.0;
TEMP_BOUND_RIGHT = 0.0;
TEMP_BOUND_TOP = 0.0;
TEMP_BOUND_BOTTOM = 0.0;
";

/// Anisotropic Kobayashi model keys.
pub const KOBAYASHI_ANISO_KEYS: &str = "\
EPS_BAR = 0.01;
ALPHA = 0.9;
GAMMA = 10.0;
DELTA = 0.02;
J = 6;
TAU = 0.0003;
THETA0 = 0.2;
NOISE_AMP = 0.01;
THERMAL_DIFFUSIVITY = 1.0;
LATENT_HEAT_SLD = 1.8;
TEMP_INIT = 0.0;
TEMP_MELT = 1.0;
TEMP_BOUND = 1.0;
";

// ── Fault-injecting device ─────────────────────────────────────────

/// Wraps a device and injects faults into submission and profiling.
pub struct FaultyDevice<D> {
    pub inner: D,
    /// Fail `profile` for every launch.
    pub fail_profiling: bool,
    /// Submissions accepted before every later one fails; `None` never
    /// fails.
    pub submits_before_failure: Option<usize>,
}

impl<D> FaultyDevice<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            fail_profiling: false,
            submits_before_failure: None,
        }
    }

    pub fn without_profiling(mut self) -> Self {
        self.fail_profiling = true;
        self
    }

    pub fn failing_submit_after(mut self, submits: usize) -> Self {
        self.submits_before_failure = Some(submits);
        self
    }
}

impl<D: ComputeDevice> ComputeDevice for FaultyDevice<D> {
    fn info(&self) -> &DeviceInfo {
        self.inner.info()
    }

    fn compile(&mut self, source: &str, options: &str) -> Result<KernelHandle, DeviceError> {
        self.inner.compile(source, options)
    }

    fn kernel_limits(&self, kernel: KernelHandle) -> Result<KernelLimits, DeviceError> {
        self.inner.kernel_limits(kernel)
    }

    fn create_buffer(&mut self, data: &[f32]) -> Result<BufferId, DeviceError> {
        self.inner.create_buffer(data)
    }

    fn submit(
        &mut self,
        kernel: KernelHandle,
        args: &[KernelArg],
        geometry: LaunchGeometry,
    ) -> Result<LaunchEvent, DeviceError> {
        match &mut self.submits_before_failure {
            Some(0) => {
                return Err(DeviceError::KernelFailed {
                    reason: "device lost".into(),
                })
            }
            Some(n) => *n -= 1,
            None => {}
        }
        self.inner.submit(kernel, args, geometry)
    }

    fn drain(&mut self) -> Result<Drained, DeviceError> {
        self.inner.drain()
    }

    fn read_back(
        &mut self,
        buffer: BufferId,
        token: &Drained,
        out: &mut [f32],
    ) -> Result<(), DeviceError> {
        self.inner.read_back(buffer, token, out)
    }

    fn profile(&self, event: &LaunchEvent) -> Result<LaunchTiming, DeviceError> {
        if self.fail_profiling {
            return Err(DeviceError::ProfilingUnavailable { seq: event.seq() });
        }
        self.inner.profile(event)
    }
}
