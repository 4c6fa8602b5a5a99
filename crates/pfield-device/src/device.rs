//! The [`ComputeDevice`] trait and the handle types that flow through it.

use std::sync::{Arc, OnceLock};

use smallvec::SmallVec;

use crate::error::DeviceError;

// ── Handles ────────────────────────────────────────────────────────

/// A compiled kernel, valid only on the device that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KernelHandle(pub u32);

/// A device buffer, valid only on the device that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// One positional kernel argument.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KernelArg {
    /// A device buffer.
    Buffer(BufferId),
    /// A scalar passed by value.
    Scalar(f32),
}

/// Argument list for one launch. No model binds more than five.
pub type KernelArgs = SmallVec<[KernelArg; 5]>;

/// 2-D launch extent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchGeometry {
    /// Global work size per dimension.
    pub global: [usize; 2],
    /// Work-group size per dimension.
    pub local: [usize; 2],
}

impl LaunchGeometry {
    /// A `size`×`size` launch tiled by `work_group`×`work_group`.
    pub fn square(size: usize, work_group: usize) -> Self {
        Self {
            global: [size, size],
            local: [work_group, work_group],
        }
    }

    /// Number of work items.
    pub fn work_items(&self) -> usize {
        self.global[0] * self.global[1]
    }
}

// ── Synchronization ────────────────────────────────────────────────

/// Proof that the queue was drained.
///
/// Minted by [`ComputeDevice::drain`]; carries the submission epoch at
/// which it was minted. A token is only accepted by
/// [`ComputeDevice::read_back`] while no further launch has been
/// submitted.
#[derive(Debug)]
pub struct Drained {
    epoch: u64,
}

impl Drained {
    /// Mint a token for `epoch`. Backends call this from `drain`.
    pub fn at_epoch(epoch: u64) -> Self {
        Self { epoch }
    }

    /// Submission epoch the token was minted at.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Device timestamps of one launch, in nanoseconds on the device clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchTiming {
    /// Execution start.
    pub start_ns: u64,
    /// Execution end.
    pub end_ns: u64,
}

impl LaunchTiming {
    /// Execution time in seconds. Queue wait is excluded.
    pub fn elapsed_secs(&self) -> f64 {
        self.end_ns.saturating_sub(self.start_ns) as f64 * 1e-9
    }
}

/// Completion handle for an asynchronous launch.
///
/// Clones share the same completion slot; the backend fills it once the
/// launch has executed.
#[derive(Clone, Debug)]
pub struct LaunchEvent {
    seq: u64,
    slot: Arc<OnceLock<LaunchTiming>>,
}

impl LaunchEvent {
    /// A pending event for launch number `seq`.
    pub fn pending(seq: u64) -> Self {
        Self {
            seq,
            slot: Arc::new(OnceLock::new()),
        }
    }

    /// Launch sequence number.
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Record completion. Later calls are ignored.
    pub fn complete(&self, timing: LaunchTiming) {
        let _ = self.slot.set(timing);
    }

    /// Recorded timestamps, if the launch has completed.
    pub fn timing(&self) -> Option<LaunchTiming> {
        self.slot.get().copied()
    }
}

// ── Descriptions ───────────────────────────────────────────────────

/// Static description of one device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Device name.
    pub name: String,
    /// Device vendor.
    pub vendor: String,
    /// Maximum work-group size (product of dimensions).
    pub max_work_group_size: usize,
    /// Local memory per work group, in bytes.
    pub local_mem_bytes: usize,
    /// Parallel compute units.
    pub compute_units: usize,
}

/// Static description of one platform and its devices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Platform name.
    pub name: String,
    /// Platform vendor.
    pub vendor: String,
    /// Platform version string.
    pub version: String,
    /// Devices on this platform.
    pub devices: Vec<DeviceInfo>,
}

/// Per-kernel execution limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KernelLimits {
    /// Maximum work-group size for the kernel.
    pub max_work_group_size: usize,
    /// Local memory available to the kernel, in bytes.
    pub local_mem_bytes: usize,
}

// ── ComputeDevice ──────────────────────────────────────────────────

/// An accelerator with a single in-order work queue.
///
/// Submissions are asynchronous. Host reads are only legal through
/// [`read_back`](Self::read_back) with a [`Drained`] token minted after
/// the most recent submission.
pub trait ComputeDevice: Send {
    /// Static description of the device.
    fn info(&self) -> &DeviceInfo;

    /// Compile `source` with compiler `options` and return the handle of
    /// its `phase_field_evol_kern` entry point.
    fn compile(&mut self, source: &str, options: &str) -> Result<KernelHandle, DeviceError>;

    /// Execution limits of a compiled kernel.
    fn kernel_limits(&self, kernel: KernelHandle) -> Result<KernelLimits, DeviceError>;

    /// Allocate a device buffer initialised from `data`.
    fn create_buffer(&mut self, data: &[f32]) -> Result<BufferId, DeviceError>;

    /// Enqueue one launch. Returns immediately.
    fn submit(
        &mut self,
        kernel: KernelHandle,
        args: &[KernelArg],
        geometry: LaunchGeometry,
    ) -> Result<LaunchEvent, DeviceError>;

    /// Block until every submitted launch has finished.
    fn drain(&mut self) -> Result<Drained, DeviceError>;

    /// Copy a buffer into `out`.
    fn read_back(
        &mut self,
        buffer: BufferId,
        token: &Drained,
        out: &mut [f32],
    ) -> Result<(), DeviceError>;

    /// Device start/end timestamps of a completed launch.
    fn profile(&self, event: &LaunchEvent) -> Result<LaunchTiming, DeviceError>;
}

impl<D: ComputeDevice + ?Sized> ComputeDevice for Box<D> {
    fn info(&self) -> &DeviceInfo {
        (**self).info()
    }

    fn compile(&mut self, source: &str, options: &str) -> Result<KernelHandle, DeviceError> {
        (**self).compile(source, options)
    }

    fn kernel_limits(&self, kernel: KernelHandle) -> Result<KernelLimits, DeviceError> {
        (**self).kernel_limits(kernel)
    }

    fn create_buffer(&mut self, data: &[f32]) -> Result<BufferId, DeviceError> {
        (**self).create_buffer(data)
    }

    fn submit(
        &mut self,
        kernel: KernelHandle,
        args: &[KernelArg],
        geometry: LaunchGeometry,
    ) -> Result<LaunchEvent, DeviceError> {
        (**self).submit(kernel, args, geometry)
    }

    fn drain(&mut self) -> Result<Drained, DeviceError> {
        (**self).drain()
    }

    fn read_back(
        &mut self,
        buffer: BufferId,
        token: &Drained,
        out: &mut [f32],
    ) -> Result<(), DeviceError> {
        (**self).read_back(buffer, token, out)
    }

    fn profile(&self, event: &LaunchEvent) -> Result<LaunchTiming, DeviceError> {
        (**self).profile(event)
    }
}
