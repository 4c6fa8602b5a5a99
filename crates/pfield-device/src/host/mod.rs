//! Host compute backend.
//!
//! [`HostDevice`] implements [`ComputeDevice`] with a worker thread that
//! owns device memory and consumes queue commands over a crossbeam
//! channel. Programs are "compiled" by checking the entry point in the
//! source text and instantiating a native [`HostKernel`] from the injected
//! definitions through a [`HostKernelFactory`].
//!
//! Every launch is validated on the submitting thread before it is
//! queued: argument arity and kinds, buffer existence and length,
//! read/write aliasing, and work-group tiling.

mod kernel;
mod worker;

pub use kernel::{ArgAccess, HostKernel, HostKernelFactory, IoSlot, KernelIo};

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Sender};

use crate::defines::KernelDefines;
use crate::device::{
    BufferId, ComputeDevice, DeviceInfo, Drained, KernelArg, KernelArgs, KernelHandle,
    KernelLimits, LaunchEvent, LaunchGeometry, LaunchTiming, PlatformInfo,
};
use crate::error::DeviceError;
use crate::program::check_entry_point;
use worker::{Command, DeviceWorker};

/// Default maximum work-group size reported by host devices.
pub const DEFAULT_MAX_WORK_GROUP_SIZE: usize = 1024;

/// Default local memory reported by host devices, in bytes.
pub const DEFAULT_LOCAL_MEM_BYTES: usize = 32 * 1024;

// ── HostPlatform ───────────────────────────────────────────────────

/// The host platform and the devices it exposes.
#[derive(Clone, Debug)]
pub struct HostPlatform {
    info: PlatformInfo,
}

impl HostPlatform {
    /// A platform with `device_count` identical host devices.
    pub fn with_devices(device_count: usize) -> Self {
        Self::with_limits(device_count, DEFAULT_MAX_WORK_GROUP_SIZE)
    }

    /// A platform whose devices report `max_work_group_size`.
    pub fn with_limits(device_count: usize, max_work_group_size: usize) -> Self {
        let compute_units = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let devices = (0..device_count)
            .map(|i| DeviceInfo {
                name: format!("host-cpu-{i}"),
                vendor: "pfield".to_string(),
                max_work_group_size,
                local_mem_bytes: DEFAULT_LOCAL_MEM_BYTES,
                compute_units,
            })
            .collect();
        Self {
            info: PlatformInfo {
                name: "pfield host".to_string(),
                vendor: "pfield".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                devices,
            },
        }
    }

    /// Every platform this backend exposes: one host platform with one
    /// device.
    pub fn enumerate() -> Vec<HostPlatform> {
        vec![Self::with_devices(1)]
    }

    /// Static description.
    pub fn info(&self) -> &PlatformInfo {
        &self.info
    }

    /// Open device `index` of this platform.
    pub fn open_device(
        &self,
        index: usize,
        kernels: Arc<dyn HostKernelFactory>,
    ) -> Result<HostDevice, DeviceError> {
        let info = self
            .info
            .devices
            .get(index)
            .cloned()
            .ok_or(DeviceError::NoSuchDevice {
                platform: 0,
                index,
                available: self.info.devices.len(),
            })?;
        HostDevice::spawn(info, kernels)
    }
}

/// Select device `device` of platform `platform` from `platforms`.
pub fn open(
    platforms: &[HostPlatform],
    platform: usize,
    device: usize,
    kernels: Arc<dyn HostKernelFactory>,
) -> Result<HostDevice, DeviceError> {
    let selected = platforms.get(platform).ok_or(DeviceError::NoSuchPlatform {
        index: platform,
        available: platforms.len(),
    })?;
    selected
        .open_device(device, kernels)
        .map_err(|e| match e {
            DeviceError::NoSuchDevice {
                index, available, ..
            } => DeviceError::NoSuchDevice {
                platform,
                index,
                available,
            },
            other => other,
        })
}

// ── HostDevice ─────────────────────────────────────────────────────

struct KernelMeta {
    signature: Vec<ArgAccess>,
}

/// A host device backed by a worker thread.
pub struct HostDevice {
    info: DeviceInfo,
    factory: Arc<dyn HostKernelFactory>,
    tx: Sender<Command>,
    worker: Option<JoinHandle<()>>,
    kernels: Vec<KernelMeta>,
    buffer_lens: Vec<usize>,
    epoch: u64,
    next_seq: u64,
}

impl HostDevice {
    fn spawn(info: DeviceInfo, factory: Arc<dyn HostKernelFactory>) -> Result<Self, DeviceError> {
        let (tx, rx) = unbounded();
        let worker = thread::Builder::new()
            .name(format!("pfield-{}", info.name))
            .spawn(move || DeviceWorker::new(rx).run())
            .map_err(|_| DeviceError::WorkerDisconnected)?;
        tracing::debug!(device = %info.name, "host device worker started");
        Ok(Self {
            info,
            factory,
            tx,
            worker: Some(worker),
            kernels: Vec::new(),
            buffer_lens: Vec::new(),
            epoch: 0,
            next_seq: 0,
        })
    }

    fn send(&self, cmd: Command) -> Result<(), DeviceError> {
        self.tx.send(cmd).map_err(|_| DeviceError::WorkerDisconnected)
    }

    fn kernel_meta(&self, kernel: KernelHandle) -> Result<&KernelMeta, DeviceError> {
        self.kernels
            .get(kernel.0 as usize)
            .ok_or(DeviceError::UnknownKernel { kernel: kernel.0 })
    }

    fn buffer_len(&self, buffer: BufferId) -> Result<usize, DeviceError> {
        self.buffer_lens
            .get(buffer.0 as usize)
            .copied()
            .ok_or(DeviceError::UnknownBuffer { buffer })
    }

    fn validate_geometry(&self, geometry: &LaunchGeometry) -> Result<(), DeviceError> {
        for dim in 0..2 {
            let (global, local) = (geometry.global[dim], geometry.local[dim]);
            if local == 0 || global % local != 0 {
                return Err(DeviceError::InvalidGeometry {
                    reason: format!(
                        "global size {global} not divisible by work-group size {local}"
                    ),
                });
            }
        }
        let group = geometry.local[0] * geometry.local[1];
        if group > self.info.max_work_group_size {
            return Err(DeviceError::InvalidGeometry {
                reason: format!(
                    "work-group size {group} exceeds device maximum {}",
                    self.info.max_work_group_size
                ),
            });
        }
        Ok(())
    }

    fn validate_args(
        &self,
        signature: &[ArgAccess],
        args: &[KernelArg],
        geometry: &LaunchGeometry,
    ) -> Result<(), DeviceError> {
        if signature.len() != args.len() {
            return Err(DeviceError::ArgumentMismatch {
                reason: format!("kernel takes {} arguments, {} bound", signature.len(), args.len()),
            });
        }
        let cells = geometry.work_items();
        for (pos, (arg, access)) in args.iter().zip(signature).enumerate() {
            match (arg, access.is_buffer()) {
                (KernelArg::Buffer(id), true) => {
                    let len = self.buffer_len(*id)?;
                    if len != cells {
                        return Err(DeviceError::BufferLength {
                            buffer: *id,
                            expected: cells,
                            actual: len,
                        });
                    }
                    if access.is_write() {
                        let uses = args
                            .iter()
                            .filter(|a| matches!(a, KernelArg::Buffer(b) if b == id))
                            .count();
                        if uses > 1 {
                            return Err(DeviceError::AliasedBuffer { buffer: *id });
                        }
                    }
                }
                (KernelArg::Scalar(_), false) => {}
                (KernelArg::Buffer(_), false) => {
                    return Err(DeviceError::ArgumentMismatch {
                        reason: format!("argument {pos} expects a scalar, got a buffer"),
                    });
                }
                (KernelArg::Scalar(_), true) => {
                    return Err(DeviceError::ArgumentMismatch {
                        reason: format!("argument {pos} expects a buffer, got a scalar"),
                    });
                }
            }
        }
        Ok(())
    }
}

impl ComputeDevice for HostDevice {
    fn info(&self) -> &DeviceInfo {
        &self.info
    }

    fn compile(&mut self, source: &str, options: &str) -> Result<KernelHandle, DeviceError> {
        check_entry_point(source).map_err(|log| DeviceError::BuildFailed { log })?;
        let defines = KernelDefines::parse_options(options);
        let kernel = self
            .factory
            .build(&defines)
            .map_err(|log| DeviceError::BuildFailed { log })?;
        let signature = kernel.signature().to_vec();
        self.send(Command::Register { kernel })?;
        let handle = KernelHandle(self.kernels.len() as u32);
        self.kernels.push(KernelMeta { signature });
        Ok(handle)
    }

    fn kernel_limits(&self, kernel: KernelHandle) -> Result<KernelLimits, DeviceError> {
        self.kernel_meta(kernel)?;
        Ok(KernelLimits {
            max_work_group_size: self.info.max_work_group_size,
            local_mem_bytes: self.info.local_mem_bytes,
        })
    }

    fn create_buffer(&mut self, data: &[f32]) -> Result<BufferId, DeviceError> {
        self.send(Command::Alloc {
            data: data.to_vec(),
        })?;
        let id = BufferId(self.buffer_lens.len() as u32);
        self.buffer_lens.push(data.len());
        Ok(id)
    }

    fn submit(
        &mut self,
        kernel: KernelHandle,
        args: &[KernelArg],
        geometry: LaunchGeometry,
    ) -> Result<LaunchEvent, DeviceError> {
        let signature = &self.kernel_meta(kernel)?.signature;
        self.validate_geometry(&geometry)?;
        self.validate_args(signature, args, &geometry)?;

        let event = LaunchEvent::pending(self.next_seq);
        self.send(Command::Launch {
            kernel: kernel.0 as usize,
            args: KernelArgs::from_slice(args),
            geometry,
            event: event.clone(),
        })?;
        self.next_seq += 1;
        self.epoch += 1;
        tracing::trace!(seq = event.seq(), "launch queued");
        Ok(event)
    }

    fn drain(&mut self) -> Result<Drained, DeviceError> {
        let (reply, status) = bounded(1);
        self.send(Command::Fence { reply })?;
        status
            .recv()
            .map_err(|_| DeviceError::WorkerDisconnected)?
            .map_err(|reason| DeviceError::KernelFailed { reason })?;
        Ok(Drained::at_epoch(self.epoch))
    }

    fn read_back(
        &mut self,
        buffer: BufferId,
        token: &Drained,
        out: &mut [f32],
    ) -> Result<(), DeviceError> {
        if token.epoch() != self.epoch {
            return Err(DeviceError::NotDrained {
                token_epoch: token.epoch(),
                current_epoch: self.epoch,
            });
        }
        let len = self.buffer_len(buffer)?;
        if out.len() != len {
            return Err(DeviceError::BufferLength {
                buffer,
                expected: len,
                actual: out.len(),
            });
        }
        let (reply, data) = bounded(1);
        self.send(Command::Read {
            buffer: buffer.0 as usize,
            reply,
        })?;
        let data = data.recv().map_err(|_| DeviceError::WorkerDisconnected)?;
        out.copy_from_slice(&data);
        Ok(())
    }

    fn profile(&self, event: &LaunchEvent) -> Result<LaunchTiming, DeviceError> {
        event
            .timing()
            .ok_or(DeviceError::ProfilingUnavailable { seq: event.seq() })
    }
}

impl Drop for HostDevice {
    fn drop(&mut self) {
        let _ = self.tx.send(Command::Shutdown);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}
