//! Device-layer error type.

use std::error::Error;
use std::fmt;

use pfield_core::{ConfigError, SimError};

use crate::device::BufferId;

/// Errors from device selection, compilation, and queue operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceError {
    /// The requested platform index does not exist.
    NoSuchPlatform {
        /// Requested index.
        index: usize,
        /// Number of platforms available.
        available: usize,
    },
    /// The requested device index does not exist on the platform.
    NoSuchDevice {
        /// Platform index.
        platform: usize,
        /// Requested device index.
        index: usize,
        /// Number of devices on the platform.
        available: usize,
    },
    /// Program compilation failed.
    BuildFailed {
        /// Compiler diagnostic, verbatim.
        log: String,
    },
    /// A kernel handle was not produced by this device.
    UnknownKernel {
        /// The raw handle value.
        kernel: u32,
    },
    /// A buffer id was not produced by this device.
    UnknownBuffer {
        /// The offending buffer.
        buffer: BufferId,
    },
    /// A buffer does not have the length the operation requires.
    BufferLength {
        /// The offending buffer.
        buffer: BufferId,
        /// Required length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A buffer bound for writing also appears in another argument slot.
    AliasedBuffer {
        /// The aliased buffer.
        buffer: BufferId,
    },
    /// Launch geometry is not tiled evenly or exceeds the device limit.
    InvalidGeometry {
        /// Description of the violated constraint.
        reason: String,
    },
    /// Kernel arguments do not match the kernel signature.
    ArgumentMismatch {
        /// Description of the mismatch.
        reason: String,
    },
    /// A read-back token predates the most recent submission.
    NotDrained {
        /// Epoch carried by the token.
        token_epoch: u64,
        /// Current submission epoch.
        current_epoch: u64,
    },
    /// The device worker is gone.
    WorkerDisconnected,
    /// No timestamps are recorded for the launch.
    ProfilingUnavailable {
        /// Launch sequence number.
        seq: u64,
    },
    /// A kernel reported a failure during execution.
    KernelFailed {
        /// Description reported by the kernel.
        reason: String,
    },
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchPlatform { index, available } => {
                write!(f, "platform {index} requested but {available} available")
            }
            Self::NoSuchDevice {
                platform,
                index,
                available,
            } => write!(
                f,
                "device {index} requested on platform {platform} but {available} available"
            ),
            Self::BuildFailed { log } => write!(f, "build failed: {log}"),
            Self::UnknownKernel { kernel } => write!(f, "unknown kernel handle {kernel}"),
            Self::UnknownBuffer { buffer } => write!(f, "unknown buffer {}", buffer.0),
            Self::BufferLength {
                buffer,
                expected,
                actual,
            } => write!(
                f,
                "buffer {} has {actual} elements, expected {expected}",
                buffer.0
            ),
            Self::AliasedBuffer { buffer } => {
                write!(f, "buffer {} bound for writing more than once", buffer.0)
            }
            Self::InvalidGeometry { reason } => write!(f, "invalid launch geometry: {reason}"),
            Self::ArgumentMismatch { reason } => write!(f, "argument mismatch: {reason}"),
            Self::NotDrained {
                token_epoch,
                current_epoch,
            } => write!(
                f,
                "queue not drained: token epoch {token_epoch}, current epoch {current_epoch}"
            ),
            Self::WorkerDisconnected => write!(f, "device worker disconnected"),
            Self::ProfilingUnavailable { seq } => {
                write!(f, "no profiling data for launch {seq}")
            }
            Self::KernelFailed { reason } => write!(f, "kernel failed: {reason}"),
        }
    }
}

impl Error for DeviceError {}

impl From<DeviceError> for SimError {
    fn from(e: DeviceError) -> Self {
        match e {
            selection @ (DeviceError::NoSuchPlatform { .. } | DeviceError::NoSuchDevice { .. }) => {
                SimError::Configuration(ConfigError::NoSuchDevice {
                    reason: selection.to_string(),
                })
            }
            DeviceError::BuildFailed { log } => SimError::Build { log },
            other => SimError::Submission {
                reason: other.to_string(),
            },
        }
    }
}
