//! Compute device abstraction for pfield.
//!
//! The driver talks to an accelerator only through the [`ComputeDevice`]
//! trait: compile a program with injected `-D` definitions, mirror grids
//! into device buffers, submit asynchronous 2-D launches, drain the queue,
//! and read buffers back with a [`Drained`] token.
//!
//! The [`host`] module provides the shipped backend: a worker thread that
//! owns device memory and executes native kernels registered through a
//! [`HostKernelFactory`](host::HostKernelFactory).

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod advisor;
pub mod defines;
pub mod device;
pub mod error;
pub mod host;
pub mod program;
pub mod report;

pub use advisor::advise_work_group_size;
pub use defines::KernelDefines;
pub use device::{
    BufferId, ComputeDevice, DeviceInfo, Drained, KernelArg, KernelArgs, KernelHandle,
    KernelLimits, LaunchEvent, LaunchGeometry, LaunchTiming, PlatformInfo,
};
pub use error::DeviceError;
pub use program::{compile_kernel, load_source, ENTRY_POINT};
