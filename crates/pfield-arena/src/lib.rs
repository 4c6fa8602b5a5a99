//! Grid allocation and host/device buffer management.
//!
//! # Architecture
//!
//! ```text
//! init      (allocation policies: uniform, boundary, random, stamps)
//!   └── Grid (host, row-major)
//!         └── Mirrored (device-owned; host copy valid only after drain)
//!               └── BufferPair (A/B slots, swapped every half-step)
//! ```
//!
//! Every allocation policy returns a fresh grid; no two grids share
//! storage. Host reads of device state go through [`Mirrored::map`],
//! which requires a [`Drained`](pfield_device::Drained) token.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod init;
pub mod mirror;
pub mod pair;

pub use mirror::{Mirrored, Residency};
pub use pair::{BufferPair, Slot};
