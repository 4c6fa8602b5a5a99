//! Evolution driver for pfield simulations.
//!
//! A run is a [`SimulationContext`] (configuration, model, device,
//! compiled kernel, buffers, noise RNG) driven by an [`EvolutionDriver`]
//! through the states
//!
//! ```text
//! Idle ──step──▶ Running ──(ITERS iterations)──▶ Draining ──finish──▶ Terminated
//! ```
//!
//! Each iteration submits two half-steps, drains the queue, accumulates
//! device time, and checkpoints on schedule. Exactly one iteration is in
//! flight at a time.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod driver;
pub mod schedule;
pub mod timing;

pub use context::SimulationContext;
pub use driver::{DriverState, EvolutionDriver, RunReport};
pub use schedule::CheckpointSchedule;
pub use timing::ExecutionTimer;
