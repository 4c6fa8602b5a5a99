//! Core types and traits for the pfield phase-field simulation driver.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental data model shared by the rest of the workspace:
//! the row-major [`Grid`], the parsed configuration records and the
//! validated [`SimulationConfig`], the run-level [`SimError`] taxonomy,
//! and the [`CheckpointSink`] seam between the driver and the writers.

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod grid;
pub mod records;
pub mod traits;

pub use config::{OutputFormat, SimulationConfig, MIN_CONFIGURED_WORK_GROUP};
pub use error::{ConfigError, SimError};
pub use grid::Grid;
pub use records::ConfigRecords;
pub use traits::CheckpointSink;
