//! Snapshot output for pfield runs.
//!
//! Snapshots land in `<root>/<TAG>_<SIZE>S_<ITERS>ITERS/<LABEL>_<iter>.<ext>`
//! as either comma-separated values or legacy ASCII VTK structured
//! points. [`SnapshotWriter`] implements the driver's
//! [`CheckpointSink`](pfield_core::CheckpointSink).

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod csv;
pub mod error;
pub mod layout;
pub mod vtk;
pub mod writer;

pub use csv::read_csv_field;
pub use error::OutputError;
pub use layout::{run_directory, snapshot_file_name};
pub use writer::SnapshotWriter;
