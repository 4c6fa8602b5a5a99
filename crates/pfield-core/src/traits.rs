//! Seams between the evolution driver and its collaborators.

use crate::error::SimError;
use crate::grid::Grid;

/// Destination for checkpoint snapshots.
///
/// The driver calls [`write_field`](CheckpointSink::write_field) once per
/// field label at every checkpoint, always with a host copy obtained after
/// a drain. An error aborts the run.
pub trait CheckpointSink {
    /// Persist one field snapshot.
    fn write_field(&mut self, label: &str, iteration: u32, grid: &Grid) -> Result<(), SimError>;
}

impl<S: CheckpointSink + ?Sized> CheckpointSink for &mut S {
    fn write_field(&mut self, label: &str, iteration: u32, grid: &Grid) -> Result<(), SimError> {
        (**self).write_field(label, iteration, grid)
    }
}
