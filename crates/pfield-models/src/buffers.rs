//! Host-side initial state and the device buffers a model binds.

use pfield_arena::{BufferPair, Mirrored};
use pfield_core::Grid;
use pfield_device::{ComputeDevice, DeviceError, Drained};

/// Initial contents of one evolving field.
#[derive(Clone, Debug)]
pub struct FieldInit {
    /// Output label (`PHASE`, `TEMP`).
    pub label: &'static str,
    /// Slot A contents; the field value at iteration 0.
    pub a: Grid,
    /// Slot B contents.
    pub b: Grid,
}

/// Everything a model needs uploaded before the first launch.
#[derive(Clone, Debug, Default)]
pub struct InitialFields {
    /// Evolving fields, in binding order.
    pub fields: Vec<FieldInit>,
    /// Work buffers, in binding order.
    pub work: Vec<Grid>,
}

/// Device buffers of a running model.
#[derive(Debug)]
pub struct ModelBuffers {
    labels: Vec<&'static str>,
    pairs: Vec<BufferPair>,
    work: Vec<Mirrored>,
}

impl ModelBuffers {
    /// Upload every field and work buffer.
    pub fn upload<D: ComputeDevice + ?Sized>(
        initial: InitialFields,
        device: &mut D,
    ) -> Result<Self, DeviceError> {
        let mut labels = Vec::with_capacity(initial.fields.len());
        let mut pairs = Vec::with_capacity(initial.fields.len());
        for field in initial.fields {
            labels.push(field.label);
            pairs.push(BufferPair::new(field.a, field.b, device)?);
        }
        let work = initial
            .work
            .into_iter()
            .map(|g| Mirrored::new(g, device))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            labels,
            pairs,
            work,
        })
    }

    /// Field labels, in binding order.
    pub fn labels(&self) -> &[&'static str] {
        &self.labels
    }

    /// Evolving field pairs.
    pub fn pairs(&self) -> &[BufferPair] {
        &self.pairs
    }

    /// Field pair `index`.
    pub fn pair_mut(&mut self, index: usize) -> Result<&mut BufferPair, DeviceError> {
        self.pairs
            .get_mut(index)
            .ok_or_else(|| DeviceError::ArgumentMismatch {
                reason: format!("field {index} not allocated"),
            })
    }

    /// Work buffer `index`.
    pub fn work_mut(&mut self, index: usize) -> Result<&mut Mirrored, DeviceError> {
        self.work
            .get_mut(index)
            .ok_or_else(|| DeviceError::ArgumentMismatch {
                reason: format!("work buffer {index} not allocated"),
            })
    }

    /// Flip input/output roles of every pair after a half-step.
    pub fn swap_all(&mut self) {
        for pair in &mut self.pairs {
            pair.swap();
        }
    }

    /// Host copy of the latest state of field `index`.
    pub fn map_field<D: ComputeDevice + ?Sized>(
        &mut self,
        index: usize,
        device: &mut D,
        token: &Drained,
    ) -> Result<&Grid, DeviceError> {
        self.pair_mut(index)?.map_current(device, token)
    }
}
