//! Host grid mirrored into a device buffer.

use pfield_core::Grid;
use pfield_device::{BufferId, ComputeDevice, DeviceError, Drained};

/// Which copy of a [`Mirrored`] grid is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Residency {
    /// The device buffer may have been written since the last read-back;
    /// the host copy is stale.
    Device,
    /// The host copy matches the device buffer.
    Host,
}

/// A grid whose authoritative copy lives on the device.
///
/// The host copy is refreshed only by [`map`](Self::map), which needs a
/// [`Drained`] token. Binding the buffer for a launch marks the host copy
/// stale again.
#[derive(Debug)]
pub struct Mirrored {
    host: Grid,
    buffer: BufferId,
    residency: Residency,
}

impl Mirrored {
    /// Upload `grid` into a fresh device buffer.
    pub fn new<D: ComputeDevice + ?Sized>(grid: Grid, device: &mut D) -> Result<Self, DeviceError> {
        let buffer = device.create_buffer(grid.as_slice())?;
        Ok(Self {
            host: grid,
            buffer,
            residency: Residency::Host,
        })
    }

    /// Device buffer id, for binding as a kernel argument. Marks the host
    /// copy stale.
    pub fn bind(&mut self) -> BufferId {
        self.residency = Residency::Device;
        self.buffer
    }

    /// Device buffer id without changing residency.
    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    /// Current residency.
    pub fn residency(&self) -> Residency {
        self.residency
    }

    /// Grid side length.
    pub fn size(&self) -> usize {
        self.host.size()
    }

    /// Refresh the host copy from the device if stale and return it.
    pub fn map<D: ComputeDevice + ?Sized>(
        &mut self,
        device: &mut D,
        token: &Drained,
    ) -> Result<&Grid, DeviceError> {
        if self.residency == Residency::Device {
            device.read_back(self.buffer, token, self.host.as_mut_slice())?;
            self.residency = Residency::Host;
        }
        Ok(&self.host)
    }

    /// Host copy, only while it is current.
    pub fn host_view(&self) -> Option<&Grid> {
        match self.residency {
            Residency::Host => Some(&self.host),
            Residency::Device => None,
        }
    }
}
