//! Double-buffered field storage.
//!
//! A [`BufferPair`] holds two device-mirrored grids for one evolving
//! field. Each half-step reads one slot and writes the other; [`swap`]
//! flips the roles. Two half-steps per iteration return the input role
//! to slot `A`.
//!
//! [`swap`]: BufferPair::swap

use pfield_core::Grid;
use pfield_device::{BufferId, ComputeDevice, DeviceError, Drained};

use crate::mirror::Mirrored;

/// One of the two buffers of a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// The canonical slot, holding the field between iterations.
    A,
    /// The partner slot.
    B,
}

impl Slot {
    fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

/// Two mirrored grids alternating input and output roles.
#[derive(Debug)]
pub struct BufferPair {
    a: Mirrored,
    b: Mirrored,
    input: Slot,
    half_steps: u64,
}

impl BufferPair {
    /// Upload both grids. Slot `A` starts as input.
    pub fn new<D: ComputeDevice + ?Sized>(
        a: Grid,
        b: Grid,
        device: &mut D,
    ) -> Result<Self, DeviceError> {
        Ok(Self {
            a: Mirrored::new(a, device)?,
            b: Mirrored::new(b, device)?,
            input: Slot::A,
            half_steps: 0,
        })
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Mirrored {
        match slot {
            Slot::A => &mut self.a,
            Slot::B => &mut self.b,
        }
    }

    fn slot(&self, slot: Slot) -> &Mirrored {
        match slot {
            Slot::A => &self.a,
            Slot::B => &self.b,
        }
    }

    /// `(input, output)` buffer ids for the next half-step. Both host
    /// copies become stale.
    pub fn bind(&mut self) -> (BufferId, BufferId) {
        let input = self.input;
        let i = self.slot_mut(input).bind();
        let o = self.slot_mut(input.other()).bind();
        (i, o)
    }

    /// Exchange input and output roles.
    pub fn swap(&mut self) {
        self.input = self.input.other();
        self.half_steps += 1;
    }

    /// Slot currently acting as input.
    pub fn input_slot(&self) -> Slot {
        self.input
    }

    /// Buffer currently acting as input.
    pub fn input_id(&self) -> BufferId {
        self.slot(self.input).buffer()
    }

    /// Buffer currently acting as output.
    pub fn output_id(&self) -> BufferId {
        self.slot(self.input.other()).buffer()
    }

    /// Swaps performed so far.
    pub fn half_steps(&self) -> u64 {
        self.half_steps
    }

    /// Host copy of the latest state (the current input slot).
    pub fn map_current<D: ComputeDevice + ?Sized>(
        &mut self,
        device: &mut D,
        token: &Drained,
    ) -> Result<&Grid, DeviceError> {
        let input = self.input;
        self.slot_mut(input).map(device, token)
    }
}
