//! Native kernels executed by the host backend.

use crate::defines::KernelDefines;
use crate::device::LaunchGeometry;

/// How a kernel uses one positional argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgAccess {
    /// Buffer read only.
    Read,
    /// Buffer written only.
    Write,
    /// Buffer read and written (scratch or in-place state).
    ReadWrite,
    /// Scalar by value.
    Scalar,
}

impl ArgAccess {
    /// Whether the argument is a buffer the kernel writes.
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }

    /// Whether the argument is a buffer.
    pub fn is_buffer(self) -> bool {
        !matches!(self, Self::Scalar)
    }
}

/// Bound argument storage handed to [`HostKernel::execute`].
pub enum IoSlot<'a> {
    /// A read-only buffer.
    Read(&'a [f32]),
    /// A writable buffer not yet claimed by the kernel.
    Write(&'a mut [f32]),
    /// A scalar.
    Scalar(f32),
    /// A writable buffer already claimed.
    Taken,
}

/// Arguments and geometry of one launch.
pub struct KernelIo<'a> {
    slots: Vec<IoSlot<'a>>,
    geometry: LaunchGeometry,
}

impl<'a> KernelIo<'a> {
    /// Bundle bound slots with the launch geometry.
    pub fn new(slots: Vec<IoSlot<'a>>, geometry: LaunchGeometry) -> Self {
        Self { slots, geometry }
    }

    /// Launch geometry.
    pub fn geometry(&self) -> LaunchGeometry {
        self.geometry
    }

    /// Grid side length covered by the launch.
    pub fn size(&self) -> usize {
        self.geometry.global[0]
    }

    /// Read-only buffer at position `pos`.
    pub fn read(&self, pos: usize) -> Result<&'a [f32], String> {
        match self.slots.get(pos) {
            Some(IoSlot::Read(buf)) => Ok(*buf),
            _ => Err(format!("argument {pos} is not a readable buffer")),
        }
    }

    /// Claim the writable buffer at position `pos`. Each slot can be
    /// claimed once per launch.
    pub fn take_write(&mut self, pos: usize) -> Result<&'a mut [f32], String> {
        let Some(slot) = self.slots.get_mut(pos) else {
            return Err(format!("argument {pos} out of range"));
        };
        match std::mem::replace(slot, IoSlot::Taken) {
            IoSlot::Write(buf) => Ok(buf),
            other => {
                *slot = other;
                Err(format!("argument {pos} is not an unclaimed writable buffer"))
            }
        }
    }

    /// Scalar at position `pos`.
    pub fn scalar(&self, pos: usize) -> Result<f32, String> {
        match self.slots.get(pos) {
            Some(IoSlot::Scalar(v)) => Ok(*v),
            _ => Err(format!("argument {pos} is not a scalar")),
        }
    }
}

/// A compiled native kernel.
pub trait HostKernel: Send {
    /// Positional argument contract.
    fn signature(&self) -> &[ArgAccess];

    /// Run one launch over the whole global range.
    fn execute(&mut self, io: &mut KernelIo<'_>) -> Result<(), String>;
}

/// Builds the native kernel for a program from its injected definitions.
///
/// Returning `Err` fails the build; the message becomes the build log.
pub trait HostKernelFactory: Send + Sync {
    /// Instantiate the kernel.
    fn build(&self, defines: &KernelDefines) -> Result<Box<dyn HostKernel>, String>;
}

impl<F> HostKernelFactory for F
where
    F: Fn(&KernelDefines) -> Result<Box<dyn HostKernel>, String> + Send + Sync,
{
    fn build(&self, defines: &KernelDefines) -> Result<Box<dyn HostKernel>, String> {
        self(defines)
    }
}
