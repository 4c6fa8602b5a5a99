//! The device worker thread.
//!
//! The worker owns every device buffer and compiled kernel. The host side
//! validates launches before they are queued, so the worker only executes
//! and timestamps them. The first kernel failure is held and reported at
//! the next fence; launches queued after it are skipped.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};

use crate::device::{KernelArg, KernelArgs, LaunchEvent, LaunchGeometry, LaunchTiming};
use crate::host::kernel::{HostKernel, IoSlot, KernelIo};

/// Queue commands sent from [`HostDevice`](super::HostDevice).
pub(crate) enum Command {
    Alloc {
        data: Vec<f32>,
    },
    Register {
        kernel: Box<dyn HostKernel>,
    },
    Launch {
        kernel: usize,
        args: KernelArgs,
        geometry: LaunchGeometry,
        event: LaunchEvent,
    },
    Fence {
        reply: Sender<Result<(), String>>,
    },
    Read {
        buffer: usize,
        reply: Sender<Vec<f32>>,
    },
    Shutdown,
}

pub(crate) struct DeviceWorker {
    rx: Receiver<Command>,
    buffers: Vec<Vec<f32>>,
    kernels: Vec<Box<dyn HostKernel>>,
    origin: Instant,
    pending_error: Option<String>,
}

impl DeviceWorker {
    pub fn new(rx: Receiver<Command>) -> Self {
        Self {
            rx,
            buffers: Vec::new(),
            kernels: Vec::new(),
            origin: Instant::now(),
            pending_error: None,
        }
    }

    /// Process commands until shutdown or until the host side hangs up.
    pub fn run(mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                Command::Alloc { data } => self.buffers.push(data),
                Command::Register { kernel } => self.kernels.push(kernel),
                Command::Launch {
                    kernel,
                    args,
                    geometry,
                    event,
                } => {
                    if self.pending_error.is_some() {
                        continue;
                    }
                    if let Err(reason) = self.launch(kernel, &args, geometry, &event) {
                        self.pending_error = Some(reason);
                    }
                }
                Command::Fence { reply } => {
                    let status = match self.pending_error.take() {
                        Some(reason) => Err(reason),
                        None => Ok(()),
                    };
                    let _ = reply.send(status);
                }
                Command::Read { buffer, reply } => {
                    let data = self.buffers.get(buffer).cloned().unwrap_or_default();
                    let _ = reply.send(data);
                }
                Command::Shutdown => break,
            }
        }
    }

    fn launch(
        &mut self,
        kernel: usize,
        args: &[KernelArg],
        geometry: LaunchGeometry,
        event: &LaunchEvent,
    ) -> Result<(), String> {
        let Some(program) = self.kernels.get_mut(kernel) else {
            return Err(format!("kernel {kernel} not registered"));
        };
        let signature = program.signature().to_vec();

        // Move writable buffers out so the remaining ones can be borrowed
        // shared while the kernel holds the written ones mutably.
        let mut taken: Vec<(usize, Vec<f32>)> = Vec::new();
        for (arg, access) in args.iter().zip(&signature) {
            if let (KernelArg::Buffer(id), true) = (arg, access.is_write()) {
                let idx = id.0 as usize;
                taken.push((idx, std::mem::take(&mut self.buffers[idx])));
            }
        }

        let start = self.origin.elapsed();
        let result = {
            let mut written = taken.iter_mut();
            let mut slots = Vec::with_capacity(args.len());
            for (arg, access) in args.iter().zip(&signature) {
                let slot = match arg {
                    KernelArg::Scalar(v) => IoSlot::Scalar(*v),
                    KernelArg::Buffer(_) if access.is_write() => match written.next() {
                        Some((_, buf)) => IoSlot::Write(buf.as_mut_slice()),
                        None => IoSlot::Taken,
                    },
                    KernelArg::Buffer(id) => IoSlot::Read(&self.buffers[id.0 as usize]),
                };
                slots.push(slot);
            }
            let mut io = KernelIo::new(slots, geometry);
            program.execute(&mut io)
        };
        let end = self.origin.elapsed();

        for (idx, buf) in taken {
            self.buffers[idx] = buf;
        }

        result?;
        event.complete(LaunchTiming {
            start_ns: start.as_nanos() as u64,
            end_ns: end.as_nanos() as u64,
        });
        Ok(())
    }
}
