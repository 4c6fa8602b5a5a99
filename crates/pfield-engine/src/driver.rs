//! The evolution loop.

use std::time::{Duration, Instant};

use pfield_core::{CheckpointSink, SimError};
use pfield_device::{ComputeDevice, Drained};

use crate::context::SimulationContext;
use crate::schedule::CheckpointSchedule;
use crate::timing::ExecutionTimer;

// ── DriverState ────────────────────────────────────────────────────

/// Lifecycle of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Constructed; nothing submitted yet.
    Idle,
    /// Iterating.
    Running,
    /// All iterations done; the final drain and checkpoint remain.
    Draining,
    /// Finished, or aborted by an error.
    Terminated,
}

// ── RunReport ──────────────────────────────────────────────────────

/// Summary of a completed run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Iterations executed.
    pub iterations: u32,
    /// Labels of every checkpoint written, in order.
    pub checkpoints: Vec<u32>,
    /// Work-group edge used for every launch.
    pub work_group_size: usize,
    /// Accumulated device execution time in seconds.
    pub device_seconds: f64,
    /// Launches whose timing was accumulated.
    pub launches_profiled: u64,
    /// Launches whose timing could not be read.
    pub profiling_failures: u64,
    /// Host wall-clock time of the run.
    pub wall_time: Duration,
}

// ── EvolutionDriver ────────────────────────────────────────────────

/// Drives a [`SimulationContext`] from its initial state to `ITERS`.
///
/// Use [`run`](Self::run) for a whole simulation, or
/// [`step`](Self::step) and [`finish`](Self::finish) to interleave
/// other work between iterations. Any error moves the driver to
/// [`DriverState::Terminated`]; there is no recovery.
pub struct EvolutionDriver<'c, D: ComputeDevice> {
    context: &'c mut SimulationContext<D>,
    state: DriverState,
    schedule: CheckpointSchedule,
    timer: ExecutionTimer,
    iteration: u32,
    checkpoints: Vec<u32>,
    started: Option<Instant>,
}

impl<'c, D: ComputeDevice> EvolutionDriver<'c, D> {
    /// A driver in [`DriverState::Idle`].
    pub fn new(context: &'c mut SimulationContext<D>) -> Self {
        let schedule = CheckpointSchedule::new(&context.config);
        Self {
            context,
            state: DriverState::Idle,
            schedule,
            timer: ExecutionTimer::new(),
            iteration: 0,
            checkpoints: Vec::with_capacity(schedule.count()),
            started: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Completed iterations.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Checkpoint schedule of this run.
    pub fn schedule(&self) -> &CheckpointSchedule {
        &self.schedule
    }

    /// Device time accounted so far.
    pub fn timer(&self) -> &ExecutionTimer {
        &self.timer
    }

    /// Run every iteration and the final checkpoint.
    pub fn run<S: CheckpointSink + ?Sized>(mut self, sink: &mut S) -> Result<RunReport, SimError> {
        while matches!(self.state, DriverState::Idle | DriverState::Running) {
            self.step(sink)?;
        }
        self.finish(sink)
    }

    /// Execute one iteration and return the resulting state.
    ///
    /// The iteration submits two half-steps, drains, accumulates their
    /// device time, and writes a checkpoint if the loop index is on the
    /// schedule.
    pub fn step<S: CheckpointSink + ?Sized>(&mut self, sink: &mut S) -> Result<DriverState, SimError> {
        match self.state {
            DriverState::Idle => self.start(),
            DriverState::Running => {}
            other => return Err(self.misuse("step", other)),
        }
        let result = self.iterate(sink);
        self.guard(result)?;
        Ok(self.state)
    }

    /// Final drain and mandatory checkpoint at `ITERS`.
    pub fn finish<S: CheckpointSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunReport, SimError> {
        if self.state != DriverState::Draining {
            return Err(self.misuse("finish", self.state));
        }
        let result = self.final_checkpoint(sink);
        self.guard(result)?;
        self.state = DriverState::Terminated;

        let ctx = &self.context;
        Ok(RunReport {
            iterations: self.iteration,
            checkpoints: self.checkpoints.clone(),
            work_group_size: ctx.work_group_size(),
            device_seconds: self.timer.seconds(),
            launches_profiled: self.timer.profiled(),
            profiling_failures: self.timer.failed(),
            wall_time: self.started.map(|t| t.elapsed()).unwrap_or_default(),
        })
    }

    fn start(&mut self) {
        let cfg = &self.context.config;
        tracing::info!("   : Enqueuing kernels:");
        tracing::info!(
            "   : Compute size is {}",
            cfg.cell_count() as u64 * u64::from(cfg.iterations)
        );
        self.started = Some(Instant::now());
        self.state = DriverState::Running;
    }

    fn iterate<S: CheckpointSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), SimError> {
        let iter = self.iteration;
        let ctx = &mut *self.context;
        let noise = match ctx.model.noise_schedule() {
            Some(schedule) => schedule.draw(iter, &mut ctx.rng),
            None => 0.0,
        };

        let mut events = [None, None];
        for event in &mut events {
            let args = ctx.model.bind_half_step(&mut ctx.buffers, noise)?;
            let launched = ctx.device.submit(ctx.kernel, &args, ctx.geometry)?;
            ctx.buffers.swap_all();
            tracing::debug!(iter, seq = launched.seq(), noise, "half-step submitted");
            *event = Some(launched);
        }

        let token = ctx.device.drain()?;
        for event in events.iter().flatten() {
            let timing = ctx.device.profile(event);
            self.timer.record(event, timing);
        }

        if self.schedule.is_periodic(iter) {
            tracing::info!(
                "{:2}%: complete in time {}",
                u64::from(iter) * 100 / u64::from(self.schedule.iterations()),
                self.timer.elapsed_text()
            );
            self.checkpoint(sink, iter, &token)?;
        }

        self.iteration += 1;
        if self.iteration >= self.schedule.iterations() {
            self.state = DriverState::Draining;
        }
        Ok(())
    }

    fn final_checkpoint<S: CheckpointSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), SimError> {
        let token = self.context.device.drain()?;
        tracing::info!("100%: complete in time {}", self.timer.elapsed_text());
        self.checkpoint(sink, self.schedule.iterations(), &token)
    }

    fn checkpoint<S: CheckpointSink + ?Sized>(
        &mut self,
        sink: &mut S,
        label: u32,
        token: &Drained,
    ) -> Result<(), SimError> {
        let ctx = &mut *self.context;
        for index in 0..ctx.buffers.labels().len() {
            let name = ctx.buffers.labels()[index];
            let grid = ctx.buffers.map_field(index, &mut ctx.device, token)?;
            sink.write_field(name, label, grid)?;
        }
        self.checkpoints.push(label);
        Ok(())
    }

    fn guard<T>(&mut self, result: Result<T, SimError>) -> Result<T, SimError> {
        if let Err(e) = &result {
            tracing::error!(iteration = self.iteration, error = %e, "run aborted");
            self.state = DriverState::Terminated;
        }
        result
    }

    fn misuse(&self, op: &str, state: DriverState) -> SimError {
        SimError::Submission {
            reason: format!("cannot {op} a driver in state {state:?}"),
        }
    }
}
