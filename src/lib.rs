//! A single-CPU process scheduling simulator.
//!
//! sched-sim replays a batch of processes, each described by an arrival time,
//! a CPU burst and a nice level, under one of five classical policies: FCFS,
//! SJF, SRTF, preemptive priority and Round Robin. For each run it rebuilds
//! the exact execution timeline and derives per-process and system metrics.
//!
//! The crate is organized around __workload sources__ and __schedule processors__:
//! - A workload source produces test cases and simulates them. It implements
//!   the `WorkloadSource` trait. Currently, the only source is the whitespace
//!   separated test case format read by `WorkloadReader`.
//! - A schedule processor consumes simulated schedules. It implements the
//!   `ScheduleProcessor` trait. There are two processors: a text reporter and
//!   a JSON reporter.

pub mod cli;
pub mod context;
pub mod io;
pub mod utils;

pub mod process;
pub mod timeline;

pub mod engine;
pub mod metrics;
pub mod policy;
pub mod schedule;

pub mod processors;
pub mod workload;

use anyhow::Result;

use crate::{context::SimContext, schedule::Schedule};

/// Simulated time, in nanoseconds.
pub type Ticks = u64;

/// Feeds a `ScheduleProcessor` with simulated test cases.
pub trait WorkloadSource: Sized {
    /// Simulate all test cases and feed their schedules to the supplied processor.
    fn case_loop<P: ScheduleProcessor>(&mut self, processor: &mut P, ctx: &SimContext)
        -> Result<()>;

    /// Process the test cases with the supplied `ScheduleProcessor`.
    fn process_workloads<P: ScheduleProcessor>(
        &mut self,
        mut processor: P,
        ctx: &SimContext,
    ) -> Result<()> {
        processor.post_load_init(ctx)?;

        self.case_loop(&mut processor, ctx)?;

        processor.finalize(ctx)
    }
}

/// Consumes simulated schedules.
pub trait ScheduleProcessor {
    /// Initialize the processor before supplying it to a workload source.
    fn pre_load_init(&mut self, ctx: &SimContext) -> Result<()>;

    /// Initialize the processor after it has been supplied to a workload source.
    fn post_load_init(&mut self, ctx: &SimContext) -> Result<()>;

    /// Process the schedule of test case `case`.
    fn consume_schedule(&mut self, case: usize, schedule: &Schedule, ctx: &SimContext)
        -> Result<()>;

    /// Called once every test case has been consumed.
    fn finalize(&mut self, ctx: &SimContext) -> Result<()>;
}
