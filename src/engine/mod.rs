//! Discrete-time simulation engine.
//!
//! The engine owns the process table, the clock and the timeline of one test
//! case. Three loop shapes cover the five policies:
//! - non-preemptive (FCFS, SJF): the selected process runs to completion;
//! - preemptive (SRTF, priority): selection is re-evaluated every unit;
//! - Round Robin: quantum-sized slices served from a ready queue.

use crate::{
    policy::{
        Fcfs, IdleAdvance, Policy, Priority, RoundRobinQueue, SelectionRule, Sjf, Srtf,
    },
    process::{ProcessTable, Slot},
    schedule::Schedule,
    timeline::{ExecutionBlock, Timeline},
    workload::Workload,
    Ticks,
};

pub mod clock;

use self::clock::Clock;

/// Simulate `workload` under its policy.
pub fn simulate(workload: &Workload) -> Schedule {
    let mut sim = Simulation::new(workload.processes());

    match workload.policy() {
        Policy::Fcfs => sim.run_non_preemptive(&Fcfs),
        Policy::Sjf => sim.run_non_preemptive(&Sjf),
        Policy::Srtf => sim.run_preemptive(&Srtf),
        Policy::Priority => sim.run_preemptive(&Priority),
        Policy::RoundRobin { quantum } => sim.run_round_robin(quantum),
    }

    sim.into_schedule(workload.policy())
}

/// State of one simulation run.
pub struct Simulation {
    processes: ProcessTable,
    timeline: Timeline,
    clock: Clock,
    completed: usize,
}

impl Simulation {
    pub fn new(processes: ProcessTable) -> Self {
        debug_assert!(!processes.is_empty(), "Simulating an empty workload");

        Self {
            processes,
            timeline: Timeline::new(),
            clock: Clock::new(),
            completed: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.completed == self.processes.len()
    }

    fn complete(&mut self, slot: Slot) {
        self.processes.get_mut(slot).finish(self.clock.now());
        self.completed += 1;
    }

    /// Sit idle until something is ready.
    fn wait_for_arrival(&mut self, advance: IdleAdvance) {
        match advance {
            IdleAdvance::Step => self.clock.idle(1),
            IdleAdvance::NextArrival => match self.processes.next_arrival(self.clock.now()) {
                Some(t) => self.clock.idle_until(t),
                None => unreachable!("Unfinished processes but no future arrival"),
            },
        }
    }

    /// Run each selected process to completion in a single block.
    pub fn run_non_preemptive<R: SelectionRule>(&mut self, rule: &R) {
        while !self.is_done() {
            let now = self.clock.now();

            let Some(slot) = rule.select(&self.processes, now) else {
                self.wait_for_arrival(rule.idle_advance());
                continue;
            };

            let process = self.processes.get_mut(slot);
            let duration = process.remaining_time();

            process.dispatch(now);
            process.execute(duration);
            self.clock.run(duration);
            self.timeline
                .push(ExecutionBlock::new(now, process.id, duration, true));

            self.complete(slot);
        }
    }

    /// Re-evaluate the selection every unit. Consecutive units of the same
    /// process are merged into one block.
    pub fn run_preemptive<R: SelectionRule>(&mut self, rule: &R) {
        while !self.is_done() {
            let now = self.clock.now();

            let Some(slot) = rule.select(&self.processes, now) else {
                self.wait_for_arrival(IdleAdvance::Step);
                continue;
            };

            let process = self.processes.get_mut(slot);

            process.dispatch(now);
            self.timeline.switch_to(process.id, now);
            process.execute(1);
            self.clock.run(1);

            if process.is_complete() {
                self.timeline.complete(self.clock.now());
                self.complete(slot);
            }
        }
    }

    /// Serve the Round Robin queue, one block per slice.
    pub fn run_round_robin(&mut self, quantum: Ticks) {
        let mut queue = RoundRobinQueue::new(&self.processes);

        while !self.is_done() {
            if queue.is_empty() {
                if let Some(t) = queue.next_arrival(&self.processes) {
                    self.clock.idle_until(t);
                }
            }

            queue.admit(&self.processes, self.clock.now());

            let Some(slot) = queue.pop() else {
                continue;
            };

            let now = self.clock.now();
            let process = self.processes.get_mut(slot);
            let slice = quantum.min(process.remaining_time());

            process.dispatch(now);
            process.execute(slice);
            self.clock.run(slice);

            let done = process.is_complete();
            self.timeline
                .push(ExecutionBlock::new(now, process.id, slice, done));

            // Arrivals during the slice are queued before the preempted process.
            queue.admit(&self.processes, self.clock.now());

            if done {
                self.complete(slot);
            } else {
                queue.requeue(slot);
            }
        }
    }

    pub fn into_schedule(self, policy: Policy) -> Schedule {
        debug_assert!(self.is_done(), "Schedule requested before completion");

        Schedule {
            policy,
            total_time_elapsed: self.clock.now(),
            total_burst_time: self.clock.busy_time(),
            idle_time: self.clock.idle_time(),
            blocks: self.timeline.into_blocks(),
            processes: self.processes.into_processes(),
        }
    }
}
