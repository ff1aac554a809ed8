//! Simulated processes.

use std::fmt::Display;

use serde::Serialize;

use crate::Ticks;

/// Process identifier, assigned from 1 in input order.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProcessId(u32);

impl ProcessId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input attributes of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessSpec {
    /// Time at which the process becomes eligible to run.
    pub arrival_time: Ticks,
    /// Total CPU time required.
    pub burst_time: Ticks,
    /// Priority level. Lower is more urgent.
    pub nice_level: i32,
}

impl ProcessSpec {
    pub fn new(arrival_time: Ticks, burst_time: Ticks, nice_level: i32) -> Self {
        Self {
            arrival_time,
            burst_time,
            nice_level,
        }
    }
}

/// Timing data of a completed process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessTimings {
    /// First dispatch.
    pub start_time: Ticks,
    /// Time at which the last unit of the burst was executed.
    pub completion_time: Ticks,
    pub waiting_time: Ticks,
    pub turnaround_time: Ticks,
    pub response_time: Ticks,
}

impl ProcessTimings {
    fn new(spec: &ProcessSpec, start_time: Ticks, completion_time: Ticks) -> Self {
        debug_assert!(start_time >= spec.arrival_time);
        debug_assert!(completion_time >= spec.arrival_time + spec.burst_time);

        let turnaround_time = completion_time - spec.arrival_time;

        Self {
            start_time,
            completion_time,
            waiting_time: turnaround_time - spec.burst_time,
            turnaround_time,
            response_time: start_time - spec.arrival_time,
        }
    }
}

/// A process and its run-time state.
#[derive(Debug, Clone, Serialize)]
pub struct Process {
    pub id: ProcessId,
    #[serde(flatten)]
    pub spec: ProcessSpec,
    #[serde(skip)]
    remaining_time: Ticks,
    #[serde(skip)]
    start_time: Option<Ticks>,
    #[serde(flatten)]
    timings: Option<ProcessTimings>,
}

impl Process {
    pub fn new(id: ProcessId, spec: ProcessSpec) -> Self {
        Self {
            id,
            spec,
            remaining_time: spec.burst_time,
            start_time: None,
            timings: None,
        }
    }

    pub fn arrival_time(&self) -> Ticks {
        self.spec.arrival_time
    }

    pub fn burst_time(&self) -> Ticks {
        self.spec.burst_time
    }

    pub fn nice_level(&self) -> i32 {
        self.spec.nice_level
    }

    pub fn remaining_time(&self) -> Ticks {
        self.remaining_time
    }

    pub fn start_time(&self) -> Option<Ticks> {
        self.start_time
    }

    /// Returns true once the process has been dispatched at least once.
    pub fn is_started(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining_time == 0
    }

    /// A process is ready at `now` if it has arrived and still has work left.
    pub fn is_ready(&self, now: Ticks) -> bool {
        self.spec.arrival_time <= now && !self.is_complete()
    }

    /// Record a dispatch at `now`. Only the first dispatch sets the start time.
    pub fn dispatch(&mut self, now: Ticks) {
        debug_assert!(self.is_ready(now), "Process {} dispatched while not ready", self.id);

        self.start_time.get_or_insert(now);
    }

    /// Run the process for `ticks` units.
    pub fn execute(&mut self, ticks: Ticks) {
        debug_assert!(
            ticks <= self.remaining_time,
            "Process {} executed past its burst",
            self.id
        );

        self.remaining_time -= ticks;
    }

    /// Finalize the timing data. Must be called at the completion instant.
    pub fn finish(&mut self, now: Ticks) {
        debug_assert!(self.is_complete(), "Process {} finished early", self.id);
        debug_assert!(self.timings.is_none(), "Process {} finished twice", self.id);

        let start_time = self.start_time.unwrap_or(now);
        self.timings = Some(ProcessTimings::new(&self.spec, start_time, now));
    }

    /// Timing data, available once the process completed.
    pub fn timings(&self) -> Option<&ProcessTimings> {
        self.timings.as_ref()
    }
}

/// Index of a process in its `ProcessTable`.
pub type Slot = usize;

/// Arena holding every process of a test case.
///
/// Slots follow input order, hence process id order. Schedulers and queues
/// refer to processes by slot only.
#[derive(Debug, Clone)]
pub struct ProcessTable {
    processes: Vec<Process>,
}

impl ProcessTable {
    pub fn new(specs: &[ProcessSpec]) -> Self {
        let processes = specs
            .iter()
            .enumerate()
            .map(|(i, spec)| Process::new(ProcessId::new(i as u32 + 1), *spec))
            .collect();

        Self { processes }
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn get(&self, slot: Slot) -> &Process {
        &self.processes[slot]
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut Process {
        &mut self.processes[slot]
    }

    /// Slots of the processes ready at `now`, in input order.
    pub fn ready(&self, now: Ticks) -> impl Iterator<Item = Slot> + '_ {
        self.processes
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.is_ready(now))
            .map(|(slot, _)| slot)
    }

    /// Earliest arrival strictly after `now` among unfinished processes.
    pub fn next_arrival(&self, now: Ticks) -> Option<Ticks> {
        self.processes
            .iter()
            .filter(|p| !p.is_complete() && p.arrival_time() > now)
            .map(Process::arrival_time)
            .min()
    }

    pub fn into_processes(self) -> Vec<Process> {
        self.processes
    }
}

#[cfg(test)]
mod tests {
    use super::{ProcessId, ProcessSpec, ProcessTable};

    #[test]
    fn test_process_lifecycle() {
        let mut table = ProcessTable::new(&[ProcessSpec::new(2, 3, 0)]);
        let p = table.get_mut(0);

        assert_eq!(p.id, ProcessId::new(1));
        assert!(!p.is_ready(1));
        assert!(p.is_ready(2));
        assert!(!p.is_started());

        p.dispatch(4);
        p.execute(1);
        p.dispatch(6);
        p.execute(2);

        assert!(p.is_complete());
        assert_eq!(p.start_time(), Some(4));

        p.finish(8);

        let t = p.timings().unwrap();
        assert_eq!(t.completion_time, 8);
        assert_eq!(t.turnaround_time, 6);
        assert_eq!(t.waiting_time, 3);
        assert_eq!(t.response_time, 2);
    }

    #[test]
    fn test_ready_and_next_arrival() {
        let mut table = ProcessTable::new(&[
            ProcessSpec::new(0, 1, 0),
            ProcessSpec::new(5, 1, 0),
            ProcessSpec::new(3, 1, 0),
        ]);

        assert_eq!(table.ready(0).collect::<Vec<_>>(), vec![0]);
        assert_eq!(table.ready(5).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(table.next_arrival(0), Some(3));

        table.get_mut(0).execute(1);

        assert_eq!(table.ready(3).collect::<Vec<_>>(), vec![2]);
        assert_eq!(table.next_arrival(3), Some(5));
        assert_eq!(table.next_arrival(5), None);
    }
}
