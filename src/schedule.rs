//! Outcome of a simulation run.

use anyhow::{bail, Result};

use crate::{
    policy::Policy,
    process::{Process, ProcessId},
    timeline::ExecutionBlock,
    Ticks,
};

/// Everything a reporter needs to know about one simulated test case.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub policy: Policy,
    /// Processes, sorted by id.
    pub processes: Vec<Process>,
    /// Execution blocks, in time order.
    pub blocks: Vec<ExecutionBlock>,
    /// Makespan: clock value once every process completed.
    pub total_time_elapsed: Ticks,
    pub total_burst_time: Ticks,
    pub idle_time: Ticks,
}

impl Schedule {
    /// CPU time received by `process_id`, summed over its blocks.
    pub fn processor_time(&self, process_id: ProcessId) -> Ticks {
        self.blocks
            .iter()
            .filter(|b| b.process_id == process_id)
            .map(|b| b.duration)
            .sum()
    }

    /// Check the conservation properties every run must satisfy.
    ///
    /// Returns an error describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let busy: Ticks = self.blocks.iter().map(|b| b.duration).sum();

        if busy + self.idle_time != self.total_time_elapsed {
            bail!(
                "{}: blocks cover {} and idle time is {}, but {} elapsed",
                self.policy,
                busy,
                self.idle_time,
                self.total_time_elapsed
            );
        }

        let bursts: Ticks = self.processes.iter().map(Process::burst_time).sum();

        if bursts != self.total_burst_time {
            bail!(
                "{}: total burst time is {}, expected {}",
                self.policy,
                self.total_burst_time,
                bursts
            );
        }

        let mut end = 0;
        for b in &self.blocks {
            if b.duration == 0 {
                bail!("{}: empty block at {}", self.policy, b.start_time);
            }

            if b.start_time < end {
                bail!("{}: overlapping block at {}", self.policy, b.start_time);
            }

            if let Some(quantum) = self.policy.quantum() {
                if b.duration > quantum {
                    bail!(
                        "{}: block at {} lasts {}, longer than the quantum",
                        self.policy,
                        b.start_time,
                        b.duration
                    );
                }
            }

            end = b.end_time();
        }

        for p in &self.processes {
            self.validate_process(p)?;
        }

        Ok(())
    }

    fn validate_process(&self, p: &Process) -> Result<()> {
        let Some(t) = p.timings() else {
            bail!("{}: process {} never completed", self.policy, p.id);
        };

        if t.turnaround_time != t.waiting_time + p.burst_time() {
            bail!(
                "{}: process {} turnaround {} != waiting {} + burst {}",
                self.policy,
                p.id,
                t.turnaround_time,
                t.waiting_time,
                p.burst_time()
            );
        }

        let received = self.processor_time(p.id);

        if received != p.burst_time() {
            bail!(
                "{}: process {} received {} instead of {}",
                self.policy,
                p.id,
                received,
                p.burst_time()
            );
        }

        let blocks: Vec<&ExecutionBlock> = self
            .blocks
            .iter()
            .filter(|b| b.process_id == p.id)
            .collect();

        if !self.policy.is_preemptive() && blocks.len() != 1 {
            bail!(
                "{}: process {} ran in {} blocks",
                self.policy,
                p.id,
                blocks.len()
            );
        }

        let Some((last, earlier)) = blocks.split_last() else {
            bail!("{}: process {} never ran", self.policy, p.id);
        };

        if !last.completes_process || earlier.iter().any(|b| b.completes_process) {
            bail!(
                "{}: process {} completion marker misplaced",
                self.policy,
                p.id
            );
        }

        if last.end_time() != t.completion_time || blocks[0].start_time != t.start_time {
            bail!(
                "{}: process {} timings disagree with its blocks",
                self.policy,
                p.id
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Schedule;
    use crate::{
        engine::simulate,
        policy::Policy,
        process::{ProcessId, ProcessSpec},
        workload::Workload,
    };

    fn srtf_schedule() -> Schedule {
        let workload = Workload::new(
            Policy::Srtf,
            vec![ProcessSpec::new(0, 7, 0), ProcessSpec::new(2, 4, 0)],
        )
        .unwrap();

        simulate(&workload)
    }

    #[test]
    fn test_processor_time() {
        let schedule = srtf_schedule();

        assert_eq!(schedule.processor_time(ProcessId::new(1)), 7);
        assert_eq!(schedule.processor_time(ProcessId::new(2)), 4);
        assert_eq!(schedule.processor_time(ProcessId::new(3)), 0);
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_validate_detects_inconsistencies() {
        let mut schedule = srtf_schedule();
        schedule.idle_time += 1;
        assert!(schedule.validate().is_err());

        let mut schedule = srtf_schedule();
        schedule.blocks[2].duration -= 1;
        schedule.total_time_elapsed -= 1;
        let e = format!("{:#}", schedule.validate().unwrap_err());
        assert!(e.contains("process 1 received 6 instead of 7"), "{}", e);

        let mut schedule = srtf_schedule();
        schedule.blocks[0].completes_process = true;
        assert!(schedule.validate().is_err());
    }
}
