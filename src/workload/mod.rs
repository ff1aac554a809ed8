//! Test case definitions.

use anyhow::{bail, Result};

use crate::{
    policy::Policy,
    process::{ProcessSpec, ProcessTable},
};

pub mod reader;

pub use reader::{ReadCase, WorkloadReader};

/// A validated set of processes to be scheduled under one policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    policy: Policy,
    specs: Vec<ProcessSpec>,
}

impl Workload {
    /// Fails if there is no process, if a process has an empty burst, or if
    /// the latest arrival plus every burst does not fit in `Ticks`. The run
    /// always ends by then.
    ///
    /// ```
    /// use sched_sim::{policy::Policy, process::ProcessSpec, workload::Workload};
    ///
    /// assert!(Workload::new(Policy::Sjf, vec![ProcessSpec::new(0, 3, 0)]).is_ok());
    /// assert!(Workload::new(Policy::Sjf, vec![ProcessSpec::new(0, 0, 0)]).is_err());
    /// assert!(Workload::new(Policy::Sjf, vec![]).is_err());
    /// ```
    pub fn new(policy: Policy, specs: Vec<ProcessSpec>) -> Result<Self> {
        if specs.is_empty() {
            bail!("A workload needs at least one process");
        }

        if let Some(i) = specs.iter().position(|s| s.burst_time == 0) {
            bail!("Process {} has an empty CPU burst", i + 1);
        }

        let latest_arrival = specs.iter().map(|s| s.arrival_time).max().unwrap_or_default();
        let horizon = specs
            .iter()
            .try_fold(latest_arrival, |t, s| t.checked_add(s.burst_time));

        if horizon.is_none() {
            bail!("Arrival and burst times exceed the simulated time range");
        }

        Ok(Self { policy, specs })
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn specs(&self) -> &[ProcessSpec] {
        &self.specs
    }

    /// Fresh process table for a run of this workload.
    pub fn processes(&self) -> ProcessTable {
        ProcessTable::new(&self.specs)
    }
}

/// A numbered workload, as read from a test case stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Position in the stream, from 1.
    pub number: usize,
    pub workload: Workload,
}
