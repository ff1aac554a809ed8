//! Scheduling policies.
//!
//! FCFS, SJF, SRTF and priority scheduling all pick the ready process with the
//! smallest key, so they are expressed as `SelectionRule`s. Whether the chosen
//! process runs to completion or for a single unit is up to the engine loop
//! that consumes the rule. Round Robin keeps its own ready queue and is
//! implemented in `round_robin`.

use std::{fmt::Display, str::FromStr};

use anyhow::{bail, Result};
use serde::Serialize;

use crate::{
    process::{Process, ProcessTable, Slot},
    utils::ArgMinTracker,
    Ticks,
};

pub mod fcfs;
pub mod priority;
pub mod round_robin;
pub mod sjf;
pub mod srtf;

pub use fcfs::Fcfs;
pub use priority::Priority;
pub use round_robin::RoundRobinQueue;
pub use sjf::Sjf;
pub use srtf::Srtf;

/// How the clock moves when no process is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleAdvance {
    /// Jump straight to the next arrival.
    NextArrival,
    /// Advance one unit and look again.
    Step,
}

/// Picks the next process among the ready ones.
pub trait SelectionRule {
    type Key: Ord;

    /// Ordering key. The ready process with the smallest key is selected,
    /// remaining ties go to the lowest slot.
    fn key(&self, process: &Process) -> Self::Key;

    fn idle_advance(&self) -> IdleAdvance {
        IdleAdvance::Step
    }

    /// Returns the slot of the process to run at `now`, if any is ready.
    fn select(&self, processes: &ProcessTable, now: Ticks) -> Option<Slot> {
        processes
            .ready(now)
            .map(|slot| (self.key(processes.get(slot)), slot))
            .collect::<ArgMinTracker<_, _>>()
            .into_inner()
    }
}

/// Policy identifiers, as spelled in test case files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Srtf,
    Priority,
    RoundRobin,
}

impl PolicyKind {
    pub fn token(&self) -> &'static str {
        match self {
            PolicyKind::Fcfs => "FCFS",
            PolicyKind::Sjf => "SJF",
            PolicyKind::Srtf => "SRTF",
            PolicyKind::Priority => "P",
            PolicyKind::RoundRobin => "RR",
        }
    }

    /// Returns true if the test case format carries a quantum for this policy.
    pub fn needs_quantum(&self) -> bool {
        matches!(self, PolicyKind::RoundRobin)
    }
}

impl FromStr for PolicyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FCFS" => Ok(PolicyKind::Fcfs),
            "SJF" => Ok(PolicyKind::Sjf),
            "SRTF" => Ok(PolicyKind::Srtf),
            "P" => Ok(PolicyKind::Priority),
            "RR" => Ok(PolicyKind::RoundRobin),
            _ => bail!("Unknown scheduling policy {:?}", s),
        }
    }
}

impl Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for PolicyKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

/// A fully parameterized scheduling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Fcfs,
    Sjf,
    Srtf,
    Priority,
    RoundRobin { quantum: Ticks },
}

impl Policy {
    /// Build a policy from its kind. `quantum` is required by, and only used
    /// for, Round Robin.
    ///
    /// ```
    /// use sched_sim::policy::{Policy, PolicyKind};
    ///
    /// let rr = Policy::new(PolicyKind::RoundRobin, Some(4)).unwrap();
    /// assert_eq!(rr, Policy::RoundRobin { quantum: 4 });
    ///
    /// assert!(Policy::new(PolicyKind::RoundRobin, Some(0)).is_err());
    /// ```
    pub fn new(kind: PolicyKind, quantum: Option<Ticks>) -> Result<Self> {
        let policy = match kind {
            PolicyKind::Fcfs => Policy::Fcfs,
            PolicyKind::Sjf => Policy::Sjf,
            PolicyKind::Srtf => Policy::Srtf,
            PolicyKind::Priority => Policy::Priority,
            PolicyKind::RoundRobin => match quantum {
                Some(0) => bail!("Round Robin quantum must be positive"),
                Some(quantum) => Policy::RoundRobin { quantum },
                None => bail!("Round Robin requires a quantum"),
            },
        };

        Ok(policy)
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Fcfs => PolicyKind::Fcfs,
            Policy::Sjf => PolicyKind::Sjf,
            Policy::Srtf => PolicyKind::Srtf,
            Policy::Priority => PolicyKind::Priority,
            Policy::RoundRobin { .. } => PolicyKind::RoundRobin,
        }
    }

    pub fn quantum(&self) -> Option<Ticks> {
        match self {
            Policy::RoundRobin { quantum } => Some(*quantum),
            _ => None,
        }
    }

    pub fn is_preemptive(&self) -> bool {
        matches!(
            self,
            Policy::Srtf | Policy::Priority | Policy::RoundRobin { .. }
        )
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::RoundRobin { quantum } => write!(f, "RR(q={})", quantum),
            p => write!(f, "{}", p.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Policy, PolicyKind};

    #[test]
    fn test_policy_tokens() {
        for kind in [
            PolicyKind::Fcfs,
            PolicyKind::Sjf,
            PolicyKind::Srtf,
            PolicyKind::Priority,
            PolicyKind::RoundRobin,
        ] {
            assert_eq!(kind.token().parse::<PolicyKind>().unwrap(), kind);
        }

        assert!("rr".parse::<PolicyKind>().is_err());
        assert!("PRIO".parse::<PolicyKind>().is_err());
        assert!(PolicyKind::RoundRobin.needs_quantum());
        assert!(!PolicyKind::Priority.needs_quantum());
    }

    #[test]
    fn test_policy_new() {
        assert_eq!(Policy::new(PolicyKind::Srtf, None).unwrap(), Policy::Srtf);
        assert_eq!(Policy::new(PolicyKind::Fcfs, Some(3)).unwrap(), Policy::Fcfs);
        assert!(Policy::new(PolicyKind::RoundRobin, None).is_err());
        assert_eq!(
            Policy::new(PolicyKind::RoundRobin, Some(2))
                .unwrap()
                .to_string(),
            "RR(q=2)"
        );
        assert_eq!(Policy::Priority.to_string(), "P");
    }
}
