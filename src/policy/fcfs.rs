use super::{IdleAdvance, SelectionRule};
use crate::{process::Process, Ticks};

/// First-Come-First-Served: earliest arrival first, then lowest id.
pub struct Fcfs;

impl SelectionRule for Fcfs {
    type Key = Ticks;

    fn key(&self, process: &Process) -> Self::Key {
        process.arrival_time()
    }

    fn idle_advance(&self) -> IdleAdvance {
        IdleAdvance::NextArrival
    }
}
