use super::SelectionRule;
use crate::{process::Process, Ticks};

/// Shortest Job First, non-preemptive: smallest burst, then earliest arrival.
pub struct Sjf;

impl SelectionRule for Sjf {
    type Key = (Ticks, Ticks);

    fn key(&self, process: &Process) -> Self::Key {
        (process.burst_time(), process.arrival_time())
    }
}
