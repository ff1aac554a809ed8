use super::SelectionRule;
use crate::{process::Process, Ticks};

/// Shortest Remaining Time First: smallest remaining time, then earliest
/// arrival. Meant to be re-evaluated every unit.
pub struct Srtf;

impl SelectionRule for Srtf {
    type Key = (Ticks, Ticks);

    fn key(&self, process: &Process) -> Self::Key {
        (process.remaining_time(), process.arrival_time())
    }
}
