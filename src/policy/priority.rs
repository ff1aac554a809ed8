use super::SelectionRule;
use crate::{process::Process, Ticks};

/// Preemptive priority: lowest nice level, then earliest arrival.
pub struct Priority;

impl SelectionRule for Priority {
    type Key = (i32, Ticks);

    fn key(&self, process: &Process) -> Self::Key {
        (process.nice_level(), process.arrival_time())
    }
}

#[cfg(test)]
mod tests {
    use super::Priority;
    use crate::policy::SelectionRule;
    use crate::process::{ProcessSpec, ProcessTable};

    #[test]
    fn test_priority_select() {
        let table = ProcessTable::new(&[
            ProcessSpec::new(1, 2, 0),
            ProcessSpec::new(0, 3, 0),
            ProcessSpec::new(3, 1, -2),
        ]);

        assert_eq!(Priority.select(&table, 0), Some(1));
        assert_eq!(Priority.select(&table, 1), Some(1));
        assert_eq!(Priority.select(&table, 3), Some(2));
    }
}
