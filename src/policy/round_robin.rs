//! Round Robin ready queue.
//!
//! Processes are admitted in `(arrival_time, nice_level)` order; the sort is
//! stable so input order breaks the remaining ties. Each admission batch is
//! spliced in front of the processes already waiting, in admission order,
//! while preempted processes go to the back. Consequently a newcomer may run
//! before a process that has been waiting longer.

use std::collections::VecDeque;

use crate::{
    process::{ProcessTable, Slot},
    Ticks,
};

pub struct RoundRobinQueue {
    /// Every slot, sorted by admission order.
    arrivals: Vec<Slot>,
    /// First slot of `arrivals` not admitted yet.
    cursor: usize,
    ready: VecDeque<Slot>,
}

impl RoundRobinQueue {
    pub fn new(processes: &ProcessTable) -> Self {
        let mut arrivals: Vec<Slot> = (0..processes.len()).collect();

        arrivals.sort_by_key(|slot| {
            let p = processes.get(*slot);
            (p.arrival_time(), p.nice_level())
        });

        Self {
            arrivals,
            cursor: 0,
            ready: VecDeque::with_capacity(processes.len()),
        }
    }

    /// Arrival time of the next process not admitted yet.
    pub fn next_arrival(&self, processes: &ProcessTable) -> Option<Ticks> {
        self.arrivals
            .get(self.cursor)
            .map(|slot| processes.get(*slot).arrival_time())
    }

    /// Admit every process arrived by `now`. Returns the number of admitted
    /// processes.
    pub fn admit(&mut self, processes: &ProcessTable, now: Ticks) -> usize {
        let batch = self.arrivals[self.cursor..]
            .iter()
            .take_while(|slot| processes.get(**slot).arrival_time() <= now)
            .count();
        let end = self.cursor + batch;

        for slot in self.arrivals[self.cursor..end].iter().rev() {
            self.ready.push_front(*slot);
        }

        self.cursor = end;

        batch
    }

    pub fn pop(&mut self) -> Option<Slot> {
        self.ready.pop_front()
    }

    /// Put a preempted process back at the tail of the queue.
    pub fn requeue(&mut self, slot: Slot) {
        self.ready.push_back(slot);
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RoundRobinQueue;
    use crate::process::{ProcessSpec, ProcessTable};

    #[test]
    fn test_admission_order() {
        let table = ProcessTable::new(&[
            ProcessSpec::new(0, 2, 5),
            ProcessSpec::new(0, 2, 1),
            ProcessSpec::new(4, 2, 0),
        ]);
        let mut queue = RoundRobinQueue::new(&table);

        assert_eq!(queue.next_arrival(&table), Some(0));
        assert_eq!(queue.admit(&table, 0), 2);
        assert_eq!(queue.next_arrival(&table), Some(4));
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(0));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_batches_are_spliced_in_front() {
        let table = ProcessTable::new(&[
            ProcessSpec::new(0, 4, 0),
            ProcessSpec::new(3, 4, 0),
            ProcessSpec::new(3, 4, 0),
        ]);
        let mut queue = RoundRobinQueue::new(&table);

        queue.admit(&table, 0);
        let first = queue.pop();
        assert_eq!(first, Some(0));
        queue.requeue(0);

        assert_eq!(queue.admit(&table, 2), 0);
        assert_eq!(queue.admit(&table, 3), 2);
        assert_eq!(queue.pop(), Some(1));
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(0));
        assert_eq!(queue.next_arrival(&table), None);
    }
}
