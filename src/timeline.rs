//! Execution timeline.
//!
//! A timeline is the ordered sequence of execution blocks produced by a run.
//! Non-preemptive policies and Round Robin push whole blocks. Preemptive
//! policies run one unit at a time and let the recorder merge consecutive
//! units of the same process into a single pending block, which is closed on
//! a context switch or when the process completes.

use serde::Serialize;

use crate::{process::ProcessId, Ticks};

/// One contiguous slice of CPU time given to a single process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExecutionBlock {
    pub start_time: Ticks,
    pub process_id: ProcessId,
    pub duration: Ticks,
    /// True if the process completes at the end of this block.
    pub completes_process: bool,
}

impl ExecutionBlock {
    pub fn new(
        start_time: Ticks,
        process_id: ProcessId,
        duration: Ticks,
        completes_process: bool,
    ) -> Self {
        Self {
            start_time,
            process_id,
            duration,
            completes_process,
        }
    }

    pub fn end_time(&self) -> Ticks {
        self.start_time + self.duration
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingBlock {
    process_id: ProcessId,
    start_time: Ticks,
}

#[derive(Debug, Default)]
pub struct Timeline {
    blocks: Vec<ExecutionBlock>,
    pending: Option<PendingBlock>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a complete block.
    pub fn push(&mut self, block: ExecutionBlock) {
        debug_assert!(self.pending.is_none(), "Pushing a block over a pending one");
        debug_assert!(block.duration > 0, "Empty block for process {}", block.process_id);

        self.blocks.push(block);
    }

    /// Give the CPU to `process_id` at `now`.
    ///
    /// If another process holds the pending block, that block is closed as
    /// preempted and a new one is opened. Nothing happens if `process_id`
    /// already owns the pending block.
    pub fn switch_to(&mut self, process_id: ProcessId, now: Ticks) {
        match self.pending {
            Some(p) if p.process_id == process_id => return,
            Some(p) => self.close(p, now, false),
            None => {}
        }

        self.pending = Some(PendingBlock {
            process_id,
            start_time: now,
        });
    }

    /// Close the pending block at `now`, marking its process as complete.
    pub fn complete(&mut self, now: Ticks) {
        if let Some(p) = self.pending {
            self.close(p, now, true);
        }
    }

    fn close(&mut self, pending: PendingBlock, now: Ticks, completes_process: bool) {
        debug_assert!(now > pending.start_time, "Closing an empty block");

        self.pending = None;
        self.blocks.push(ExecutionBlock::new(
            pending.start_time,
            pending.process_id,
            now - pending.start_time,
            completes_process,
        ));
    }

    pub fn blocks(&self) -> &[ExecutionBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<ExecutionBlock> {
        debug_assert!(self.pending.is_none(), "Timeline dropped with a pending block");

        self.blocks
    }
}
