//! Plain text report.

use std::io::{BufWriter, Write};

use anyhow::Result;

use crate::{
    context::SimContext,
    metrics::{SystemMetrics, TimingAverages},
    process::{Process, ProcessTimings},
    schedule::Schedule,
    utils::format_general,
    ScheduleProcessor, Ticks,
};

/// Significant digits of the floating point values.
const PRECISION: usize = 15;

fn write_timings<W, F>(
    w: &mut W,
    title: &str,
    processes: &[Process],
    average: f64,
    field: F,
) -> Result<()>
where
    W: Write,
    F: Fn(&ProcessTimings) -> Ticks,
{
    writeln!(w, "{} times:", title)?;

    for p in processes {
        let value = p.timings().map(&field).unwrap_or_default();
        writeln!(w, " Process {}: {}ns", p.id, value)?;
    }

    writeln!(
        w,
        "Average {} time: {}ns",
        title.to_lowercase(),
        format_general(average, PRECISION)
    )?;

    Ok(())
}

/// Write the report of test case `case` to `w`.
pub fn write_case_report<W: Write>(w: &mut W, case: usize, schedule: &Schedule) -> Result<()> {
    writeln!(w, "{} {}", case, schedule.policy.kind())?;

    for b in &schedule.blocks {
        let marker = if b.completes_process { "X" } else { "" };
        writeln!(w, "{} {} {}{}", b.start_time, b.process_id, b.duration, marker)?;
    }

    let system = SystemMetrics::new(schedule);

    writeln!(w, "Total time elapsed: {}ns", system.total_time_elapsed)?;
    writeln!(w, "Total CPU burst time: {}ns", system.total_burst_time)?;
    writeln!(w, "CPU Utilization: {}%", system.utilization)?;
    writeln!(
        w,
        "Throughput: {} processes/ns",
        format_general(system.throughput, PRECISION)
    )?;

    let averages = TimingAverages::new(schedule);
    let processes = schedule.processes.as_slice();

    write_timings(w, "Waiting", processes, averages.waiting, |t| {
        t.waiting_time
    })?;
    write_timings(w, "Turnaround", processes, averages.turnaround, |t| {
        t.turnaround_time
    })?;
    write_timings(w, "Response", processes, averages.response, |t| {
        t.response_time
    })?;

    Ok(())
}

/// Writes every schedule as text, in case order.
pub struct TextReport<W: Write> {
    out: BufWriter<W>,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: BufWriter::new(out),
        }
    }
}

impl<W: Write> ScheduleProcessor for TextReport<W> {
    fn pre_load_init(&mut self, _ctx: &SimContext) -> Result<()> {
        Ok(())
    }

    fn post_load_init(&mut self, _ctx: &SimContext) -> Result<()> {
        Ok(())
    }

    fn consume_schedule(
        &mut self,
        case: usize,
        schedule: &Schedule,
        _ctx: &SimContext,
    ) -> Result<()> {
        write_case_report(&mut self.out, case, schedule)
    }

    fn finalize(&mut self, ctx: &SimContext) -> Result<()> {
        self.out.flush()?;

        if let Some(p) = &ctx.report_path {
            eprintln!("sched-sim: Results saved in {}.", p.display());
        }

        Ok(())
    }
}
