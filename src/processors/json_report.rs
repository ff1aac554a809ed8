//! JSON report.
//!
//! Case reports are collected while the workload is processed and written as
//! a single array once every case has been simulated.

use std::{
    env::current_dir,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{anyhow, Result};
use serde::Serialize;

use crate::{
    cli::ReportFormat,
    context::SimContext,
    io::{create_report_file, unique_report_path},
    metrics::{SystemMetrics, TimingAverages},
    policy::PolicyKind,
    process::Process,
    schedule::Schedule,
    timeline::ExecutionBlock,
    ScheduleProcessor, Ticks,
};

#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub case: usize,
    pub policy: PolicyKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantum: Option<Ticks>,
    pub blocks: Vec<ExecutionBlock>,
    pub processes: Vec<Process>,
    pub system: SystemMetrics,
    pub averages: TimingAverages,
}

impl CaseReport {
    pub fn new(case: usize, schedule: &Schedule) -> Self {
        Self {
            case,
            policy: schedule.policy.kind(),
            quantum: schedule.policy.quantum(),
            blocks: schedule.blocks.clone(),
            processes: schedule.processes.clone(),
            system: SystemMetrics::new(schedule),
            averages: TimingAverages::new(schedule),
        }
    }
}

/// Writes every case report into one JSON file.
#[derive(Default)]
pub struct JsonReport {
    path: Option<PathBuf>,
    out: Option<BufWriter<Box<dyn Write>>>,
    reports: Vec<CaseReport>,
}

impl JsonReport {
    /// Write the report to `out` rather than to a file.
    pub fn with_writer<W: Write + 'static>(out: W) -> Self {
        Self {
            out: Some(BufWriter::new(Box::new(out))),
            ..Default::default()
        }
    }
}

impl From<&SimContext> for JsonReport {
    fn from(ctx: &SimContext) -> Self {
        Self {
            path: ctx.report_path.clone(),
            ..Default::default()
        }
    }
}

impl ScheduleProcessor for JsonReport {
    fn pre_load_init(&mut self, _ctx: &SimContext) -> Result<()> {
        if self.out.is_some() {
            return Ok(());
        }

        let path = match self.path.take() {
            Some(p) => p,
            None => unique_report_path(current_dir()?, ReportFormat::Json.extension())?,
        };

        let f = create_report_file(&path)?;

        self.out = Some(BufWriter::new(Box::new(f)));
        self.path = Some(path);

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
        self.reports.push(CaseReport::new(case, schedule));

        Ok(())
    }

    fn finalize(&mut self, ctx: &SimContext) -> Result<()> {
        let out = self
            .out
            .as_mut()
            .ok_or_else(|| anyhow!("JSON report finalized before initialization"))?;

        serde_json::to_writer_pretty(&mut *out, &self.reports)?;
        writeln!(out)?;
        out.flush()?;

        if let Some(p) = &self.path {
            eprintln!("sched-sim: Results saved in {}.", p.display());
        } else if ctx.verbose {
            eprintln!("sched-sim: {} case reports written.", self.reports.len());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::RefCell,
        io::{self, Write},
        rc::Rc,
    };

    use serde_json::{json, Value};

    use super::JsonReport;
    use crate::{context::SimContext, workload::WorkloadReader, ScheduleProcessor, WorkloadSource};

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_json_report() {
        let buffer = SharedBuffer::default();
        let ctx = SimContext::default();
        let mut report = JsonReport::with_writer(buffer.clone());

        report.pre_load_init(&ctx).unwrap();
        WorkloadReader::new("2\n1 RR 2\n0 3 0\n1 P\n1 2 -1\n".to_string())
            .process_workloads(report, &ctx)
            .unwrap();

        let data = buffer.0.borrow();
        let v: Value = serde_json::from_slice(&data).unwrap();

        assert_eq!(v.as_array().unwrap().len(), 2);

        let rr = &v[0];
        assert_eq!(rr["case"], json!(1));
        assert_eq!(rr["policy"], json!("RR"));
        assert_eq!(rr["quantum"], json!(2));
        assert_eq!(
            rr["blocks"],
            json!([
                { "start_time": 0, "process_id": 1, "duration": 2, "completes_process": false },
                { "start_time": 2, "process_id": 1, "duration": 1, "completes_process": true },
            ])
        );
        assert_eq!(rr["processes"][0]["completion_time"], json!(3));
        assert_eq!(rr["system"]["utilization"], json!(100));

        let p = &v[1];
        assert_eq!(p["policy"], json!("P"));
        assert!(p.get("quantum").is_none());
        assert_eq!(p["processes"][0]["nice_level"], json!(-1));
        assert_eq!(p["system"]["idle_time"], json!(1));
        assert_eq!(p["averages"]["response"], json!(0.0));
    }
}
