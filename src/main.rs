use std::io::stdout;

use anyhow::{Error, Result};
use clap::Parser;
use sched_sim::{
    context::SimContext,
    io::create_report_file,
    processors::{json_report::JsonReport, text_report::TextReport},
    workload::WorkloadReader,
    ScheduleProcessor, WorkloadSource,
};

use sched_sim::cli::*;

pub fn run<P: ScheduleProcessor>(mut processor: P, opts: &CLI, ctx: SimContext) -> Result<()> {
    processor.pre_load_init(&ctx)?;

    let reader = match opts.workload_source_type() {
        WorkloadSourceType::Stdin => WorkloadReader::from_reader(std::io::stdin().lock())?,
        WorkloadSourceType::File(path) => WorkloadReader::open(path)?,
    };

    reader
        .skip_unknown_policies(ctx.skip_unknown_policies)
        .process_workloads(processor, &ctx)
}

fn main() -> Result<(), Error> {
    let opts = CLI::parse();
    let ctx = SimContext::from(&opts);

    match opts.report_format() {
        ReportFormat::Text => match ctx.report_path.clone() {
            Some(path) => {
                let processor = TextReport::new(create_report_file(path)?);

                run(processor, &opts, ctx)
            }
            None => {
                let processor = TextReport::new(stdout().lock());

                run(processor, &opts, ctx)
            }
        },
        ReportFormat::Json => {
            let processor = JsonReport::from(&ctx);

            run(processor, &opts, ctx)
        }
    }
}
