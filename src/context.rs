//! Runtime parameters.
//!
//! `SimContext` gathers everything sources and processors need at runtime. It
//! is meant to be built from command line parameters:
//! ```no_run
//! use sched_sim::{cli::CLI, context::SimContext};
//! use clap::Parser;
//!
//! let args = CLI::parse();
//! let ctx = SimContext::from(&args);
//! ```
//! Defaults are defined in the `cli` module.

use std::path::PathBuf;

use crate::cli::{ReportFormat, CLI};

#[derive(Debug, Clone, Default)]
pub struct SimContext {
    pub verbose: bool,
    /// If true, cases with an unknown policy are skipped instead of aborting
    /// the run.
    pub skip_unknown_policies: bool,
    /// If true, every schedule is checked before being reported.
    pub validate: bool,
    pub report_format: ReportFormat,
    /// Report destination chosen by the user, if any.
    pub report_path: Option<PathBuf>,
}

impl From<&CLI> for SimContext {
    fn from(cli_opts: &CLI) -> Self {
        Self {
            verbose: cli_opts.verbose,
            skip_unknown_policies: cli_opts.skip_unknown_policies,
            validate: cli_opts.validate,
            report_format: cli_opts.report_format(),
            report_path: cli_opts.output().cloned(),
        }
    }
}
