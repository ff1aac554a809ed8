//! Command line interface.

use std::path::PathBuf;

use clap::Parser;

/// Report format.
#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Human readable report, one block per test case.
    #[default]
    Text,
    /// Single JSON array holding every case report.
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

/// Where test cases are read from.
pub enum WorkloadSourceType {
    Stdin,
    File(PathBuf),
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Single-CPU process scheduling simulator", long_about = None)]
pub struct CLI {
    /// Read test cases from FILE instead of the standard input.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Report format.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Report destination. Text reports default to the standard output, JSON
    /// reports to a uniquely named file in the current directory.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Skip test cases with an unknown policy instead of failing.
    #[arg(long)]
    pub skip_unknown_policies: bool,

    /// Check the consistency of every simulated schedule.
    #[arg(long)]
    pub validate: bool,

    #[arg(short, long)]
    pub verbose: bool,
}

impl CLI {
    pub fn workload_source_type(&self) -> WorkloadSourceType {
        match &self.input {
            Some(p) => WorkloadSourceType::File(p.clone()),
            None => WorkloadSourceType::Stdin,
        }
    }

    pub fn report_format(&self) -> ReportFormat {
        self.format
    }

    pub fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{ReportFormat, WorkloadSourceType, CLI};

    #[test]
    fn test_cli_definition() {
        CLI::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = CLI::parse_from(["sched-sim"]);

        assert_eq!(cli.report_format(), ReportFormat::Text);
        assert!(matches!(cli.workload_source_type(), WorkloadSourceType::Stdin));
        assert!(cli.output().is_none());
        assert!(!cli.skip_unknown_policies);
    }

    #[test]
    fn test_options() {
        let cli = CLI::parse_from([
            "sched-sim",
            "-i",
            "cases.txt",
            "--format",
            "json",
            "-o",
            "out.json",
            "--validate",
            "-v",
        ]);

        assert_eq!(cli.report_format(), ReportFormat::Json);
        assert!(matches!(
            cli.workload_source_type(),
            WorkloadSourceType::File(p) if p.to_str() == Some("cases.txt")
        ));
        assert_eq!(cli.output().and_then(|p| p.to_str()), Some("out.json"));
        assert!(cli.validate);
        assert!(cli.verbose);
    }
}
