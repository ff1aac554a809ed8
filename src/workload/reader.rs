//! Test case stream reader.
//!
//! A stream is a sequence of whitespace separated tokens. It starts with the
//! number of test cases, then each test case reads as
//! ```text
//! <process count> <policy> [<quantum>] (<arrival> <burst> <nice>)*
//! ```
//! where the quantum is only present for `RR`. Line breaks carry no meaning.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};
use nom::{
    bytes::complete::take_while1, character::complete::multispace0, sequence::preceded, IResult,
};

use crate::{
    context::SimContext,
    engine::simulate,
    policy::{Policy, PolicyKind},
    process::ProcessSpec,
    ScheduleProcessor, Ticks, WorkloadSource,
};

use super::{TestCase, Workload};

fn token(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(|c: char| !c.is_whitespace()))(input)
}

/// Item produced by `WorkloadReader`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadCase {
    Case(TestCase),
    /// A test case with an unrecognized policy, read past without simulation.
    Skipped { number: usize, token: String },
}

/// Reads test cases from a token stream.
///
/// The reader is an iterator of `Result<ReadCase>`. It stops after the first
/// error, since the position of the following case is unknown by then.
///
/// ```
/// use sched_sim::workload::{ReadCase, WorkloadReader};
///
/// let mut reader = WorkloadReader::new("1\n2 RR 3\n0 5 0\n1 2 0\n".to_string());
///
/// match reader.next() {
///     Some(Ok(ReadCase::Case(case))) => {
///         assert_eq!(case.number, 1);
///         assert_eq!(case.workload.specs().len(), 2);
///     }
///     _ => panic!("expected a test case"),
/// }
/// assert!(reader.next().is_none());
/// ```
pub struct WorkloadReader {
    input: String,
    pos: usize,
    /// Cases left to read, once the stream header is known.
    remaining: Option<usize>,
    /// Number of the case being read.
    case: usize,
    skip_unknown_policies: bool,
    failed: bool,
}

impl WorkloadReader {
    pub fn new(input: String) -> Self {
        Self {
            input,
            pos: 0,
            remaining: None,
            case: 0,
            skip_unknown_policies: false,
            failed: false,
        }
    }

    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut input = String::new();

        reader
            .read_to_string(&mut input)
            .context("Failed to read test cases")?;

        Ok(Self::new(input))
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;

        Self::from_reader(BufReader::new(f))
    }

    /// If set, test cases with an unknown policy token are read and skipped
    /// instead of failing.
    pub fn skip_unknown_policies(mut self, skip: bool) -> Self {
        self.skip_unknown_policies = skip;
        self
    }

    fn next_token(&mut self) -> Option<&str> {
        let rest = &self.input[self.pos..];

        match token(rest) {
            Ok((tail, tok)) => {
                self.pos = self.input.len() - tail.len();
                Some(tok)
            }
            Err(_) => {
                self.pos = self.input.len();
                None
            }
        }
    }

    fn next_value<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let case = self.case;
        let tok = self.next_token().ok_or_else(|| {
            anyhow!(
                "Test case {}: unexpected end of input, expected {}",
                case,
                what
            )
        })?;

        tok.parse::<T>()
            .with_context(|| format!("Test case {}: invalid {} {:?}", case, what, tok))
    }

    fn next_time(&mut self, what: &str, process: usize) -> Result<Ticks> {
        let value: i64 = self.next_value(what)?;

        if value < 0 {
            bail!(
                "Test case {}: process {} has a negative {} ({})",
                self.case,
                process,
                what,
                value
            );
        }

        Ok(value as Ticks)
    }

    /// Number of test cases announced by the stream. `None` if the stream is
    /// empty.
    fn read_case_count(&mut self) -> Option<Result<usize>> {
        let tok = self.next_token()?;

        Some(
            tok.parse::<usize>()
                .with_context(|| format!("Invalid test case count {:?}", tok)),
        )
    }

    fn read_processes(&mut self, count: usize) -> Result<Vec<ProcessSpec>> {
        let mut specs = Vec::new();

        for i in 1..=count {
            let arrival_time = self.next_time("arrival time", i)?;
            let burst_time = self.next_time("burst time", i)?;
            let nice_level: i32 = self.next_value("nice level")?;

            specs.push(ProcessSpec::new(arrival_time, burst_time, nice_level));
        }

        Ok(specs)
    }

    fn read_case(&mut self) -> Result<ReadCase> {
        let case = self.case;
        let count: usize = self.next_value("process count")?;
        let policy_token: String = self.next_value("policy")?;

        let kind = match policy_token.parse::<PolicyKind>() {
            Ok(kind) => kind,
            Err(_) if self.skip_unknown_policies => {
                self.read_processes(count)?;

                return Ok(ReadCase::Skipped {
                    number: case,
                    token: policy_token,
                });
            }
            Err(e) => return Err(e.context(format!("Test case {}", case))),
        };

        let quantum = if kind.needs_quantum() {
            Some(self.next_value::<Ticks>("quantum")?)
        } else {
            None
        };

        let specs = self.read_processes(count)?;

        let policy = Policy::new(kind, quantum).with_context(|| format!("Test case {}", case))?;
        let workload =
            Workload::new(policy, specs).with_context(|| format!("Test case {}", case))?;

        Ok(ReadCase::Case(TestCase {
            number: case,
            workload,
        }))
    }

    fn read_next(&mut self) -> Option<Result<ReadCase>> {
        let remaining = match self.remaining {
            Some(n) => n,
            None => match self.read_case_count()? {
                Ok(n) => n,
                Err(e) => return Some(Err(e)),
            },
        };

        if remaining == 0 {
            self.remaining = Some(0);
            return None;
        }

        self.remaining = Some(remaining - 1);
        self.case += 1;

        Some(self.read_case())
    }
}

impl Iterator for WorkloadReader {
    type Item = Result<ReadCase>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let res = self.read_next();

        if matches!(res, Some(Err(_))) {
            self.failed = true;
        }

        res
    }
}

impl WorkloadSource for WorkloadReader {
    fn case_loop<P: ScheduleProcessor>(
        &mut self,
        processor: &mut P,
        ctx: &SimContext,
    ) -> Result<()> {
        for case in self.by_ref() {
            match case? {
                ReadCase::Skipped { number, token } => {
                    if ctx.verbose {
                        eprintln!(
                            "sched-sim: test case {}: unknown policy {:?}, skipped",
                            number, token
                        );
                    }
                }
                ReadCase::Case(case) => {
                    let schedule = simulate(&case.workload);

                    if ctx.validate {
                        schedule
                            .validate()
                            .with_context(|| format!("Test case {}", case.number))?;
                    }

                    if ctx.verbose {
                        eprintln!(
                            "sched-sim: test case {}: {}, {} processes, {} blocks, {}ns elapsed",
                            case.number,
                            schedule.policy,
                            schedule.processes.len(),
                            schedule.blocks.len(),
                            schedule.total_time_elapsed
                        );
                    }

                    processor.consume_schedule(case.number, &schedule, ctx)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadCase, WorkloadReader};
    use crate::{policy::Policy, process::ProcessSpec};

    fn read_all(input: &str) -> Vec<anyhow::Result<ReadCase>> {
        WorkloadReader::new(input.to_string()).collect()
    }

    fn error_of(input: &str) -> String {
        let reader = WorkloadReader::new(input.to_string());

        match reader.last() {
            Some(Err(e)) => format!("{:#}", e),
            _ => panic!("expected an error for {:?}", input),
        }
    }

    #[test]
    fn test_two_cases() {
        let cases = read_all("2\n2 SJF\n0 5 0\n1 3 0\n1 RR 4\n3 1 -2\n");

        assert_eq!(cases.len(), 2);

        let Ok(ReadCase::Case(first)) = &cases[0] else {
            panic!("expected a test case");
        };
        assert_eq!(first.number, 1);
        assert_eq!(first.workload.policy(), Policy::Sjf);
        assert_eq!(
            first.workload.specs(),
            &[ProcessSpec::new(0, 5, 0), ProcessSpec::new(1, 3, 0)]
        );

        let Ok(ReadCase::Case(second)) = &cases[1] else {
            panic!("expected a test case");
        };
        assert_eq!(second.number, 2);
        assert_eq!(second.workload.policy(), Policy::RoundRobin { quantum: 4 });
        assert_eq!(second.workload.specs(), &[ProcessSpec::new(3, 1, -2)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(read_all("").is_empty());
        assert!(read_all(" \n\t").is_empty());
        assert!(read_all("0\n").is_empty());
    }

    #[test]
    fn test_extra_tokens_are_ignored() {
        let cases = read_all("1 1 FCFS 0 1 0 trailing");

        assert_eq!(cases.len(), 1);
        assert!(cases[0].is_ok());
    }

    #[test]
    fn test_short_input() {
        let e = error_of("2\n1 FCFS\n0 1 0\n");
        assert!(e.contains("Test case 2"), "{}", e);
        assert!(e.contains("end of input"), "{}", e);

        let e = error_of("1\n2 P\n0 1 0\n4");
        assert!(e.contains("burst time"), "{}", e);
    }

    #[test]
    fn test_reader_stops_after_error() {
        let cases = read_all("3\n1 FCFS\nx 1 0\n1 FCFS\n0 1 0\n");

        assert_eq!(cases.len(), 1);
        assert!(cases[0].is_err());
    }

    #[test]
    fn test_unknown_policy() {
        let e = error_of("1\n1 LOTTERY\n0 1 0\n");

        assert!(e.contains("Test case 1"), "{}", e);
        assert!(e.contains("LOTTERY"), "{}", e);
    }

    #[test]
    fn test_skip_unknown_policy() {
        let cases: Vec<_> = WorkloadReader::new("2\n2 rr\n0 1 0\n0 2 0\n1 P\n0 1 0\n".to_string())
            .skip_unknown_policies(true)
            .collect();

        assert_eq!(cases.len(), 2);
        assert_eq!(
            cases[0].as_ref().unwrap(),
            &ReadCase::Skipped {
                number: 1,
                token: "rr".to_string()
            }
        );
        let Ok(ReadCase::Case(case)) = &cases[1] else {
            panic!("expected a test case");
        };
        assert_eq!(case.number, 2);
        assert_eq!(case.workload.policy(), Policy::Priority);
    }

    #[test]
    fn test_invalid_values() {
        let e = error_of("1\n1 SJF\n0 0 0\n");
        assert!(e.contains("empty CPU burst"), "{}", e);

        let e = error_of("1\n1 SJF\n-1 2 0\n");
        assert!(e.contains("negative arrival time"), "{}", e);

        let e = error_of("1\n1 RR 0\n0 2 0\n");
        assert!(e.contains("quantum"), "{}", e);

        let e = error_of("1\n0 FCFS\n");
        assert!(e.contains("at least one process"), "{}", e);

        let e = error_of("many\n");
        assert!(e.contains("test case count"), "{}", e);
    }

    #[test]
    fn test_oversized_process_count() {
        let e = error_of("1\n18446744073709551615 FCFS\n0 1 0\n");
        assert!(e.contains("end of input"), "{}", e);

        let cases: Vec<_> = WorkloadReader::new("1\n100000000000 SJF\n0 1 0\n".to_string())
            .skip_unknown_policies(true)
            .collect();
        assert_eq!(cases.len(), 1);
        assert!(cases[0].is_err());

        let cases: Vec<_> = WorkloadReader::new("1\n100000000000 LOTTERY\n".to_string())
            .skip_unknown_policies(true)
            .collect();
        assert!(cases[0].is_err());
    }

    #[test]
    fn test_time_range_overflow() {
        let max = i64::MAX;
        let e = error_of(&format!("1\n3 FCFS\n0 {max} 0\n0 {max} 0\n0 {max} 0\n"));

        assert!(e.contains("Test case 1"), "{}", e);
        assert!(e.contains("time range"), "{}", e);
    }
}
