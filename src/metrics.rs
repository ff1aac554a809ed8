//! System-wide and averaged metrics of a schedule.

use serde::Serialize;

use crate::{schedule::Schedule, utils::Mean, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SystemMetrics {
    pub total_time_elapsed: Ticks,
    pub total_burst_time: Ticks,
    pub idle_time: Ticks,
    /// Busy share of the elapsed time, in percent, truncated toward zero.
    pub utilization: u64,
    /// Completed processes per time unit.
    pub throughput: f64,
}

impl SystemMetrics {
    pub fn new(schedule: &Schedule) -> Self {
        let elapsed = schedule.total_time_elapsed;
        let busy = elapsed - schedule.idle_time;

        let (utilization, throughput) = if elapsed == 0 {
            (0, 0.0)
        } else {
            (
                (busy as f64 / elapsed as f64 * 100.0) as u64,
                schedule.processes.len() as f64 / elapsed as f64,
            )
        };

        Self {
            total_time_elapsed: elapsed,
            total_burst_time: schedule.total_burst_time,
            idle_time: schedule.idle_time,
            utilization,
            throughput,
        }
    }
}

/// Per-process timing averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingAverages {
    pub waiting: f64,
    pub turnaround: f64,
    pub response: f64,
}

impl TimingAverages {
    pub fn new(schedule: &Schedule) -> Self {
        let mut waiting = Mean::new();
        let mut turnaround = Mean::new();
        let mut response = Mean::new();

        for t in schedule.processes.iter().filter_map(|p| p.timings()) {
            waiting.update(t.waiting_time as f64);
            turnaround.update(t.turnaround_time as f64);
            response.update(t.response_time as f64);
        }

        Self {
            waiting: waiting.get().unwrap_or_default(),
            turnaround: turnaround.get().unwrap_or_default(),
            response: response.get().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SystemMetrics, TimingAverages};
    use crate::{
        engine::simulate,
        policy::Policy,
        process::ProcessSpec,
        utils::format_general,
        workload::Workload,
    };

    #[test]
    fn test_srtf_metrics() {
        let workload = Workload::new(
            Policy::Srtf,
            vec![ProcessSpec::new(0, 7, 0), ProcessSpec::new(2, 4, 0)],
        )
        .unwrap();
        let schedule = simulate(&workload);

        let system = SystemMetrics::new(&schedule);
        assert_eq!(system.total_time_elapsed, 11);
        assert_eq!(system.total_burst_time, 11);
        assert_eq!(system.utilization, 100);
        assert_eq!(format_general(system.throughput, 15), "0.181818181818182");

        let avg = TimingAverages::new(&schedule);
        assert_eq!(avg.waiting, 2.0);
        assert_eq!(avg.turnaround, 7.5);
        assert_eq!(avg.response, 0.0);
    }

    #[test]
    fn test_utilization_is_truncated() {
        let workload = Workload::new(
            Policy::Srtf,
            vec![ProcessSpec::new(2, 2, 0), ProcessSpec::new(6, 1, 0)],
        )
        .unwrap();
        let system = SystemMetrics::new(&simulate(&workload));

        // 3 busy units over 7
        assert_eq!(system.idle_time, 4);
        assert_eq!(system.utilization, 42);
    }

    #[test]
    fn test_idle_prefix() {
        let workload = Workload::new(Policy::Fcfs, vec![ProcessSpec::new(3, 2, 0)]).unwrap();
        let system = SystemMetrics::new(&simulate(&workload));

        assert_eq!(system.utilization, 40);
        assert_eq!(format_general(system.throughput, 15), "0.2");
    }
}
