// Aggregated Metrics

use super::process::{ProcessInfo, ProcessStatus};
use serde::{Deserialize, Serialize};

/// Fleet-wide counters computed from one process listing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsData {
    pub total_processes: usize,
    pub running: usize,
    pub errored: usize,
    pub stopped: usize,
    pub total_memory: f64,
    #[serde(rename = "totalCPU")]
    pub total_cpu: f64,
}

impl MetricsData {
    /// Statuses other than online/errored/stopped count only toward the total.
    pub fn from_processes(processes: &[ProcessInfo]) -> Self {
        processes.iter().fold(
            MetricsData {
                total_processes: processes.len(),
                ..Default::default()
            },
            |mut acc, proc| {
                match proc.status {
                    ProcessStatus::Online => acc.running += 1,
                    ProcessStatus::Errored => acc.errored += 1,
                    ProcessStatus::Stopped => acc.stopped += 1,
                    _ => {}
                }
                acc.total_cpu += proc.cpu;
                acc.total_memory += proc.memory;
                acc
            },
        )
    }
}
