// Process Domain Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// PM2 process id (`pm_id`)
pub type ProcessId = u32;

/// Process status as reported by PM2 (`pm2_env.status`)
///
/// Unknown values are kept verbatim so a newer PM2 never breaks listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessStatus {
    Online,
    Stopping,
    Stopped,
    Launching,
    Errored,
    OneLaunchStatus,
    WaitingRestart,
    Other(String),
}

impl ProcessStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProcessStatus::Online => "online",
            ProcessStatus::Stopping => "stopping",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Launching => "launching",
            ProcessStatus::Errored => "errored",
            ProcessStatus::OneLaunchStatus => "one-launch-status",
            ProcessStatus::WaitingRestart => "waiting restart",
            ProcessStatus::Other(s) => s,
        }
    }
}

impl From<&str> for ProcessStatus {
    fn from(s: &str) -> Self {
        match s {
            "online" => ProcessStatus::Online,
            "stopping" => ProcessStatus::Stopping,
            "stopped" => ProcessStatus::Stopped,
            "launching" => ProcessStatus::Launching,
            "errored" => ProcessStatus::Errored,
            "one-launch-status" => ProcessStatus::OneLaunchStatus,
            "waiting restart" => ProcessStatus::WaitingRestart,
            other => ProcessStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for ProcessStatus {
    fn from(s: String) -> Self {
        ProcessStatus::from(s.as_str())
    }
}

impl From<ProcessStatus> for String {
    fn from(status: ProcessStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the process list, flattened from `pm2 jlist`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInfo {
    pub id: ProcessId,
    pub name: String,
    pub status: ProcessStatus,
    /// CPU usage in percent
    pub cpu: f64,
    /// Resident memory in bytes
    pub memory: f64,
    /// Last start time, epoch milliseconds (0 when PM2 reports none)
    pub uptime: i64,
    pub started_at: String,
    pub runtime: String,
    pub pid: u32,
    pub user: String,
    pub command: String,
    pub script: String,
    pub auto_start: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_known_and_unknown() {
        assert_eq!(ProcessStatus::from("online"), ProcessStatus::Online);
        assert_eq!(
            ProcessStatus::from("waiting restart"),
            ProcessStatus::WaitingRestart
        );

        let odd = ProcessStatus::from("paused");
        assert_eq!(odd, ProcessStatus::Other("paused".to_string()));
        assert_eq!(odd.to_string(), "paused");
    }

    #[test]
    fn test_process_info_serializes_camel_case() {
        let info = ProcessInfo {
            id: 3,
            name: "api".to_string(),
            status: ProcessStatus::Errored,
            cpu: 1.5,
            memory: 2048.0,
            uptime: 0,
            started_at: String::new(),
            runtime: String::new(),
            pid: 0,
            user: "deploy".to_string(),
            command: "/srv/api.js".to_string(),
            script: "/srv/api.js".to_string(),
            auto_start: true,
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["status"], "errored");
        assert_eq!(json["autoStart"], true);
        assert!(json.get("startedAt").is_some());

        let back: ProcessInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, info);
    }
}
