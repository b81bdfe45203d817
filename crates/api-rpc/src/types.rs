//! RPC Request Types and Method Names
//!
//! Results are the core domain types, serialized as-is.

use pm2_manager_core::domain::{ProcessConfig, ProcessTarget};
use serde::Deserialize;

/// Method names (versioned)
pub mod method {
    pub const PROCESS_LIST: &str = "process.list.v1";
    pub const PROCESS_START: &str = "process.start.v1";
    pub const PROCESS_STOP: &str = "process.stop.v1";
    pub const PROCESS_RESTART: &str = "process.restart.v1";
    pub const PROCESS_DELETE: &str = "process.delete.v1";
    pub const PROCESS_START_ALL: &str = "process.start_all.v1";
    pub const PROCESS_STOP_ALL: &str = "process.stop_all.v1";
    pub const PROCESS_RESTART_ALL: &str = "process.restart_all.v1";
    pub const PROCESS_ADD: &str = "process.add.v1";
    pub const PROCESS_UPDATE: &str = "process.update.v1";
    pub const LOGS_GET: &str = "logs.get.v1";
    pub const METRICS_GET: &str = "metrics.get.v1";
    pub const PM2_VERSION: &str = "pm2.version.v1";
}

/// process.{start,stop,restart,delete}.v1
#[derive(Debug, Deserialize)]
pub struct TargetRequest {
    pub target: ProcessTarget,
}

/// process.add.v1
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub config: ProcessConfig,
}

/// process.update.v1
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub target: ProcessTarget,
    pub config: ProcessConfig,
}

/// logs.get.v1
#[derive(Debug, Deserialize)]
pub struct LogsRequest {
    pub target: ProcessTarget,
    #[serde(default)]
    pub lines: Option<usize>,
}
