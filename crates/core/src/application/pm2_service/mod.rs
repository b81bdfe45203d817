// PM2 Service - every operation the UI layer can invoke

mod register;
#[cfg(test)]
mod service_test;

use crate::application::constants::{
    DEFAULT_LOG_LINES, DEFAULT_UPDATE_SETTLE_DELAY, MAX_LOG_LINES, PM2_INSTALL_HINT,
    PM2_ERROR_PREFIX, PM2_NOT_FOUND_SUFFIX, PM2_NOT_RUNNING_MARKER,
};
use crate::application::{jlist, logs};
use crate::domain::{LogData, MetricsData, OperationResult, Pm2VersionInfo, ProcessInfo, ProcessTarget};
use crate::error::{AppError, Result};
use crate::port::{Pm2Cli, TimeProvider};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Lifecycle commands that take a single target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pm2Action {
    Start,
    Stop,
    Restart,
    Delete,
}

impl Pm2Action {
    /// Subcommand name passed to pm2
    pub fn as_str(&self) -> &'static str {
        match self {
            Pm2Action::Start => "start",
            Pm2Action::Stop => "stop",
            Pm2Action::Restart => "restart",
            Pm2Action::Delete => "delete",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            Pm2Action::Start => "started",
            Pm2Action::Stop => "stopped",
            Pm2Action::Restart => "restarted",
            Pm2Action::Delete => "deleted",
        }
    }

    fn success_message(&self, target: &ProcessTarget) -> String {
        match target {
            ProcessTarget::All => format!("All processes {}", self.past_tense()),
            other => format!("Process {} {}", other, self.past_tense()),
        }
    }

    fn failure_message(&self, target: &ProcessTarget) -> String {
        match target {
            ProcessTarget::All => format!("Failed to {} all processes", self.as_str()),
            other => format!("Failed to {} process {}", self.as_str(), other),
        }
    }
}

impl fmt::Display for Pm2Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// PM2 Service
///
/// Reads (list, logs, metrics, version) run concurrently. Mutations hold
/// `mutation_lock` so an update's delete + add pair is never interleaved with
/// another command.
pub struct Pm2Service {
    cli: Arc<dyn Pm2Cli>,
    time_provider: Arc<dyn TimeProvider>,
    settle_delay: Duration,
    mutation_lock: Mutex<()>,
}

impl Pm2Service {
    pub fn new(cli: Arc<dyn Pm2Cli>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            cli,
            time_provider,
            settle_delay: DEFAULT_UPDATE_SETTLE_DELAY,
            mutation_lock: Mutex::new(()),
        }
    }

    /// Override the pause between delete and re-add in `update_process`
    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    /// List all PM2 processes
    ///
    /// A stopped PM2 daemon is not an error: there is simply nothing to list.
    pub async fn list_processes(&self) -> Result<Vec<ProcessInfo>> {
        let out = self.cli.run(&args(&["jlist"])).await?;

        if !out.success {
            if out.output.contains(PM2_NOT_RUNNING_MARKER) {
                debug!("PM2 daemon not running, returning empty list");
                return Ok(Vec::new());
            }
            return Err(AppError::CommandFailed(format!(
                "pm2 jlist failed: {}",
                out.failure_detail()
            )));
        }

        let processes = jlist::parse_process_list(&out.output, self.time_provider.now_millis())?;
        debug!(count = processes.len(), "Process list parsed");
        Ok(processes)
    }

    pub async fn start(&self, target: &ProcessTarget) -> OperationResult {
        self.run_action(Pm2Action::Start, target).await
    }

    pub async fn stop(&self, target: &ProcessTarget) -> OperationResult {
        self.run_action(Pm2Action::Stop, target).await
    }

    pub async fn restart(&self, target: &ProcessTarget) -> OperationResult {
        self.run_action(Pm2Action::Restart, target).await
    }

    pub async fn delete(&self, target: &ProcessTarget) -> OperationResult {
        self.run_action(Pm2Action::Delete, target).await
    }

    pub async fn start_all(&self) -> OperationResult {
        self.start(&ProcessTarget::All).await
    }

    pub async fn stop_all(&self) -> OperationResult {
        self.stop(&ProcessTarget::All).await
    }

    pub async fn restart_all(&self) -> OperationResult {
        self.restart(&ProcessTarget::All).await
    }

    /// Run `pm2 <action> <target>` under the mutation lock
    pub async fn run_action(&self, action: Pm2Action, target: &ProcessTarget) -> OperationResult {
        let _guard = self.mutation_lock.lock().await;
        self.run_action_locked(action, target).await
    }

    /// Caller must hold `mutation_lock`
    async fn run_action_locked(&self, action: Pm2Action, target: &ProcessTarget) -> OperationResult {
        let argv = vec![action.as_str().to_string(), target.as_arg()];

        match self.cli.run(&argv).await {
            Ok(out) if out.success => {
                info!(
                    action = %action,
                    target = %target,
                    duration_ms = out.duration_ms,
                    "PM2 command succeeded"
                );
                OperationResult::ok(action.success_message(target))
            }
            Ok(out) => {
                warn!(
                    action = %action,
                    target = %target,
                    exit_code = ?out.exit_code,
                    "PM2 command failed"
                );
                OperationResult::failed(action.failure_message(target), out.failure_detail())
            }
            Err(e) => {
                warn!(action = %action, target = %target, error = %e, "PM2 command could not run");
                OperationResult::failed(action.failure_message(target), e.to_string())
            }
        }
    }

    /// Fetch the last `lines` log lines of a process (default 100)
    pub async fn get_logs(&self, target: &ProcessTarget, lines: Option<usize>) -> Result<LogData> {
        let lines = lines.unwrap_or(DEFAULT_LOG_LINES).clamp(1, MAX_LOG_LINES);
        let argv = vec![
            "logs".to_string(),
            target.as_arg(),
            "--lines".to_string(),
            lines.to_string(),
            "--nostream".to_string(),
        ];

        let out = self.cli.run(&argv).await?;
        if !out.success && reports_unknown_target(&out.output) {
            return Err(AppError::NotFound(format!("process {}", target)));
        }
        if !out.success {
            return Err(AppError::CommandFailed(format!(
                "Failed to get logs for process {}: {}",
                target,
                out.failure_detail()
            )));
        }

        Ok(logs::parse_logs(&out.output))
    }

    /// Aggregate counters over the current process list
    pub async fn get_metrics(&self) -> Result<MetricsData> {
        let processes = self.list_processes().await?;
        Ok(MetricsData::from_processes(&processes))
    }

    /// Detect PM2 and report its version
    pub async fn get_version(&self) -> Result<Pm2VersionInfo> {
        if !self.cli.locate().await {
            info!("pm2 executable not found");
            return Ok(Pm2VersionInfo {
                version: String::new(),
                installed: false,
                message: PM2_INSTALL_HINT.to_string(),
            });
        }

        let out = self.cli.run(&args(&["--version"])).await?;
        if !out.success {
            return Err(AppError::CommandFailed(format!(
                "Failed to get PM2 version: {}",
                out.failure_detail()
            )));
        }

        // Daemon notices may precede the version on first invocation
        let version = out
            .output
            .lines()
            .map(str::trim)
            .rev()
            .find(|l| !l.is_empty())
            .unwrap_or_default()
            .to_string();

        Ok(Pm2VersionInfo {
            message: format!("PM2 version: {}", version),
            version,
            installed: true,
        })
    }
}

/// Whether PM2 printed its own "target matches nothing" error line
fn reports_unknown_target(output: &str) -> bool {
    output.lines().map(str::trim).any(|line| {
        line.starts_with(PM2_ERROR_PREFIX) && line.ends_with(PM2_NOT_FOUND_SUFFIX)
    })
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
