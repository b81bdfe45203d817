// PM2 CLI adapter
// reason: tokio for async process management with timeout
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use pm2_manager_core::port::pm2_cli::{CommandOutput, ExecutionError, Pm2Cli};
use pm2_manager_core::port::TimeProvider;

use crate::invocation::{self, Invocation, Platform};

/// Default pm2 executable name (resolved through PATH)
pub const DEFAULT_PM2_BIN: &str = "pm2";

/// Default per-command timeout (30s)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Adapter settings
#[derive(Debug, Clone)]
pub struct SystemPm2CliConfig {
    /// Executable name or path
    pub pm2_bin: String,
    pub timeout: Duration,
}

impl Default for SystemPm2CliConfig {
    fn default() -> Self {
        Self {
            pm2_bin: DEFAULT_PM2_BIN.to_string(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

/// Runs the real pm2 executable
pub struct SystemPm2Cli {
    config: SystemPm2CliConfig,
    platform: Platform,
    time_provider: Arc<dyn TimeProvider>,
}

impl SystemPm2Cli {
    /// Create a new adapter
    ///
    /// # Example
    /// ```ignore
    /// let cli = SystemPm2Cli::new(SystemPm2CliConfig::default(), Arc::new(SystemTimeProvider));
    /// ```
    pub fn new(config: SystemPm2CliConfig, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            config,
            platform: Platform::current(),
            time_provider,
        }
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        inv: &Invocation,
    ) -> Result<std::process::Output, ExecutionError> {
        let child = Command::new(&inv.program)
            .args(&inv.args)
            // PM2 colors its notices; keep captured text plain
            .env("FORCE_COLOR", "0")
            .env("NO_COLOR", "1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", inv.program, e)))?;

        match timeout(self.config.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(ExecutionError::IoError(e.to_string())),
            Err(_) => Err(ExecutionError::Timeout(self.config.timeout.as_millis() as u64)),
        }
    }
}

/// stdout followed by stderr, separated by a newline when needed
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    if !stderr.is_empty() {
        if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
        }
        combined.push_str(&String::from_utf8_lossy(stderr));
    }
    combined
}

#[async_trait]
impl Pm2Cli for SystemPm2Cli {
    async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecutionError> {
        let inv = Invocation::build(self.platform, &self.config.pm2_bin, args);
        let start_time = self.time_provider.now_millis();

        debug!(program = %inv.program, args = ?inv.args, "Running pm2");

        let output = match self.spawn_and_wait(&inv).await {
            Ok(output) => output,
            Err(e) => {
                warn!(args = ?args, error = %e, "pm2 invocation failed");
                return Err(e);
            }
        };

        let duration_ms = self.time_provider.now_millis() - start_time;
        let result = CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            output: combine_output(&output.stdout, &output.stderr),
            duration_ms,
        };

        info!(
            args = ?args,
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code,
            "pm2 command completed"
        );

        Ok(result)
    }

    async fn locate(&self) -> bool {
        let found = invocation::locate(
            self.platform,
            &self.config.pm2_bin,
            std::env::var_os("PATH"),
            std::env::var_os("PATHEXT"),
        );
        debug!(pm2_bin = %self.config.pm2_bin, found = ?found, "pm2 lookup");
        found.is_some()
    }
}
