// Add / Update use cases

use super::{args, Pm2Action, Pm2Service};
use crate::domain::{OperationResult, ProcessConfig, ProcessTarget};
use tracing::{info, warn};

impl Pm2Service {
    /// Register and start a new process
    ///
    /// With `auto_start`, the process list is saved and a boot script installed;
    /// failures of those two steps are logged and do not fail the add.
    pub async fn add_process(&self, config: &ProcessConfig) -> OperationResult {
        let _guard = self.mutation_lock.lock().await;
        self.add_process_locked(config).await
    }

    /// Replace a process: delete the old one, wait, add the new config
    pub async fn update_process(
        &self,
        target: &ProcessTarget,
        config: &ProcessConfig,
    ) -> OperationResult {
        let _guard = self.mutation_lock.lock().await;

        let deleted = self.run_action_locked(Pm2Action::Delete, target).await;
        if !deleted.success {
            return OperationResult::failed(
                format!(
                    "Failed to update process: could not delete old process {}",
                    target
                ),
                deleted.error.unwrap_or_default(),
            );
        }

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        self.add_process_locked(config).await
    }

    async fn add_process_locked(&self, config: &ProcessConfig) -> OperationResult {
        if let Err(e) = config.validate() {
            warn!(error = %e, "Rejected process configuration");
            return OperationResult::failed(
                "Process name and script path are required",
                "Invalid configuration",
            );
        }

        let name = config.name.trim();
        let failure = || format!("Failed to add process {}", name);

        match self.cli.run(&config.to_start_args()).await {
            Ok(out) if out.success => {}
            Ok(out) => {
                warn!(name = %name, exit_code = ?out.exit_code, "pm2 start failed");
                return OperationResult::failed(failure(), out.failure_detail());
            }
            Err(e) => {
                warn!(name = %name, error = %e, "pm2 start could not run");
                return OperationResult::failed(failure(), e.to_string());
            }
        }

        info!(name = %name, script = %config.script, "Process added");

        if config.auto_start {
            self.persist_for_boot().await;
        }

        OperationResult::ok(format!("Process {} added", name))
    }

    /// `pm2 save` then `pm2 startup`, best effort
    async fn persist_for_boot(&self) {
        for step in ["save", "startup"] {
            match self.cli.run(&args(&[step])).await {
                Ok(out) if out.success => info!(step = %step, "PM2 boot persistence step done"),
                Ok(out) => warn!(step = %step, detail = %out.failure_detail(), "PM2 boot persistence step failed"),
                Err(e) => warn!(step = %step, error = %e, "PM2 boot persistence step could not run"),
            }
        }
    }
}
