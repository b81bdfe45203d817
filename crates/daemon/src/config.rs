//! Daemon settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `PM2_MANAGER_*` environment variables.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use directories::ProjectDirs;
use pm2_manager_api_rpc::server::{DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};
use pm2_manager_api_rpc::RpcServerConfig;
use pm2_manager_infra_system::pm2_cli_impl::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_PM2_BIN};
use pm2_manager_infra_system::SystemPm2CliConfig;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

const ENV_PREFIX: &str = "PM2_MANAGER";
const CONFIG_PATH_VAR: &str = "PM2_MANAGER_CONFIG";
const DEFAULT_UPDATE_SETTLE_MS: u64 = 500;

/// Log output format on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub pm2_bin: String,
    pub command_timeout_secs: u64,
    pub update_settle_ms: u64,
    pub log_format: LogFormat,
    /// Daily-rolling JSON log files are written here when set
    #[serde(default)]
    pub log_dir: Option<String>,
}

impl Settings {
    /// Load from the process environment
    pub fn load() -> Result<Self> {
        let (path, required) = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(explicit) => (Some(PathBuf::from(explicit)), true),
            None => (default_config_path(), false),
        };
        Self::load_from(path, required, None)
    }

    /// Load with an explicit file and, for tests, a substitute environment
    pub fn load_from(
        file: Option<PathBuf>,
        required: bool,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("host", DEFAULT_RPC_HOST)?
            .set_default("port", DEFAULT_RPC_PORT as i64)?
            .set_default("pm2_bin", DEFAULT_PM2_BIN)?
            .set_default("command_timeout_secs", DEFAULT_COMMAND_TIMEOUT.as_secs())?
            .set_default("update_settle_ms", DEFAULT_UPDATE_SETTLE_MS)?
            .set_default("log_format", "pretty")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(required));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.expanded()
    }

    fn expanded(mut self) -> Result<Self> {
        if self.command_timeout_secs == 0 {
            anyhow::bail!("command_timeout_secs must be greater than 0");
        }
        self.pm2_bin = shellexpand::tilde(&self.pm2_bin).into_owned();
        self.log_dir = self
            .log_dir
            .filter(|d| !d.trim().is_empty())
            .map(|d| shellexpand::tilde(&d).into_owned());
        Ok(self)
    }

    pub fn cli_config(&self) -> SystemPm2CliConfig {
        SystemPm2CliConfig {
            pm2_bin: self.pm2_bin.clone(),
            timeout: Duration::from_secs(self.command_timeout_secs),
        }
    }

    pub fn rpc_config(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }

    pub fn update_settle_delay(&self) -> Duration {
        Duration::from_millis(self.update_settle_ms)
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "pm2-manager", "pm2-manager")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
