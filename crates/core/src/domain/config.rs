// Process Configuration (add / update)

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Configuration for registering a process with PM2
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessConfig {
    pub name: String,
    pub script: String,
    pub cwd: String,
    /// Script arguments, whitespace separated
    pub args: String,
    pub auto_start: bool,
    /// Cluster instances; 0 leaves PM2's default (fork mode)
    pub instances: u32,
}

impl ProcessConfig {
    /// Name and script are mandatory
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidConfig("name is empty".to_string()));
        }
        if self.script.trim().is_empty() {
            return Err(DomainError::InvalidConfig("script is empty".to_string()));
        }
        Ok(())
    }

    /// Build the argument vector for `pm2 start`
    ///
    /// `-i` must precede `--`, everything after the separator goes to the script.
    pub fn to_start_args(&self) -> Vec<String> {
        let mut args = vec![
            "start".to_string(),
            self.script.trim().to_string(),
            "--name".to_string(),
            self.name.trim().to_string(),
        ];

        let cwd = self.cwd.trim();
        if !cwd.is_empty() {
            args.push("--cwd".to_string());
            args.push(cwd.to_string());
        }

        if self.instances > 0 {
            args.push("-i".to_string());
            args.push(self.instances.to_string());
        }

        let script_args: Vec<&str> = self.args.split_whitespace().collect();
        if !script_args.is_empty() {
            args.push("--".to_string());
            args.extend(script_args.into_iter().map(str::to_string));
        }

        args
    }
}
