// PM2 Manager Infrastructure - System Adapters
// Implements: Pm2Cli

pub mod invocation;
pub mod pm2_cli_impl;

pub use invocation::{Invocation, Platform};
pub use pm2_cli_impl::{SystemPm2Cli, SystemPm2CliConfig};
