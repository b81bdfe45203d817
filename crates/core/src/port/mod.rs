// Port Layer - Interfaces for external dependencies

pub mod pm2_cli;
pub mod time_provider;

// Re-exports
pub use pm2_cli::{CommandOutput, ExecutionError, Pm2Cli};
pub use time_provider::TimeProvider;
