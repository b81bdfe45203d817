// Domain Layer - Pure business logic and entities

pub mod config;
pub mod error;
pub mod metrics;
pub mod process;
pub mod report;
pub mod target;

// Re-exports
pub use config::ProcessConfig;
pub use error::DomainError;
pub use metrics::MetricsData;
pub use process::{ProcessId, ProcessInfo, ProcessStatus};
pub use report::{LogData, OperationResult, Pm2VersionInfo};
pub use target::ProcessTarget;
