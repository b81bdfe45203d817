//! PM2 Manager SDK - Rust Client Library
//!
//! Provides a typed client for the PM2 Manager daemon's JSON-RPC API.
//!
//! # Example
//!
//! ```no_run
//! use pm2_manager_sdk::{Pm2ManagerClient, ProcessTarget};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to daemon
//!     let client = Pm2ManagerClient::connect("http://127.0.0.1:7615").await?;
//!
//!     // Restart a process by name
//!     let result = client.restart(ProcessTarget::Name("api".to_string())).await?;
//!     println!("{}", result.message);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::Pm2ManagerClient;
pub use error::{Result, SdkError};
pub use types::{
    method, LogData, MetricsData, OperationResult, Pm2VersionInfo, ProcessConfig, ProcessInfo,
    ProcessStatus, ProcessTarget,
};
