// Application Layer - Use Cases and Business Logic

pub mod constants;
pub mod jlist;
pub mod json_path;
pub mod logs;
pub mod pm2_service;

// Re-exports
pub use pm2_service::{Pm2Action, Pm2Service};
