//! JSON-RPC API Layer
//!
//! Exposes the PM2 service to UI clients as JSON-RPC 2.0 over localhost HTTP.

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig, StartedServer};
