//! Minimal JSON-RPC 2.0 client over HTTP

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:7615";

// Mirrors the daemon's method table
pub const PROCESS_LIST: &str = "process.list.v1";
pub const PROCESS_START: &str = "process.start.v1";
pub const PROCESS_STOP: &str = "process.stop.v1";
pub const PROCESS_RESTART: &str = "process.restart.v1";
pub const PROCESS_DELETE: &str = "process.delete.v1";
pub const PROCESS_START_ALL: &str = "process.start_all.v1";
pub const PROCESS_STOP_ALL: &str = "process.stop_all.v1";
pub const PROCESS_RESTART_ALL: &str = "process.restart_all.v1";
pub const PROCESS_ADD: &str = "process.add.v1";
pub const PROCESS_UPDATE: &str = "process.update.v1";
pub const LOGS_GET: &str = "logs.get.v1";
pub const METRICS_GET: &str = "metrics.get.v1";
pub const PM2_VERSION: &str = "pm2.version.v1";

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

pub struct RpcClient {
    url: String,
    http: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call a method and return the raw result value
    pub async fn call_raw(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        };

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to connect to daemon at {}", self.url))?
            .json()
            .await
            .context("Failed to parse response")?;

        if let Some(error) = response.error {
            anyhow::bail!("RPC error ({}): {}", error.code, error.message);
        }

        response
            .result
            .ok_or_else(|| anyhow::anyhow!("No result in response"))
    }

    /// Call a method and decode the result
    pub async fn call<T: DeserializeOwned>(&self, method: &str, params: serde_json::Value) -> Result<T> {
        let value = self.call_raw(method, params).await?;
        serde_json::from_value(value).with_context(|| format!("Unexpected result for {}", method))
    }
}
