//! PM2 Manager Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    method, LogData, MetricsData, OperationResult, Pm2VersionInfo, ProcessConfig, ProcessInfo,
    ProcessTarget,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::Serialize;
use std::time::Duration;

/// Covers `update`, which waits out a delete, a settle delay and a start
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// PM2 Manager Client
///
/// Provides a high-level interface to the PM2 Manager daemon.
///
/// # Example
///
/// ```no_run
/// use pm2_manager_sdk::Pm2ManagerClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Pm2ManagerClient::connect("http://127.0.0.1:7615").await?;
/// for process in client.list().await? {
///     println!("{} {}", process.name, process.status);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pm2ManagerClient {
    client: HttpClient,
}

impl Pm2ManagerClient {
    /// Connect to the PM2 Manager daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:7615`)
    pub async fn connect(url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(REQUEST_TIMEOUT)
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self { client })
    }

    /// List every process PM2 manages
    pub async fn list(&self) -> Result<Vec<ProcessInfo>> {
        Ok(self.client.request(method::PROCESS_LIST, rpc_params![]).await?)
    }

    /// Start a process
    pub async fn start(&self, target: ProcessTarget) -> Result<OperationResult> {
        self.targeted(method::PROCESS_START, target).await
    }

    /// Stop a process
    pub async fn stop(&self, target: ProcessTarget) -> Result<OperationResult> {
        self.targeted(method::PROCESS_STOP, target).await
    }

    /// Restart a process
    pub async fn restart(&self, target: ProcessTarget) -> Result<OperationResult> {
        self.targeted(method::PROCESS_RESTART, target).await
    }

    /// Delete a process from PM2's list
    pub async fn delete(&self, target: ProcessTarget) -> Result<OperationResult> {
        self.targeted(method::PROCESS_DELETE, target).await
    }

    pub async fn start_all(&self) -> Result<OperationResult> {
        Ok(self.client.request(method::PROCESS_START_ALL, rpc_params![]).await?)
    }

    pub async fn stop_all(&self) -> Result<OperationResult> {
        Ok(self.client.request(method::PROCESS_STOP_ALL, rpc_params![]).await?)
    }

    pub async fn restart_all(&self) -> Result<OperationResult> {
        Ok(self.client.request(method::PROCESS_RESTART_ALL, rpc_params![]).await?)
    }

    /// Register and start a new process
    ///
    /// An invalid config is reported through `OperationResult::success`,
    /// not as an error.
    pub async fn add(&self, config: ProcessConfig) -> Result<OperationResult> {
        let params = object_params([("config", &config)])?;
        Ok(self.client.request(method::PROCESS_ADD, params).await?)
    }

    /// Replace `target` with a process built from `config`
    pub async fn update(
        &self,
        target: ProcessTarget,
        config: ProcessConfig,
    ) -> Result<OperationResult> {
        let mut params = ObjectParams::new();
        params.insert("target", &target)?;
        params.insert("config", &config)?;
        Ok(self.client.request(method::PROCESS_UPDATE, params).await?)
    }

    /// Fetch recent log lines
    ///
    /// # Arguments
    ///
    /// * `target` - Process id or name
    /// * `lines` - Number of lines (daemon default: 100)
    pub async fn logs(&self, target: ProcessTarget, lines: Option<usize>) -> Result<LogData> {
        let mut params = ObjectParams::new();
        params.insert("target", &target)?;
        if let Some(lines) = lines {
            params.insert("lines", lines)?;
        }
        Ok(self.client.request(method::LOGS_GET, params).await?)
    }

    /// Aggregated counters over the process list
    pub async fn metrics(&self) -> Result<MetricsData> {
        Ok(self.client.request(method::METRICS_GET, rpc_params![]).await?)
    }

    /// PM2 installation status and version
    pub async fn version(&self) -> Result<Pm2VersionInfo> {
        Ok(self.client.request(method::PM2_VERSION, rpc_params![]).await?)
    }

    async fn targeted(&self, method: &str, target: ProcessTarget) -> Result<OperationResult> {
        let params = object_params([("target", &target)])?;
        Ok(self.client.request(method, params).await?)
    }
}

fn object_params<T: Serialize, const N: usize>(fields: [(&str, &T); N]) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    for (name, value) in fields {
        params.insert(name, value)?;
    }
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = Pm2ManagerClient::connect("not a url").await;
        assert!(matches!(result, Err(SdkError::Connection(_))));
    }

    #[test]
    fn test_object_params_serializes_target() {
        let params = object_params([("target", &ProcessTarget::Id(4))]).unwrap();
        let json = jsonrpsee::core::traits::ToRpcParams::to_rpc_params(params)
            .unwrap()
            .unwrap();
        assert_eq!(json.get(), r#"{"target":4}"#);
    }
}
