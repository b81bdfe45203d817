//! RPC Method Handlers
//!
//! Thin mapping from JSON-RPC requests onto `Pm2Service`.

use crate::error::to_rpc_error;
use crate::types::{AddRequest, LogsRequest, TargetRequest, UpdateRequest};
use jsonrpsee::types::ErrorObjectOwned;
use pm2_manager_core::application::{Pm2Action, Pm2Service};
use pm2_manager_core::domain::{
    LogData, MetricsData, OperationResult, Pm2VersionInfo, ProcessInfo, ProcessTarget,
};
use pm2_manager_core::error::AppError;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

type RpcResult<T> = Result<T, ErrorObjectOwned>;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<Pm2Service>,
}

impl RpcHandler {
    pub fn new(service: Arc<Pm2Service>) -> Self {
        Self { service }
    }

    /// process.list.v1
    pub async fn list(&self) -> RpcResult<Vec<ProcessInfo>> {
        self.service.list_processes().await.map_err(to_rpc_error)
    }

    /// process.{start,stop,restart,delete}.v1
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn lifecycle(
        &self,
        action: Pm2Action,
        params: TargetRequest,
    ) -> RpcResult<OperationResult> {
        Ok(self.service.run_action(action, &params.target).await)
    }

    /// process.{start,stop,restart}_all.v1
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn all(&self, action: Pm2Action) -> RpcResult<OperationResult> {
        Ok(self.service.run_action(action, &ProcessTarget::All).await)
    }

    /// process.add.v1
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn add(&self, params: AddRequest) -> RpcResult<OperationResult> {
        Ok(self.service.add_process(&params.config).await)
    }

    /// process.update.v1
    #[instrument(skip(self), fields(request_id = %Uuid::new_v4()))]
    pub async fn update(&self, params: UpdateRequest) -> RpcResult<OperationResult> {
        Ok(self
            .service
            .update_process(&params.target, &params.config)
            .await)
    }

    /// logs.get.v1
    pub async fn logs(&self, params: LogsRequest) -> RpcResult<LogData> {
        if params.lines == Some(0) {
            return Err(to_rpc_error(AppError::Validation(
                "lines must be at least 1".to_string(),
            )));
        }
        self.service
            .get_logs(&params.target, params.lines)
            .await
            .map_err(to_rpc_error)
    }

    /// metrics.get.v1
    pub async fn metrics(&self) -> RpcResult<MetricsData> {
        self.service.get_metrics().await.map_err(to_rpc_error)
    }

    /// pm2.version.v1
    pub async fn version(&self) -> RpcResult<Pm2VersionInfo> {
        self.service.get_version().await.map_err(to_rpc_error)
    }
}
