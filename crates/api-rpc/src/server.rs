//! JSON-RPC Server
//!
//! Serves JSON-RPC 2.0 over HTTP, bound to localhost only.

use crate::handler::RpcHandler;
use crate::types::{method, AddRequest, LogsRequest, TargetRequest, UpdateRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use pm2_manager_core::application::{Pm2Action, Pm2Service};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub const DEFAULT_RPC_HOST: &str = "127.0.0.1";
pub const DEFAULT_RPC_PORT: u16 = 7615;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port
    pub port: u16,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
        }
    }
}

/// A running server and the address it actually bound
pub struct StartedServer {
    pub addr: SocketAddr,
    pub handle: ServerHandle,
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: RpcHandler,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<Pm2Service>) -> Self {
        Self {
            config,
            handler: RpcHandler::new(service),
        }
    }

    /// Start the JSON-RPC server
    pub async fn start(self) -> Result<StartedServer, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let module = build_module(self.handler).map_err(|e| e.to_string())?;

        info!(addr = %local_addr, "JSON-RPC server started successfully");

        Ok(StartedServer {
            addr: local_addr,
            handle: server.start(module),
        })
    }
}

/// Register every method on a module whose context is the handler
fn build_module(handler: RpcHandler) -> Result<RpcModule<RpcHandler>, jsonrpsee::core::RegisterMethodError> {
    let mut module = RpcModule::new(handler);

    module.register_async_method(method::PROCESS_LIST, |_, ctx, _| async move {
        ctx.list().await
    })?;

    for (name, action) in [
        (method::PROCESS_START, Pm2Action::Start),
        (method::PROCESS_STOP, Pm2Action::Stop),
        (method::PROCESS_RESTART, Pm2Action::Restart),
        (method::PROCESS_DELETE, Pm2Action::Delete),
    ] {
        module.register_async_method(name, move |params, ctx, _| async move {
            let req: TargetRequest = params.parse()?;
            ctx.lifecycle(action, req).await
        })?;
    }

    for (name, action) in [
        (method::PROCESS_START_ALL, Pm2Action::Start),
        (method::PROCESS_STOP_ALL, Pm2Action::Stop),
        (method::PROCESS_RESTART_ALL, Pm2Action::Restart),
    ] {
        module.register_async_method(name, move |_, ctx, _| async move {
            ctx.all(action).await
        })?;
    }

    module.register_async_method(method::PROCESS_ADD, |params, ctx, _| async move {
        let req: AddRequest = params.parse()?;
        ctx.add(req).await
    })?;

    module.register_async_method(method::PROCESS_UPDATE, |params, ctx, _| async move {
        let req: UpdateRequest = params.parse()?;
        ctx.update(req).await
    })?;

    module.register_async_method(method::LOGS_GET, |params, ctx, _| async move {
        let req: LogsRequest = params.parse()?;
        ctx.logs(req).await
    })?;

    module.register_async_method(method::METRICS_GET, |_, ctx, _| async move {
        ctx.metrics().await
    })?;

    module.register_async_method(method::PM2_VERSION, |_, ctx, _| async move {
        ctx.version().await
    })?;

    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::core::client::ClientT;
    use jsonrpsee::core::params::ObjectParams;
    use jsonrpsee::http_client::HttpClientBuilder;
    use jsonrpsee::rpc_params;
    use pm2_manager_core::domain::OperationResult;
    use pm2_manager_core::port::pm2_cli::mocks::MockPm2Cli;
    use pm2_manager_core::port::time_provider::SystemTimeProvider;

    async fn start(cli: MockPm2Cli) -> (StartedServer, Arc<MockPm2Cli>) {
        let cli = Arc::new(cli);
        let service = Arc::new(Pm2Service::new(cli.clone(), Arc::new(SystemTimeProvider)));
        let config = RpcServerConfig {
            port: 0,
            ..Default::default()
        };
        let started = RpcServer::new(config, service).start().await.unwrap();
        (started, cli)
    }

    #[tokio::test]
    async fn test_start_accepts_numeric_and_name_targets() {
        let (server, cli) = start(MockPm2Cli::new()).await;
        let client = HttpClientBuilder::default()
            .build(format!("http://{}", server.addr))
            .unwrap();

        let mut params = ObjectParams::new();
        params.insert("target", 2).unwrap();
        let result: OperationResult = client.request(method::PROCESS_START, params).await.unwrap();
        assert!(result.success);

        let mut params = ObjectParams::new();
        params.insert("target", "api").unwrap();
        let _: OperationResult = client.request(method::PROCESS_STOP, params).await.unwrap();

        let _: OperationResult = client
            .request(method::PROCESS_RESTART_ALL, rpc_params![])
            .await
            .unwrap();

        let actions: Vec<Vec<String>> = cli.calls();
        assert_eq!(actions[0], vec!["start", "2"]);
        assert_eq!(actions[1], vec!["stop", "api"]);
        assert_eq!(actions[2], vec!["restart", "all"]);

        server.handle.stop().unwrap();
    }

    #[tokio::test]
    async fn test_invalid_params_are_rejected() {
        let (server, cli) = start(MockPm2Cli::new()).await;
        let client = HttpClientBuilder::default()
            .build(format!("http://{}", server.addr))
            .unwrap();

        let mut params = ObjectParams::new();
        params.insert("target", "").unwrap();
        let result: Result<OperationResult, _> = client.request(method::PROCESS_DELETE, params).await;

        assert!(result.is_err());
        assert_eq!(cli.call_count(), 0);

        server.handle.stop().unwrap();
    }
}
