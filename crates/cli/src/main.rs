//! PM2 Manager CLI - Command-line client for the PM2 Manager daemon

mod render;
mod rpc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use pm2_manager_core::application::Pm2Action;
use pm2_manager_core::domain::{
    LogData, MetricsData, OperationResult, Pm2VersionInfo, ProcessConfig, ProcessInfo,
    ProcessTarget,
};
use serde_json::{json, Value};

use crate::rpc::RpcClient;

#[derive(Parser)]
#[command(name = "pm2m")]
#[command(about = "PM2 Manager CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, global = true, env = "PM2_MANAGER_RPC_URL", default_value = rpc::DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Print raw JSON results instead of tables
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all processes
    List,

    /// Start a process (id, name or "all")
    Start { target: ProcessTarget },

    /// Stop a process (id, name or "all")
    Stop { target: ProcessTarget },

    /// Restart a process (id, name or "all")
    Restart { target: ProcessTarget },

    /// Delete a process from PM2
    Delete { target: ProcessTarget },

    /// Register and start a new process
    Add(ProcessArgs),

    /// Replace a process with a new configuration
    Update {
        /// Process to replace
        target: ProcessTarget,

        #[command(flatten)]
        process: ProcessArgs,
    },

    /// Show recent logs
    Logs {
        target: ProcessTarget,

        /// Number of lines
        #[arg(short = 'n', long, default_value = "100")]
        lines: usize,
    },

    /// Show aggregated metrics
    Metrics,

    /// Show PM2 installation status
    Version,
}

#[derive(Args)]
struct ProcessArgs {
    /// Process name
    #[arg(long)]
    name: String,

    /// Script path
    #[arg(long)]
    script: String,

    /// Working directory
    #[arg(long, default_value = "")]
    cwd: String,

    /// Script arguments, space separated
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    args: String,

    /// Cluster instances (0 = fork mode)
    #[arg(short, long, default_value = "0")]
    instances: u32,

    /// Save the process list and install the boot script
    #[arg(long)]
    auto_start: bool,
}

impl From<ProcessArgs> for ProcessConfig {
    fn from(a: ProcessArgs) -> Self {
        ProcessConfig {
            name: a.name,
            script: a.script,
            cwd: a.cwd,
            args: a.args,
            auto_start: a.auto_start,
            instances: a.instances,
        }
    }
}

/// Method and params for a single-target lifecycle command
///
/// `all` uses the bulk methods for start/stop/restart.
fn lifecycle_request(action: Pm2Action, target: &ProcessTarget) -> (&'static str, Value) {
    let (single, bulk) = match action {
        Pm2Action::Start => (rpc::PROCESS_START, Some(rpc::PROCESS_START_ALL)),
        Pm2Action::Stop => (rpc::PROCESS_STOP, Some(rpc::PROCESS_STOP_ALL)),
        Pm2Action::Restart => (rpc::PROCESS_RESTART, Some(rpc::PROCESS_RESTART_ALL)),
        Pm2Action::Delete => (rpc::PROCESS_DELETE, None),
    };

    match (target, bulk) {
        (ProcessTarget::All, Some(bulk)) => (bulk, json!({})),
        _ => (single, json!({ "target": target })),
    }
}

async fn run_operation(client: &RpcClient, json_out: bool, method: &str, params: Value) -> Result<()> {
    let result: OperationResult = client.call(method, params).await?;
    if json_out {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::print_operation(&result);
    }
    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = RpcClient::new(&cli.rpc_url);

    match cli.command {
        Commands::List => {
            let processes: Vec<ProcessInfo> = client.call(rpc::PROCESS_LIST, json!({})).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&processes)?);
            } else {
                render::print_processes(&processes);
            }
        }

        Commands::Start { target } => {
            let (method, params) = lifecycle_request(Pm2Action::Start, &target);
            run_operation(&client, cli.json, method, params).await?;
        }

        Commands::Stop { target } => {
            let (method, params) = lifecycle_request(Pm2Action::Stop, &target);
            run_operation(&client, cli.json, method, params).await?;
        }

        Commands::Restart { target } => {
            let (method, params) = lifecycle_request(Pm2Action::Restart, &target);
            run_operation(&client, cli.json, method, params).await?;
        }

        Commands::Delete { target } => {
            let (method, params) = lifecycle_request(Pm2Action::Delete, &target);
            run_operation(&client, cli.json, method, params).await?;
        }

        Commands::Add(process) => {
            let config = ProcessConfig::from(process);
            run_operation(&client, cli.json, rpc::PROCESS_ADD, json!({ "config": config })).await?;
        }

        Commands::Update { target, process } => {
            let config = ProcessConfig::from(process);
            let params = json!({ "target": target, "config": config });
            run_operation(&client, cli.json, rpc::PROCESS_UPDATE, params).await?;
        }

        Commands::Logs { target, lines } => {
            let params = json!({ "target": target, "lines": lines });
            let logs: LogData = client.call(rpc::LOGS_GET, params).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&logs)?);
            } else {
                render::print_logs(&target.to_string(), &logs);
            }
        }

        Commands::Metrics => {
            let metrics: MetricsData = client.call(rpc::METRICS_GET, json!({})).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                render::print_metrics(&metrics);
            }
        }

        Commands::Version if cli.json => {
            let info: Pm2VersionInfo = client.call(rpc::PM2_VERSION, json!({})).await?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Version => {
            println!("{}", "PM2 Manager Status".cyan().bold());
            println!();

            match client.call::<Pm2VersionInfo>(rpc::PM2_VERSION, json!({})).await {
                Ok(info) => {
                    println!("  {} {}", "RPC URL:".bold(), client.url());
                    println!("  {} {}", "Daemon:".bold(), "ONLINE".green());
                    render::print_version(&info);
                }
                Err(e) => {
                    println!("  {} {}", "Daemon:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                    return Err(e).context("Daemon unreachable");
                }
            }
        }
    }

    Ok(())
}
