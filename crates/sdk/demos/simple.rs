//! Simple SDK Example
//!
//! Lists processes, restarts the first one and shows its recent logs.
//!
//! # Usage
//!
//! 1. Start the daemon:
//!    ```bash
//!    cargo run --package pm2-manager-daemon
//!    ```
//!
//! 2. Run this example:
//!    ```bash
//!    cargo run --package pm2-manager-sdk --example simple
//!    ```

use pm2_manager_sdk::{Pm2ManagerClient, ProcessTarget};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("PM2 Manager SDK - Simple Example");
    println!("================================\n");

    let client = Pm2ManagerClient::connect("http://127.0.0.1:7615").await?;

    let version = client.version().await?;
    println!("PM2: {} ({})\n", version.version, version.message);
    if !version.installed {
        return Ok(());
    }

    let processes = client.list().await?;
    for process in &processes {
        println!(
            "  [{}] {} {} cpu={}% mem={} up={}",
            process.id, process.name, process.status, process.cpu, process.memory, process.runtime
        );
    }

    let metrics = client.metrics().await?;
    println!(
        "\n{} processes, {} running, {} errored\n",
        metrics.total_processes, metrics.running, metrics.errored
    );

    let Some(first) = processes.first() else {
        println!("No processes to restart");
        return Ok(());
    };

    let target = ProcessTarget::Id(first.id);
    let result = client.restart(target.clone()).await?;
    println!("{}", result.message);

    let logs = client.logs(target, Some(10)).await?;
    for line in &logs.stdout {
        println!("  | {}", line);
    }
    for line in &logs.stderr {
        println!("  ! {}", line);
    }

    Ok(())
}
