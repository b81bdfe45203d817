//! Unit tests for Pm2Service against a scripted PM2

use super::*;
use crate::domain::{ProcessConfig, ProcessStatus};
use crate::port::pm2_cli::mocks::MockPm2Cli;
use crate::port::time_provider::mocks::FixedTimeProvider;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

const NOW: i64 = 1_700_000_000_000;

fn service(cli: MockPm2Cli) -> (Pm2Service, Arc<MockPm2Cli>) {
    let cli = Arc::new(cli);
    let svc = Pm2Service::new(cli.clone(), Arc::new(FixedTimeProvider::new(NOW)))
        .with_settle_delay(Duration::ZERO);
    (svc, cli)
}

fn argv(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn jlist() -> String {
    json!([
        {"pm_id": 0, "name": "api", "pid": 11, "monit": {"cpu": 2.0, "memory": 1000},
         "pm2_env": {"status": "online", "pm_uptime": NOW - 90_000}},
        {"pm_id": 1, "name": "cron", "pid": 0, "monit": {"cpu": 0, "memory": 0},
         "pm2_env": {"status": "stopped"}},
        {"pm_id": 2, "name": "mailer", "pid": 0, "monit": {"cpu": 0.5, "memory": 24},
         "pm2_env": {"status": "errored"}}
    ])
    .to_string()
}

fn config() -> ProcessConfig {
    ProcessConfig {
        name: "api".to_string(),
        script: "server.js".to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_processes() {
    let (svc, cli) = service(MockPm2Cli::new().on_success("jlist", jlist()));

    let list = assert_ok!(svc.list_processes().await);
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].runtime, "2m");
    assert_eq!(list[2].status, ProcessStatus::Errored);
    assert_eq!(cli.calls(), vec![argv(&["jlist"])]);
}

#[tokio::test]
async fn test_runtime_follows_the_clock() {
    let clock = Arc::new(FixedTimeProvider::new(NOW));
    let svc = Pm2Service::new(
        Arc::new(MockPm2Cli::new().on_success("jlist", jlist())),
        clock.clone(),
    );

    assert_eq!(svc.list_processes().await.unwrap()[0].runtime, "2m");

    clock.advance(2 * 3_600_000);
    let list = svc.list_processes().await.unwrap();
    assert_eq!(list[0].runtime, "2h 1m");
    assert_eq!(list[1].runtime, "");
}

#[tokio::test]
async fn test_list_when_daemon_down_is_empty() {
    let (svc, _) = service(MockPm2Cli::new().on_failure(
        "jlist",
        1,
        "[PM2][ERROR] PM2 is not running, start it first",
    ));

    assert!(svc.list_processes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_failure_and_parse_error() {
    let (svc, _) = service(MockPm2Cli::new().on_failure("jlist", 2, "EACCES"));
    let err = assert_err!(svc.list_processes().await);
    assert!(matches!(err, AppError::CommandFailed(ref m) if m.contains("EACCES")));

    let (svc, _) = service(MockPm2Cli::new().on_success("jlist", "not json"));
    assert!(matches!(svc.list_processes().await, Err(AppError::Parse(_))));

    let (svc, _) = service(MockPm2Cli::new().on_spawn_error("jlist", "No such file"));
    assert!(matches!(svc.list_processes().await, Err(AppError::Execution(_))));
}

#[tokio::test]
async fn test_lifecycle_actions_build_args_and_messages() {
    let (svc, cli) = service(MockPm2Cli::new());

    let started = svc.start(&ProcessTarget::Id(3)).await;
    assert!(started.success);
    assert_eq!(started.message, "Process 3 started");
    assert!(started.error.is_none());

    svc.stop(&ProcessTarget::Name("api".to_string())).await;
    svc.restart(&ProcessTarget::Id(0)).await;
    svc.delete(&ProcessTarget::Id(4)).await;
    let all = svc.restart_all().await;
    assert_eq!(all.message, "All processes restarted");
    svc.start_all().await;
    svc.stop_all().await;

    assert_eq!(
        cli.calls(),
        vec![
            argv(&["start", "3"]),
            argv(&["stop", "api"]),
            argv(&["restart", "0"]),
            argv(&["delete", "4"]),
            argv(&["restart", "all"]),
            argv(&["start", "all"]),
            argv(&["stop", "all"]),
        ]
    );
}

#[tokio::test]
async fn test_action_failure_is_reported_not_raised() {
    let (svc, _) = service(
        MockPm2Cli::new()
            .on_failure("stop", 1, "[PM2][ERROR] Process or Namespace 9 not found\n")
            .on_spawn_error("start", "permission denied"),
    );

    let stopped = svc.stop(&ProcessTarget::Id(9)).await;
    assert!(!stopped.success);
    assert_eq!(stopped.message, "Failed to stop process 9");
    assert_eq!(
        stopped.error.as_deref(),
        Some("exit status: 1: [PM2][ERROR] Process or Namespace 9 not found")
    );

    let all = svc.start_all().await;
    assert_eq!(all.message, "Failed to start all processes");
    assert!(all.error.unwrap().contains("permission denied"));
}

#[tokio::test]
async fn test_get_logs() {
    let output = "/root/.pm2/logs/api-out.log last 20 lines:\n0|api | up\n/root/.pm2/logs/api-error.log last 20 lines:\n0|api | boom\n";
    let (svc, cli) = service(MockPm2Cli::new().on_success("logs", output));

    let logs = svc.get_logs(&ProcessTarget::Id(0), Some(20)).await.unwrap();
    assert_eq!(logs.stdout, vec!["0|api | up"]);
    assert_eq!(logs.stderr, vec!["0|api | boom"]);

    svc.get_logs(&ProcessTarget::Id(0), None).await.unwrap();
    svc.get_logs(&ProcessTarget::Id(0), Some(1_000_000)).await.unwrap();

    let calls = cli.calls();
    assert_eq!(calls[0], argv(&["logs", "0", "--lines", "20", "--nostream"]));
    assert_eq!(calls[1][3], "100");
    assert_eq!(calls[2][3], "10000");
}

#[tokio::test]
async fn test_get_logs_failure_is_error() {
    let (svc, _) = service(MockPm2Cli::new().on_failure("logs", 1, "no such process"));
    let err = svc
        .get_logs(&ProcessTarget::Name("ghost".to_string()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CommandFailed(_)));
    assert!(err.to_string().contains("ghost"));

    let (svc, _) = service(MockPm2Cli::new().on_failure(
        "logs",
        1,
        "[PM2][ERROR] Process or Namespace ghost not found",
    ));
    let err = svc
        .get_logs(&ProcessTarget::Name("ghost".to_string()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    // Script output that merely mentions "not found" stays a command failure
    let (svc, _) = service(MockPm2Cli::new().on_failure(
        "logs",
        1,
        "Error: Cannot read log file\n0|api | config.json not found",
    ));
    let err = svc
        .get_logs(&ProcessTarget::Name("api".to_string()), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CommandFailed(_)));
}

#[tokio::test]
async fn test_get_metrics() {
    let (svc, _) = service(MockPm2Cli::new().on_success("jlist", jlist()));

    let metrics = svc.get_metrics().await.unwrap();
    assert_eq!(metrics.total_processes, 3);
    assert_eq!(metrics.running, 1);
    assert_eq!(metrics.stopped, 1);
    assert_eq!(metrics.errored, 1);
    assert_eq!(metrics.total_memory, 1024.0);
    assert_eq!(metrics.total_cpu, 2.5);
}

#[tokio::test]
async fn test_get_version() {
    let (svc, _) = service(
        MockPm2Cli::new().on_success("--version", "[PM2] Spawning PM2 daemon\n5.3.1\n"),
    );
    let info = svc.get_version().await.unwrap();
    assert!(info.installed);
    assert_eq!(info.version, "5.3.1");
    assert_eq!(info.message, "PM2 version: 5.3.1");

    let (svc, cli) = service(MockPm2Cli::not_installed());
    let info = svc.get_version().await.unwrap();
    assert!(!info.installed);
    assert!(info.version.is_empty());
    assert!(info.message.contains("npm install -g pm2"));
    assert_eq!(cli.call_count(), 0);

    let (svc, _) = service(MockPm2Cli::new().on_failure("--version", 1, "boom"));
    assert!(svc.get_version().await.is_err());
}

#[tokio::test]
async fn test_add_process_rejects_invalid_config() {
    let (svc, cli) = service(MockPm2Cli::new());

    let result = svc
        .add_process(&ProcessConfig {
            name: "api".to_string(),
            ..Default::default()
        })
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Process name and script path are required");
    assert_eq!(result.error.as_deref(), Some("Invalid configuration"));
    assert_eq!(cli.call_count(), 0);
}

#[tokio::test]
async fn test_add_process_with_auto_start_persists() {
    let (svc, cli) = service(MockPm2Cli::new().on_failure("startup", 1, "needs sudo"));

    let result = svc
        .add_process(&ProcessConfig {
            auto_start: true,
            instances: 2,
            ..config()
        })
        .await;

    assert!(result.success, "startup failure must not fail the add");
    assert_eq!(result.message, "Process api added");
    assert_eq!(
        cli.calls(),
        vec![
            argv(&["start", "server.js", "--name", "api", "-i", "2"]),
            argv(&["save"]),
            argv(&["startup"]),
        ]
    );
}

#[tokio::test]
async fn test_add_process_failure() {
    let (svc, cli) = service(MockPm2Cli::new().on_failure("start", 1, "Script not found"));

    let result = svc
        .add_process(&ProcessConfig {
            auto_start: true,
            ..config()
        })
        .await;

    assert!(!result.success);
    assert_eq!(result.message, "Failed to add process api");
    assert!(result.error.unwrap().contains("Script not found"));
    assert_eq!(cli.call_count(), 1, "no save/startup after a failed start");
}

#[tokio::test]
async fn test_update_process_deletes_then_adds() {
    let (svc, cli) = service(MockPm2Cli::new());

    let result = svc.update_process(&ProcessTarget::Id(5), &config()).await;

    assert!(result.success);
    assert_eq!(
        cli.calls(),
        vec![
            argv(&["delete", "5"]),
            argv(&["start", "server.js", "--name", "api"]),
        ]
    );
}

#[tokio::test]
async fn test_update_process_stops_when_delete_fails() {
    let (svc, cli) = service(MockPm2Cli::new().on_failure("delete", 1, "not found"));

    let result = svc.update_process(&ProcessTarget::Id(5), &config()).await;

    assert!(!result.success);
    assert_eq!(
        result.message,
        "Failed to update process: could not delete old process 5"
    );
    assert_eq!(result.error.as_deref(), Some("exit status: 1: not found"));
    assert_eq!(cli.call_count(), 1);
}

#[tokio::test]
async fn test_mutations_are_serialized() {
    let (svc, cli) = service(MockPm2Cli::new());
    let svc = Arc::new(svc.with_settle_delay(Duration::from_millis(20)));

    let updater = {
        let svc = svc.clone();
        tokio::spawn(async move { svc.update_process(&ProcessTarget::Id(1), &config()).await })
    };
    tokio::time::sleep(Duration::from_millis(5)).await;
    let stopped = svc.stop(&ProcessTarget::Id(2)).await;

    assert!(updater.await.unwrap().success);
    assert!(stopped.success);

    let actions: Vec<String> = cli.calls().into_iter().map(|c| c[0].clone()).collect();
    assert_eq!(actions, vec!["delete", "start", "stop"]);
}
