//! Human-readable output

use colored::Colorize;
use pm2_manager_core::domain::{
    LogData, MetricsData, OperationResult, Pm2VersionInfo, ProcessInfo, ProcessStatus,
};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ProcessRow {
    id: u32,
    name: String,
    status: String,
    #[tabled(rename = "cpu")]
    cpu: String,
    #[tabled(rename = "mem")]
    memory: String,
    pid: u32,
    user: String,
    uptime: String,
    #[tabled(rename = "auto")]
    auto_start: String,
}

impl From<&ProcessInfo> for ProcessRow {
    fn from(p: &ProcessInfo) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            status: p.status.to_string(),
            cpu: format!("{:.1}%", p.cpu),
            memory: format_bytes(p.memory),
            pid: p.pid,
            user: p.user.clone(),
            uptime: if p.runtime.is_empty() {
                "-".to_string()
            } else {
                p.runtime.clone()
            },
            auto_start: if p.auto_start { "yes" } else { "no" }.to_string(),
        }
    }
}

/// `52428800` -> `50.0 MB`
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }

    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", size as u64)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

pub fn process_table(processes: &[ProcessInfo]) -> String {
    Table::new(processes.iter().map(ProcessRow::from)).to_string()
}

pub fn print_processes(processes: &[ProcessInfo]) {
    if processes.is_empty() {
        println!("{}", "No processes managed by PM2".yellow());
        return;
    }
    println!("{}", process_table(processes));

    let unhealthy: Vec<&str> = processes
        .iter()
        .filter(|p| p.status == ProcessStatus::Errored)
        .map(|p| p.name.as_str())
        .collect();
    if !unhealthy.is_empty() {
        println!();
        println!("{} {}", "Errored:".red().bold(), unhealthy.join(", "));
    }
}

pub fn print_operation(result: &OperationResult) {
    if result.success {
        println!("{}", format!("✓ {}", result.message).green().bold());
    } else {
        println!("{}", format!("✗ {}", result.message).red().bold());
        if let Some(error) = &result.error {
            println!("  {}", error);
        }
    }
}

pub fn print_metrics(metrics: &MetricsData) {
    println!("{}", "PM2 Metrics".cyan().bold());
    println!();
    println!("  {} {}", "Total:".bold(), metrics.total_processes);
    println!("  {} {}", "Running:".bold(), metrics.running.to_string().green());
    println!("  {} {}", "Stopped:".bold(), metrics.stopped.to_string().yellow());
    println!("  {} {}", "Errored:".bold(), metrics.errored.to_string().red());
    println!();
    println!("  {} {:.1}%", "CPU:".bold(), metrics.total_cpu);
    println!("  {} {}", "Memory:".bold(), format_bytes(metrics.total_memory));
}

pub fn print_logs(target: &str, logs: &LogData) {
    println!("{}", format!("Logs for process {}:", target).cyan().bold());
    if logs.stdout.is_empty() && logs.stderr.is_empty() {
        println!("{}", "No logs available".yellow());
        return;
    }
    for line in &logs.stdout {
        println!("{}", line);
    }
    if !logs.stderr.is_empty() {
        println!();
        println!("{}", "stderr:".red().bold());
        for line in &logs.stderr {
            println!("{}", line.red());
        }
    }
}

pub fn print_version(info: &Pm2VersionInfo) {
    if info.installed {
        println!("  {} {}", "PM2:".bold(), info.version.green());
    } else {
        println!("  {} {}", "PM2:".bold(), "NOT INSTALLED".red());
        println!("  {}", info.message);
    }
}
