// jlist reshaping: raw `pm2 jlist` JSON -> ProcessInfo rows

use super::json_path::{get_bool, get_f64, get_i64, get_str, get_u32, lookup};
use crate::domain::{ProcessInfo, ProcessStatus};
use crate::error::{AppError, Result};
use chrono::{Local, TimeZone};
use serde_json::Value;
use std::time::Duration;

/// Parse the output of `pm2 jlist`
///
/// PM2 sometimes prints notices (`[PM2] Spawning PM2 daemon`, version mismatch
/// warnings) before the JSON array, so every line that opens with `[` is tried
/// as the start of the document until one parses.
pub fn parse_process_list(output: &str, now_millis: i64) -> Result<Vec<ProcessInfo>> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(Vec::new());
    }

    let mut last_error = None;
    for start in array_candidates(output) {
        match first_json_value(&output[start..]) {
            Ok(Value::Array(entries)) => {
                return Ok(entries
                    .iter()
                    .map(|entry| to_process_info(entry, now_millis))
                    .collect());
            }
            Ok(_) => last_error = Some("expected JSON array".to_string()),
            Err(e) => last_error = Some(e.to_string()),
        }
    }

    Err(AppError::Parse(format!(
        "{}. Output: {}",
        last_error.unwrap_or_else(|| "no JSON array in pm2 output".to_string()),
        trimmed
    )))
}

/// Byte offsets of lines whose first non-blank char is `[`
fn array_candidates(output: &str) -> impl Iterator<Item = usize> + '_ {
    output
        .split_inclusive('\n')
        .scan(0usize, |offset, line| {
            let start = *offset;
            *offset += line.len();
            Some((start, line))
        })
        .filter_map(|(start, line)| {
            let body = line.trim_start();
            body.starts_with('[')
                .then(|| start + (line.len() - body.len()))
        })
}

/// Deserialize the first JSON value, ignoring anything printed after it
fn first_json_value(text: &str) -> serde_json::Result<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()
        .unwrap_or(Ok(Value::Null))
}

/// Flatten one jlist entry
pub fn to_process_info(entry: &Value, now_millis: i64) -> ProcessInfo {
    let uptime = get_i64(entry, "pm2_env.pm_uptime");
    let script = get_str(entry, "pm2_env.pm_exec_path");
    let args = script_args(entry);
    let command = if args.is_empty() {
        script.clone()
    } else {
        format!("{} {}", script, args)
    };

    // Newer PM2 uses `autorestart`; older builds exposed `pm_auto_restart`
    let auto_start = if lookup(entry, "pm2_env.autorestart").is_some() {
        get_bool(entry, "pm2_env.autorestart")
    } else {
        get_bool(entry, "pm2_env.pm_auto_restart")
    };

    let (started_at, runtime) = if uptime > 0 {
        (
            format_started_at(uptime),
            format_runtime(Duration::from_millis(
                now_millis.saturating_sub(uptime).max(0) as u64,
            )),
        )
    } else {
        (String::new(), String::new())
    };

    ProcessInfo {
        id: get_u32(entry, "pm_id"),
        name: get_str(entry, "name"),
        status: ProcessStatus::from(get_str(entry, "pm2_env.status")),
        cpu: get_f64(entry, "monit.cpu"),
        memory: get_f64(entry, "monit.memory"),
        uptime,
        started_at,
        runtime,
        pid: get_u32(entry, "pid"),
        user: get_str(entry, "pm2_env.username"),
        command,
        script,
        auto_start,
    }
}

/// `pm2_env.args` is an array in current PM2 and a string in some older dumps
fn script_args(entry: &Value) -> String {
    match lookup(entry, "pm2_env.args") {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

/// Local wall-clock time of an epoch-millis timestamp
pub fn format_started_at(epoch_millis: i64) -> String {
    Local
        .timestamp_millis_opt(epoch_millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Compact human duration: `45s`, `12m`, `3h 4m`, `2d 5h`
pub fn format_runtime(elapsed: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    // Sub-hour buckets round to the nearest unit, longer ones truncate
    let exact = elapsed.as_secs_f64();
    match elapsed.as_secs() {
        s if s < MINUTE => format!("{}s", exact.round_ties_even() as u64),
        s if s < HOUR => format!("{}m", (exact / MINUTE as f64).round_ties_even() as u64),
        s if s < DAY => format!("{}h {}m", s / HOUR, (s % HOUR) / MINUTE),
        s => format!("{}d {}h", s / DAY, (s % DAY) / HOUR),
    }
}
