// Log parsing for `pm2 logs <target> --lines N --nostream`

use crate::domain::LogData;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Stdout,
    Stderr,
}

/// Split PM2 log output into stdout and stderr lines
///
/// PM2 prints one header per log file (`/root/.pm2/logs/api-error.log last 100
/// lines:`) followed by that file's lines. Output without any header is treated
/// as plain stdout.
pub fn parse_logs(output: &str) -> LogData {
    let mut logs = LogData::default();
    let mut preamble = Vec::new();
    let mut section = Section::Preamble;
    let mut saw_header = false;

    for raw in output.lines() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        if let Some(path) = header_path(line) {
            saw_header = true;
            section = if is_error_log(path) {
                Section::Stderr
            } else {
                Section::Stdout
            };
            continue;
        }

        match section {
            Section::Preamble => preamble.push(line.to_string()),
            Section::Stdout => logs.stdout.push(line.to_string()),
            Section::Stderr => logs.stderr.push(line.to_string()),
        }
    }

    if !saw_header {
        logs.stdout = preamble;
    }
    logs
}

/// Path of a `<path> last <n> lines:` header line
fn header_path(line: &str) -> Option<&str> {
    let body = line.trim().strip_suffix("lines:")?;
    let (path, count) = body.trim_end().rsplit_once(" last ")?;
    count
        .trim()
        .chars()
        .all(|c| c.is_ascii_digit())
        .then_some(path.trim())
        .filter(|p| !p.is_empty())
}

fn is_error_log(path: &str) -> bool {
    let file_name = path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_ascii_lowercase();
    // PM2 names the files `<app>-out.log` and `<app>-error.log`; the app name
    // itself may contain "error"
    ["-error.log", "-err.log"]
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
        || file_name == "error.log"
        || file_name == "err.log"
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
[TAILING] Tailing last 3 lines for [api] process (change the value with --lines option)
/home/deploy/.pm2/logs/api-out.log last 3 lines:
0|api      | listening on 8080
0|api      | GET /health 200

/home/deploy/.pm2/logs/api-error.log last 3 lines:
0|api      | DeprecationWarning: Buffer() is deprecated\r
";

    #[test]
    fn test_sections_are_split() {
        let logs = parse_logs(OUTPUT);
        assert_eq!(
            logs.stdout,
            vec!["0|api      | listening on 8080", "0|api      | GET /health 200"]
        );
        assert_eq!(
            logs.stderr,
            vec!["0|api      | DeprecationWarning: Buffer() is deprecated"]
        );
    }

    #[test]
    fn test_headerless_output_goes_to_stdout() {
        let logs = parse_logs("line one\n\nline two\n");
        assert_eq!(logs.stdout, vec!["line one", "line two"]);
        assert!(logs.stderr.is_empty());
    }

    #[test]
    fn test_header_detection() {
        assert_eq!(
            header_path("C:\\Users\\me\\.pm2\\logs\\app-err.log last 15 lines:"),
            Some("C:\\Users\\me\\.pm2\\logs\\app-err.log")
        );
        assert!(header_path("0|api | we served the last few lines:").is_none());
        assert!(is_error_log("C:\\Users\\me\\.pm2\\logs\\app-err.log"));
        assert!(!is_error_log("/var/log/errors-dir/app-out.log"));
    }

    #[test]
    fn test_app_name_containing_error_keeps_stdout() {
        let logs = parse_logs(
            "/root/.pm2/logs/error-reporter-out.log last 2 lines:\n\
             0|error-reporter | sent 3 reports\n\
             /root/.pm2/logs/error-reporter-error.log last 2 lines:\n\
             0|error-reporter | boom\n",
        );

        assert_eq!(logs.stdout, vec!["0|error-reporter | sent 3 reports"]);
        assert_eq!(logs.stderr, vec!["0|error-reporter | boom"]);
        assert!(is_error_log("/srv/logs/err.log"));
        assert!(!is_error_log("/srv/logs/errors-out.log"));
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(parse_logs(""), LogData::default());
    }
}
