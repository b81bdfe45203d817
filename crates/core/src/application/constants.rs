// Service constants (No magic values)
use std::time::Duration;

/// Lines fetched by `pm2 logs` when the caller does not say (100)
pub const DEFAULT_LOG_LINES: usize = 100;

/// Upper bound for a single log fetch
pub const MAX_LOG_LINES: usize = 10_000;

/// Pause between delete and re-add during an update (500ms)
/// Gives the PM2 daemon time to release the old name.
pub const DEFAULT_UPDATE_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Marker printed by `pm2 jlist` when its daemon is down
pub const PM2_NOT_RUNNING_MARKER: &str = "PM2 is not running";

/// Prefix PM2 puts on its own error lines
pub const PM2_ERROR_PREFIX: &str = "[PM2][ERROR]";

/// Ending of PM2's error line when a target matches no process
/// (`[PM2][ERROR] Process or Namespace api not found`)
pub const PM2_NOT_FOUND_SUFFIX: &str = " not found";

/// Shown when the pm2 executable cannot be found
pub const PM2_INSTALL_HINT: &str = "PM2 is not installed. Install it first: npm install -g pm2";
