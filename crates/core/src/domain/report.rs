// Operation outcomes returned to the UI layer

use serde::{Deserialize, Serialize};

/// Outcome of a mutating PM2 command
///
/// Command failures are data, not errors: the UI shows `message` and `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
        }
    }
}

/// Recent log lines of a process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogData {
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

/// Whether PM2 is installed, and which version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pm2VersionInfo {
    pub version: String,
    pub installed: bool,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_omitted_on_success() {
        let json = serde_json::to_value(OperationResult::ok("done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));

        let failed = OperationResult::failed("nope", "exit status: 1");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["error"], "exit status: 1");
    }
}
