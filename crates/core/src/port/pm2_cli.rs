// PM2 CLI Port
// Abstraction over invoking the external `pm2` executable

use async_trait::async_trait;
use thiserror::Error;

/// Captured result of one PM2 invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    /// None when the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// stdout followed by stderr
    pub output: String,
    pub duration_ms: i64,
}

impl CommandOutput {
    /// Short description of how the command ended, e.g. `exit status: 1`
    pub fn status_text(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit status: {}", code),
            None if self.success => "exit status: 0".to_string(),
            None => "terminated by signal".to_string(),
        }
    }

    /// `<status>: <output>` as shown to users when a command fails
    pub fn failure_detail(&self) -> String {
        format!("{}: {}", self.status_text(), self.output.trim_end())
    }
}

/// Errors raised before PM2 could report anything
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Command timeout after {0}ms")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(String),
}

/// PM2 command-line port
///
/// Implementations:
/// - SystemPm2Cli: spawns the real executable
/// - MockPm2Cli: scripted responses for tests
#[async_trait]
pub trait Pm2Cli: Send + Sync {
    /// Run `pm2 <args...>` and capture its combined output
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the executable cannot be started
    /// - ExecutionError::Timeout if it does not finish in time
    async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecutionError>;

    /// Whether the pm2 executable can be found
    async fn locate(&self) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;

    /// Scripted outcome for one invocation
    #[derive(Debug, Clone)]
    pub enum MockResponse {
        Exit { code: i32, output: String },
        SpawnError(String),
    }

    /// Mock PM2 CLI
    ///
    /// Responses are queued per action (first argument). When a queue runs dry the
    /// last response for that action repeats; unknown actions succeed silently.
    pub struct MockPm2Cli {
        responses: Mutex<HashMap<String, VecDeque<MockResponse>>>,
        calls: Mutex<Vec<Vec<String>>>,
        installed: bool,
    }

    impl MockPm2Cli {
        pub fn new() -> Self {
            Self {
                responses: Mutex::new(HashMap::new()),
                calls: Mutex::new(Vec::new()),
                installed: true,
            }
        }

        pub fn not_installed() -> Self {
            Self {
                installed: false,
                ..Self::new()
            }
        }

        /// Queue a successful exit with the given output
        pub fn on_success(self, action: &str, output: impl Into<String>) -> Self {
            self.push(
                action,
                MockResponse::Exit {
                    code: 0,
                    output: output.into(),
                },
            )
        }

        /// Queue a non-zero exit with the given output
        pub fn on_failure(self, action: &str, code: i32, output: impl Into<String>) -> Self {
            self.push(
                action,
                MockResponse::Exit {
                    code,
                    output: output.into(),
                },
            )
        }

        pub fn on_spawn_error(self, action: &str, message: impl Into<String>) -> Self {
            self.push(action, MockResponse::SpawnError(message.into()))
        }

        fn push(self, action: &str, response: MockResponse) -> Self {
            self.responses
                .lock()
                .unwrap()
                .entry(action.to_string())
                .or_default()
                .push_back(response);
            self
        }

        /// Every argument vector received so far
        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn next_response(&self, action: &str) -> MockResponse {
            let mut responses = self.responses.lock().unwrap();
            match responses.get_mut(action) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) if !queue.is_empty() => queue[0].clone(),
                _ => MockResponse::Exit {
                    code: 0,
                    output: String::new(),
                },
            }
        }
    }

    impl Default for MockPm2Cli {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl Pm2Cli for MockPm2Cli {
        async fn run(&self, args: &[String]) -> Result<CommandOutput, ExecutionError> {
            self.calls.lock().unwrap().push(args.to_vec());

            let action = args.first().map(String::as_str).unwrap_or_default();
            match self.next_response(action) {
                MockResponse::Exit { code, output } => Ok(CommandOutput {
                    success: code == 0,
                    exit_code: Some(code),
                    output,
                    duration_ms: 1,
                }),
                MockResponse::SpawnError(msg) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }

        async fn locate(&self) -> bool {
            self.installed
        }
    }
}
