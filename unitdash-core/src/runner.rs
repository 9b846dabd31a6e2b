//! Process runner: the one primitive every introspection component shells
//! through. Nothing in this crate reads live process state directly.

use std::fmt;

use async_trait::async_trait;

/// Output captured from a command that did launch.
///
/// A command that ran but printed nothing yields an empty `text`, an
/// observably different outcome from a command that could not be launched
/// at all ([`RunError`]). `status` is `None` when the process ended without
/// an exit code (killed by a signal, or by the runner's timeout).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Captured {
    /// Captured standard output with one trailing newline stripped.
    pub text: String,
    pub status: Option<i32>,
}

/// Failure to launch a command at all. Non-zero exit codes are not errors.
#[derive(Clone, Debug)]
pub struct RunError {
    pub command: String,
    pub message: String,
}

impl RunError {
    pub fn new(command: &str, message: impl Into<String>) -> Self {
        Self {
            command: command.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to run `{}`: {}", self.command, self.message)
    }
}

impl std::error::Error for RunError {}

/// Blocking-per-call external command execution through a shell.
///
/// Both methods complete the spawned command before returning and make no
/// assumption about idempotence: a mutating command sent through
/// `run_status` runs for real.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command`, capture its standard output, strip one trailing
    /// newline, and return text plus exit status.
    async fn run_capturing(&self, command: &str) -> Result<Captured, RunError>;

    /// Run `command` and report only its numeric exit status. Meant for
    /// probes and mutating actions, never for queries.
    async fn run_status(&self, command: &str) -> Result<i32, RunError>;
}

/// Capture helper for the heuristics: a command that cannot launch and a
/// command that printed nothing collapse to the same "no information"
/// result, which every stage treats as "feature absent".
pub async fn capture_text(runner: &dyn CommandRunner, command: &str) -> String {
    match runner.run_capturing(command).await {
        Ok(captured) => captured.text,
        Err(_) => String::new(),
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Scripted runner for engine tests: maps command substrings to canned
    //! output and records every invocation, so tests can assert which
    //! external calls were (not) issued.

    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct ScriptedRunner {
        outputs: Vec<(String, String)>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Canned stdout for any command containing `needle`. First
        /// registered match wins.
        pub fn on(mut self, needle: &str, output: &str) -> Self {
            self.outputs.push((needle.into(), output.into()));
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls_matching(&self, needle: &str) -> usize {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .filter(|command| command.contains(needle))
                .count()
        }
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run_capturing(&self, command: &str) -> Result<Captured, RunError> {
            self.calls.lock().unwrap().push(command.to_string());
            for (needle, output) in &self.outputs {
                if command.contains(needle.as_str()) {
                    return Ok(Captured {
                        text: output.clone(),
                        status: Some(0),
                    });
                }
            }
            // Unscripted commands behave like a tool that ran and printed
            // nothing.
            Ok(Captured {
                text: String::new(),
                status: Some(1),
            })
        }

        async fn run_status(&self, command: &str) -> Result<i32, RunError> {
            self.calls.lock().unwrap().push(command.to_string());
            Ok(0)
        }
    }
}
