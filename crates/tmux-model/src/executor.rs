//! Command execution against the tmux binary.
//!
//! The executor is deliberately dumb: one process per call, no retries, no
//! caching. Everything semantic happens in the layers above.

use std::fmt;
use std::process::Command;

use tracing::debug;

use tmux_model_core::{EntityKind, Error, Result, TmuxSettings};

/// Captured output of one tmux invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Standard output, one entry per line
    pub stdout: Vec<String>,
    /// Standard error, one entry per line
    pub stderr: Vec<String>,
    /// Whether tmux exited successfully
    pub success: bool,
}

impl CommandOutput {
    /// Successful output carrying the given stdout lines.
    pub fn ok(stdout: Vec<String>) -> Self {
        Self {
            stdout,
            stderr: Vec::new(),
            success: true,
        }
    }

    /// Failed output carrying a diagnostic message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: vec![message.into()],
            success: false,
        }
    }

    /// Turn a failure status into [`Error::Execution`].
    pub fn into_result(self, args: &[String]) -> Result<Vec<String>> {
        if self.success {
            return Ok(self.stdout);
        }
        // Some tmux builds report command errors on stdout.
        let lines = if self.stderr.is_empty() {
            self.stdout
        } else {
            self.stderr
        };
        Err(Error::Execution {
            command: args.join(" "),
            stderr: lines.join("\n").trim().to_string(),
        })
    }
}

/// Something that can run tmux commands.
///
/// Implemented by [`TmuxCommand`] for a real server and by
/// [`crate::testing::FakeTmux`] for tests.
pub trait CommandExecutor: Send + Sync + fmt::Debug {
    /// Run one command. Only failures to run at all are errors here.
    fn run(&self, args: &[String]) -> Result<CommandOutput>;

    /// Run one command, turning a failure status into an error.
    fn execute(&self, args: &[String]) -> Result<Vec<String>> {
        self.run(args)?.into_result(args)
    }
}

/// Executor spawning the tmux binary.
#[derive(Debug, Clone)]
pub struct TmuxCommand {
    binary: String,
    global_args: Vec<String>,
}

impl TmuxCommand {
    /// Executor for the configured binary and socket.
    pub fn new(settings: &TmuxSettings) -> Self {
        Self {
            binary: settings.binary.clone(),
            global_args: settings.global_args(),
        }
    }

    /// Arguments placed before every command (`-L`, `-S`, `-f`).
    pub fn global_args(&self) -> &[String] {
        &self.global_args
    }
}

impl Default for TmuxCommand {
    fn default() -> Self {
        Self::new(&TmuxSettings::default())
    }
}

impl CommandExecutor for TmuxCommand {
    fn run(&self, args: &[String]) -> Result<CommandOutput> {
        debug!(binary = %self.binary, ?args, "running tmux command");

        let output = Command::new(&self.binary)
            .args(&self.global_args)
            .args(args)
            .output()?;

        Ok(CommandOutput {
            stdout: split_lines(&output.stdout),
            stderr: split_lines(&output.stderr),
            success: output.status.success(),
        })
    }
}

fn split_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// What a tmux diagnostic message says went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Option key not known to tmux
    InvalidOption,
    /// Target session/window/pane or the server itself is gone
    MissingTarget,
    /// Anything else
    Other,
}

/// Classify tmux diagnostic text.
pub fn classify_failure(stderr: &str) -> FailureKind {
    let normalized = stderr.to_ascii_lowercase();
    if normalized.contains("unknown option")
        || normalized.contains("invalid option")
        || normalized.contains("ambiguous option")
    {
        return FailureKind::InvalidOption;
    }
    if normalized.contains("can't find session")
        || normalized.contains("can't find window")
        || normalized.contains("can't find pane")
        || normalized.contains("session not found")
        || normalized.contains("window not found")
        || normalized.contains("pane not found")
        || normalized.contains("no server running")
        || normalized.contains("error connecting to")
    {
        return FailureKind::MissingTarget;
    }
    FailureKind::Other
}

/// Map a missing-target execution failure to [`Error::StaleEntity`].
pub(crate) fn stale_if_missing(err: Error, kind: EntityKind, id: &str) -> Error {
    match &err {
        Error::Execution { stderr, .. }
            if classify_failure(stderr) == FailureKind::MissingTarget =>
        {
            Error::StaleEntity {
                kind,
                id: id.to_string(),
            }
        }
        _ => err,
    }
}

/// Map an option-rejection execution failure to [`Error::InvalidOption`].
pub(crate) fn invalid_option_if_rejected(err: Error, key: &str) -> Error {
    match err {
        Error::Execution { stderr, .. }
            if classify_failure(&stderr) == FailureKind::InvalidOption =>
        {
            Error::InvalidOption {
                key: key.to_string(),
                message: stderr,
            }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_success_passes_stdout_through() {
        let out = CommandOutput::ok(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(out.into_result(&args(&["ls"])).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_failure_carries_stderr() {
        let out = CommandOutput::failed("can't find session: nope");
        let err = out
            .into_result(&args(&["has-session", "-t", "nope"]))
            .unwrap_err();
        match err {
            Error::Execution { command, stderr } => {
                assert_eq!(command, "has-session -t nope");
                assert_eq!(stderr, "can't find session: nope");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_failure_falls_back_to_stdout() {
        let out = CommandOutput {
            stdout: vec!["unknown option: bogus".to_string()],
            stderr: Vec::new(),
            success: false,
        };
        let err = out.into_result(&args(&["set-option"])).unwrap_err();
        assert_eq!(err.stderr(), Some("unknown option: bogus"));
    }

    #[test]
    fn test_classify_failures() {
        assert_eq!(
            classify_failure("unknown option: afewewfew"),
            FailureKind::InvalidOption
        );
        assert_eq!(
            classify_failure("invalid option: afewewfew"),
            FailureKind::InvalidOption
        );
        assert_eq!(
            classify_failure("can't find session: $4"),
            FailureKind::MissingTarget
        );
        assert_eq!(
            classify_failure("no server running on /tmp/tmux-501/default"),
            FailureKind::MissingTarget
        );
        assert_eq!(
            classify_failure("error connecting to /tmp/tmux-0/default (No such file or directory)"),
            FailureKind::MissingTarget
        );
        assert_eq!(classify_failure("index 3 in use"), FailureKind::Other);
    }

    #[test]
    fn test_stale_mapping_only_for_missing_targets() {
        let missing = Error::Execution {
            command: "list-windows -t $3".to_string(),
            stderr: "can't find session: $3".to_string(),
        };
        let err = stale_if_missing(missing, EntityKind::Session, "$3");
        assert!(matches!(
            err,
            Error::StaleEntity { kind: EntityKind::Session, ref id } if id == "$3"
        ));

        let other = Error::Execution {
            command: "new-window".to_string(),
            stderr: "index in use: 1".to_string(),
        };
        assert!(matches!(
            stale_if_missing(other, EntityKind::Session, "$3"),
            Error::Execution { .. }
        ));
    }

    #[test]
    fn test_invalid_option_mapping() {
        let rejected = Error::Execution {
            command: "set-option -t $0 bogus 1".to_string(),
            stderr: "unknown option: bogus".to_string(),
        };
        let err = invalid_option_if_rejected(rejected, "bogus");
        assert!(err.is_invalid_option());

        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "tmux"));
        assert!(matches!(invalid_option_if_rejected(io, "bogus"), Error::Io(_)));
    }

    #[test]
    fn test_global_args_from_settings() {
        let settings = TmuxSettings {
            socket_name: Some("tm_test".to_string()),
            ..TmuxSettings::default()
        };
        let cmd = TmuxCommand::new(&settings);
        assert_eq!(cmd.global_args(), ["-L", "tm_test"]);
    }

    #[test]
    fn test_missing_binary_is_io_error() {
        let settings = TmuxSettings {
            binary: "tmux-model-definitely-not-installed".to_string(),
            ..TmuxSettings::default()
        };
        let err = TmuxCommand::new(&settings)
            .run(&args(&["list-sessions"]))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
