//! Shared handle to one tmux server.

use std::sync::Arc;

use tracing::debug;

use tmux_model_core::{format_string, Attributes, Error, Field, Result};

use crate::executor::CommandExecutor;
use crate::parser::{parse_record, parse_records};

/// Explicit handle threaded through every session, window and pane.
///
/// Cloning is cheap; all clones talk to the same executor.
#[derive(Debug, Clone)]
pub struct Context {
    executor: Arc<dyn CommandExecutor>,
    separator: Arc<str>,
}

impl Context {
    /// Context over an executor, using `separator` between record fields.
    pub fn new(executor: Arc<dyn CommandExecutor>, separator: &str) -> Self {
        Self {
            executor,
            separator: Arc::from(separator),
        }
    }

    /// Run one command and return its stdout lines.
    pub fn cmd<I, S>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        debug!(?args, "tmux");
        self.executor.execute(&args)
    }

    /// Run a list command with the schema's `-F` format appended.
    pub fn list<F: Field>(&self, args: &[&str]) -> Result<Vec<Attributes<F>>> {
        let lines = self.cmd(self.with_format::<F>(args))?;
        parse_records(&lines, &self.separator)
    }

    /// Run a creation command that prints exactly one `-F` record (`-P`).
    ///
    /// `command` is the optional shell command, which tmux expects after all
    /// flags.
    pub fn create<F: Field>(&self, args: &[&str], command: Option<&str>) -> Result<Attributes<F>> {
        let mut full = self.with_format::<F>(args);
        full.extend(command.map(str::to_string));
        let lines = self.cmd(full)?;
        let mut records = lines.iter().filter(|line| !line.trim().is_empty());
        match (records.next(), records.next()) {
            (Some(line), None) => parse_record(line, &self.separator),
            (None, _) => Err(Error::Parse(format!(
                "{} creation printed no record",
                F::KIND
            ))),
            (Some(_), Some(_)) => Err(Error::Parse(format!(
                "{} creation printed more than one record",
                F::KIND
            ))),
        }
    }

    fn with_format<F: Field>(&self, args: &[&str]) -> Vec<String> {
        let mut full: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        full.push("-F".to_string());
        full.push(format_string::<F>(&self.separator));
        full
    }
}
