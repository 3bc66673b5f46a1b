//! tmux-model command-line library
//!
//! Argument parsing and rendering for the `tmux-model` binary. The binary
//! itself is in main.rs.

pub mod args;
pub mod tree;

use std::io::Write;

use anyhow::Result;
use tracing::info;

use tmux_model::Server;

// Re-export commonly used types
pub use args::{CliArgs, Command};
pub use tree::{collect, render, PaneNode, SessionNode, WindowNode};

/// Execute one parsed command against `server`, writing results to `out`.
///
/// Returns whether the process should exit successfully.
pub fn run<W: Write>(args: &CliArgs, server: &Server, out: &mut W) -> Result<bool> {
    match args.command() {
        Command::HasSession { name } => {
            let exists = server.has_session(&name)?;
            info!(name = %name, exists, "probed session");
            if args.json {
                writeln!(out, "{}", serde_json::json!({ "name": name, "exists": exists }))?;
            }
            Ok(exists)
        }
        Command::Ls => {
            let tree = collect(server)?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&tree)?)?;
            } else {
                write!(out, "{}", render(&tree))?;
            }
            Ok(true)
        }
    }
}
