//! Command-line argument handling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// tmux-model - inspect a tmux server through its object model
#[derive(Debug, Parser)]
#[command(name = "tmux-model")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Socket name overriding the configuration (tmux -L)
    #[arg(short = 'L', long, value_name = "NAME", global = true)]
    pub socket: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

/// What to do once the server handle exists.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print every session, window and pane
    #[command(visible_alias = "list")]
    Ls,
    /// Exit 0 if a session with exactly this name exists, 1 otherwise
    HasSession {
        /// Session name
        name: String,
    },
}

impl CliArgs {
    /// The subcommand, listing sessions when none was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Ls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("tmux-model").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_to_list() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command(), Command::Ls);
        assert!(!args.json);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_flags_and_command() {
        let args = parse(&["--json", "--config", "tm.yaml", "-L", "work", "has-session", "dev"]).unwrap();
        assert!(args.json);
        assert_eq!(args.config, Some(PathBuf::from("tm.yaml")));
        assert_eq!(args.socket.as_deref(), Some("work"));
        assert_eq!(args.command(), Command::HasSession { name: "dev".to_string() });
    }

    #[test]
    fn test_list_alias_and_trailing_flag() {
        let args = parse(&["list", "--json"]).unwrap();
        assert_eq!(args.command(), Command::Ls);
        assert!(args.json);
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["has-session"]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
    }
}
