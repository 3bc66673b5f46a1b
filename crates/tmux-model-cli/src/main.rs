//! # tmux-model
//!
//! Prints the sessions, windows and panes of a tmux server, or checks
//! whether a session exists.
//!
//! ## Architecture
//!
//! This is Layer 2 - a thin binary over:
//! - tmux-model-core: identifiers, schema, errors, configuration
//! - tmux-model: the session/window/pane object model

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tmux_model::{ClientConfig, Server};
use tmux_model_cli::CliArgs;

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(socket) = &args.socket {
        config.tmux.socket_name = Some(socket.clone());
        config.tmux.socket_path = None;
        config.validate()?;
    }

    // Initialize logging on stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(binary = %config.tmux.binary, "tmux-model starting");

    let server = Server::new(&config);
    let mut stdout = std::io::stdout().lock();
    let success = tmux_model_cli::run(&args, &server, &mut stdout)?;
    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
