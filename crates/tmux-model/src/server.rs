//! Entry point: one tmux server and the registry of its sessions.

use std::sync::{Arc, RwLock};

use tracing::info;

use tmux_model_core::{ClientConfig, Error, Result, SessionField};

use crate::context::Context;
use crate::executor::{classify_failure, CommandExecutor, FailureKind, TmuxCommand};
use crate::registry::{read, write, Registry};
use crate::session::Session;

/// Options for creating a session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Session name (`-s`); tmux picks one when unset
    pub name: Option<String>,
    /// Name of the first window (`-n`)
    pub window_name: Option<String>,
    /// Working directory (`-c`)
    pub start_directory: Option<String>,
    /// Initial width (`-x`)
    pub width: Option<u16>,
    /// Initial height (`-y`)
    pub height: Option<u16>,
}

impl SessionOptions {
    /// Options for a session with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Handle to one tmux server.
///
/// Construct once and pass it around; every session, window and pane it
/// hands out shares its [`Context`].
#[derive(Debug)]
pub struct Server {
    ctx: Context,
    sessions: RwLock<Registry<Session>>,
}

impl Server {
    /// Server reached through the tmux binary described by `config`.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_executor(
            Arc::new(TmuxCommand::new(&config.tmux)),
            &config.tmux.field_separator,
        )
    }

    /// Server driven by an arbitrary executor.
    pub fn with_executor(executor: Arc<dyn CommandExecutor>, separator: &str) -> Self {
        Self {
            ctx: Context::new(executor, separator),
            sessions: RwLock::new(Registry::new()),
        }
    }

    /// Shared context handed to every entity.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Query tmux for all sessions and reconcile the registry.
    ///
    /// A server that is not running has no sessions.
    pub fn list_sessions(&self) -> Result<Vec<Arc<Session>>> {
        let records = match self.ctx.list::<SessionField>(&["list-sessions"]) {
            Ok(records) => records,
            Err(Error::Execution { stderr, .. })
                if classify_failure(&stderr) == FailureKind::MissingTarget =>
            {
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        let ctx = self.ctx.clone();
        write(&self.sessions).sync(records, |id, attrs| Session::new(ctx.clone(), id, attrs))
    }

    /// Sessions as of the last listing, without querying tmux.
    pub fn sessions(&self) -> Vec<Arc<Session>> {
        read(&self.sessions).entries()
    }

    /// Whether a session with exactly this name exists.
    pub fn has_session(&self, name: &str) -> Result<bool> {
        let target = format!("={name}");
        match self.ctx.cmd(["has-session", "-t", target.as_str()]) {
            Ok(_) => Ok(true),
            // has-session answers through its exit status; only a missing
            // session or server means "no".
            Err(Error::Execution { stderr, .. })
                if classify_failure(&stderr) == FailureKind::MissingTarget =>
            {
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Find a session by identifier or exact name.
    pub fn find_session(&self, query: &str) -> Result<Option<Arc<Session>>> {
        Ok(self
            .list_sessions()?
            .into_iter()
            .find(|s| s.id().as_str() == query || s.name().as_deref() == Some(query)))
    }

    /// Create a detached session, register it and return it fully hydrated.
    pub fn new_session(&self, options: SessionOptions) -> Result<Arc<Session>> {
        let width = options.width.map(|w| w.to_string());
        let height = options.height.map(|h| h.to_string());

        let mut args = vec!["new-session", "-d", "-P"];
        if let Some(name) = options.name.as_deref() {
            args.extend(["-s", name]);
        }
        if let Some(window_name) = options.window_name.as_deref() {
            args.extend(["-n", window_name]);
        }
        if let Some(dir) = options.start_directory.as_deref() {
            args.extend(["-c", dir]);
        }
        if let Some(width) = width.as_deref() {
            args.extend(["-x", width]);
        }
        if let Some(height) = height.as_deref() {
            args.extend(["-y", height]);
        }

        let attrs = self.ctx.create::<SessionField>(&args, None)?;
        let ctx = self.ctx.clone();
        let session =
            write(&self.sessions).resolve_or_create(attrs, |id, attrs| Session::new(ctx, id, attrs))?;
        info!(session = %session.id(), name = ?session.name(), "created session");
        Ok(session)
    }

    /// Close a session by identifier or name and drop it from the registry.
    pub fn kill_session(&self, target: &str) -> Result<()> {
        self.ctx.cmd(["kill-session", "-t", target])?;
        info!(target, "killed session");
        self.list_sessions()?;
        Ok(())
    }

    /// Stop the tmux server and forget every session.
    pub fn kill_server(&self) -> Result<()> {
        self.ctx.cmd(["kill-server"])?;
        write(&self.sessions).sync(Vec::new(), |id, attrs| {
            Session::new(self.ctx.clone(), id, attrs)
        })?;
        Ok(())
    }
}
