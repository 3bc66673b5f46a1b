//! Window objects.

use std::sync::{Arc, RwLock};

use tracing::info;

use tmux_model_core::{
    Attributes, Error, PaneField, Result, SessionId, Value, WindowField, WindowId,
};

use crate::attach::resolve_attached;
use crate::context::Context;
use crate::executor::stale_if_missing;
use crate::options::{self, OptionScope, Options};
use crate::pane::Pane;
use crate::registry::{read, record_id, write, Entity, Registry};

/// Options for splitting a window.
#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Stack the new pane below instead of beside (`-v`)
    pub vertical: bool,
    /// Keep focus on the current pane (`-d`)
    pub detached: bool,
    /// Working directory of the new pane (`-c`)
    pub start_directory: Option<String>,
}

/// A tab-like container of panes inside a session.
#[derive(Debug)]
pub struct Window {
    ctx: Context,
    id: WindowId,
    attrs: RwLock<Attributes<WindowField>>,
    panes: RwLock<Registry<Pane>>,
}

impl Window {
    pub(crate) fn new(ctx: Context, id: WindowId, attrs: Attributes<WindowField>) -> Self {
        Self {
            ctx,
            id,
            attrs: RwLock::new(attrs),
            panes: RwLock::new(Registry::new()),
        }
    }

    /// Stable window identifier (`@N`).
    pub fn id(&self) -> &WindowId {
        &self.id
    }

    /// Cached value of one attribute.
    pub fn get(&self, field: WindowField) -> Option<Value> {
        read(&self.attrs).get(field).cloned()
    }

    /// Copy of all cached attributes.
    pub fn snapshot(&self) -> Attributes<WindowField> {
        read(&self.attrs).clone()
    }

    /// Position within the session, as of the last refresh.
    ///
    /// Only good for addressing: tmux renumbers windows and the base index
    /// depends on the user's configuration.
    pub fn index(&self) -> Option<i64> {
        read(&self.attrs).get_int(WindowField::WindowIndex)
    }

    /// Window name, as of the last refresh.
    pub fn name(&self) -> Option<String> {
        read(&self.attrs)
            .get_str(WindowField::WindowName)
            .map(str::to_string)
    }

    /// Session holding this window, as of the last refresh.
    pub fn session_id(&self) -> Option<SessionId> {
        read(&self.attrs)
            .get_str(WindowField::SessionId)
            .and_then(|raw| raw.parse().ok())
    }

    /// Whether the last refresh saw this window focused in its session.
    pub(crate) fn is_active(&self) -> bool {
        read(&self.attrs)
            .get(WindowField::WindowActive)
            .is_some_and(Value::as_flag)
    }

    /// Re-read this window's attributes from tmux.
    pub fn refresh(&self) -> Result<()> {
        let records = self
            .ctx
            .list::<WindowField>(&["list-windows", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;

        for attrs in records {
            if record_id::<Self>(&attrs)? == self.id {
                self.update(attrs);
                return Ok(());
            }
        }
        Err(self.stale_entity())
    }

    /// Query tmux for this window's panes and reconcile the registry.
    pub fn list_panes(&self) -> Result<Vec<Arc<Pane>>> {
        let records = self
            .ctx
            .list::<PaneField>(&["list-panes", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;
        let ctx = self.ctx.clone();
        write(&self.panes).sync(records, |id, attrs| Pane::new(ctx.clone(), id, attrs))
    }

    /// Panes as of the last listing, without querying tmux.
    pub fn panes(&self) -> Vec<Arc<Pane>> {
        read(&self.panes).entries()
    }

    /// The pane tmux currently has focused in this window.
    pub fn attached_pane(&self) -> Result<Arc<Pane>> {
        let panes = self.list_panes()?;
        resolve_attached(self.id.as_str(), &panes, Pane::is_active)
    }

    /// Focus the pane at `index` and return it freshly refreshed.
    pub fn select_pane(&self, index: i64) -> Result<Arc<Pane>> {
        let target = format!("{}.{index}", self.id);
        self.ctx.cmd(["select-pane", "-t", target.as_str()])?;
        self.attached_pane()
    }

    /// Split this window, returning the new pane.
    pub fn split_window(&self, options: SplitOptions) -> Result<Arc<Pane>> {
        let mut args = vec!["split-window", "-P", "-t", self.id.as_str()];
        args.push(if options.vertical { "-v" } else { "-h" });
        if options.detached {
            args.push("-d");
        }
        if let Some(dir) = options.start_directory.as_deref() {
            args.extend(["-c", dir]);
        }

        let attrs = self
            .ctx
            .create::<PaneField>(&args, None)
            .map_err(|err| self.stale(err))?;
        let ctx = self.ctx.clone();
        let pane = write(&self.panes).resolve_or_create(attrs, |id, attrs| Pane::new(ctx, id, attrs))?;
        info!(window = %self.id, pane = %pane.id(), "split window");
        Ok(pane)
    }

    /// Rename the window and update the cached name.
    pub fn rename_window(&self, name: &str) -> Result<()> {
        self.ctx
            .cmd(["rename-window", "-t", self.id.as_str(), name])
            .map_err(|err| self.stale(err))?;
        write(&self.attrs).insert(WindowField::WindowName, name);
        info!(window = %self.id, name, "renamed window");
        Ok(())
    }

    /// Make this the focused window of its session.
    pub fn select(&self) -> Result<()> {
        self.ctx
            .cmd(["select-window", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;
        Ok(())
    }

    /// Close the window in tmux.
    pub fn kill(&self) -> Result<()> {
        self.ctx
            .cmd(["kill-window", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;
        info!(window = %self.id, "killed window");
        Ok(())
    }

    /// Set a window option.
    pub fn set_option(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        options::set_option(&self.ctx, self.scope(), key, value.into())
    }

    /// Value of one window option, `None` if unset on this window.
    pub fn show_option(&self, key: &str) -> Result<Option<Value>> {
        options::show_option(&self.ctx, self.scope(), key)
    }

    /// Every option set on this window.
    pub fn show_options(&self) -> Result<Options> {
        options::show_options(&self.ctx, self.scope())
    }

    fn scope(&self) -> OptionScope<'_> {
        OptionScope::window(self.id.as_str())
    }

    fn stale(&self, err: Error) -> Error {
        stale_if_missing(err, WindowId::KIND, self.id.as_str())
    }

    fn stale_entity(&self) -> Error {
        Error::StaleEntity {
            kind: WindowId::KIND,
            id: self.id.to_string(),
        }
    }
}

impl Entity for Window {
    type Field = WindowField;
    type Id = WindowId;

    fn id(&self) -> &WindowId {
        &self.id
    }

    fn update(&self, attrs: Attributes<WindowField>) {
        *write(&self.attrs) = attrs;
    }
}

/// Identity equality: same tmux window.
impl PartialEq for Window {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Window {}
