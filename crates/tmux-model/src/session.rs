//! Session objects.
//!
//! A [`Session`] mirrors one tmux session and owns the registry of its
//! windows. Read-type operations always re-query tmux; the only state kept
//! between calls is each entity's attribute snapshot.
//!
//! Nothing here is atomic across calls. Another client can select, rename or
//! close windows between [`Session::select_window`] and a later
//! [`Session::attached_window`], and the second call reports whatever tmux
//! says at that moment.

use std::sync::{Arc, RwLock};

use tracing::info;

use tmux_model_core::{Attributes, Error, Result, SessionField, SessionId, Value, WindowField};

use crate::attach::resolve_attached;
use crate::context::Context;
use crate::executor::stale_if_missing;
use crate::options::{self, OptionScope, Options};
use crate::pane::Pane;
use crate::registry::{read, record_id, write, Entity, Registry};
use crate::window::Window;

/// Options for creating a window.
#[derive(Debug, Clone)]
pub struct WindowOptions {
    /// Window name (`-n`)
    pub name: Option<String>,
    /// Focus the new window (omit `-d`)
    pub attach: bool,
    /// Working directory (`-c`)
    pub start_directory: Option<String>,
    /// Explicit index; next free index when unset
    pub index: Option<i64>,
    /// Command to run instead of the default shell
    pub command: Option<String>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            name: None,
            attach: true,
            start_directory: None,
            index: None,
            command: None,
        }
    }
}

impl WindowOptions {
    /// Options for a window with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Top-level container of windows.
#[derive(Debug)]
pub struct Session {
    ctx: Context,
    id: SessionId,
    attrs: RwLock<Attributes<SessionField>>,
    windows: RwLock<Registry<Window>>,
}

impl Session {
    pub(crate) fn new(ctx: Context, id: SessionId, attrs: Attributes<SessionField>) -> Self {
        Self {
            ctx,
            id,
            attrs: RwLock::new(attrs),
            windows: RwLock::new(Registry::new()),
        }
    }

    /// Stable session identifier (`$N`).
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Cached value of one attribute.
    pub fn get(&self, field: SessionField) -> Option<Value> {
        read(&self.attrs).get(field).cloned()
    }

    /// Copy of all cached attributes.
    pub fn snapshot(&self) -> Attributes<SessionField> {
        read(&self.attrs).clone()
    }

    /// Session name, as of the last refresh or rename.
    pub fn name(&self) -> Option<String> {
        read(&self.attrs)
            .get_str(SessionField::SessionName)
            .map(str::to_string)
    }

    /// Re-read this session's attributes from tmux.
    pub fn refresh(&self) -> Result<()> {
        let records = self
            .ctx
            .list::<SessionField>(&["list-sessions"])
            .map_err(|err| self.stale(err))?;

        for attrs in records {
            if record_id::<Self>(&attrs)? == self.id {
                self.update(attrs);
                return Ok(());
            }
        }
        Err(self.stale_entity())
    }

    /// Query tmux for this session's windows and reconcile the registry.
    pub fn list_windows(&self) -> Result<Vec<Arc<Window>>> {
        let records = self
            .ctx
            .list::<WindowField>(&["list-windows", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;
        let ctx = self.ctx.clone();
        write(&self.windows).sync(records, |id, attrs| Window::new(ctx.clone(), id, attrs))
    }

    /// Windows as of the last listing, without querying tmux.
    pub fn windows(&self) -> Vec<Arc<Window>> {
        read(&self.windows).entries()
    }

    /// Find a window by identifier or name.
    pub fn find_window(&self, query: &str) -> Result<Option<Arc<Window>>> {
        Ok(self
            .list_windows()?
            .into_iter()
            .find(|w| w.id().as_str() == query || w.name().as_deref() == Some(query)))
    }

    /// The window tmux currently has focused in this session.
    pub fn attached_window(&self) -> Result<Arc<Window>> {
        let windows = self.list_windows()?;
        resolve_attached(self.id.as_str(), &windows, Window::is_active)
    }

    /// The focused pane of the focused window.
    pub fn attached_pane(&self) -> Result<Arc<Pane>> {
        self.attached_window()?.attached_pane()
    }

    /// Focus the window at `index` and return it freshly refreshed.
    ///
    /// The returned window is the same object a following
    /// [`Session::attached_window`] yields, unless tmux changed focus in
    /// between.
    pub fn select_window(&self, index: i64) -> Result<Arc<Window>> {
        let target = format!("{}:{index}", self.id);
        self.ctx.cmd(["select-window", "-t", target.as_str()])?;
        self.attached_window()
    }

    /// Rename the session and update the cached name.
    ///
    /// The cache holds `name` exactly as given. tmux itself replaces `.` and
    /// `:` in session names with `_`, so for such names the next
    /// [`Session::refresh`] reports the sanitized form.
    pub fn rename_session(&self, name: &str) -> Result<()> {
        self.ctx
            .cmd(["rename-session", "-t", self.id.as_str(), name])
            .map_err(|err| self.stale(err))?;
        write(&self.attrs).insert(SessionField::SessionName, name);
        info!(session = %self.id, name, "renamed session");
        Ok(())
    }

    /// Create a window with the given name.
    pub fn new_window(&self, name: &str) -> Result<Arc<Window>> {
        self.new_window_with(WindowOptions::named(name))
    }

    /// Create a window, register it and return it fully hydrated.
    pub fn new_window_with(&self, options: WindowOptions) -> Result<Arc<Window>> {
        let target = match options.index {
            Some(index) => format!("{}:{index}", self.id),
            None => format!("{}:", self.id),
        };
        let mut args = vec!["new-window", "-P", "-t", target.as_str()];
        if !options.attach {
            args.push("-d");
        }
        if let Some(name) = options.name.as_deref() {
            args.extend(["-n", name]);
        }
        if let Some(dir) = options.start_directory.as_deref() {
            args.extend(["-c", dir]);
        }

        let attrs = self
            .ctx
            .create::<WindowField>(&args, options.command.as_deref())
            .map_err(|err| self.stale(err))?;

        let ctx = self.ctx.clone();
        let window =
            write(&self.windows).resolve_or_create(attrs, |id, attrs| Window::new(ctx, id, attrs))?;
        info!(session = %self.id, window = %window.id(), name = ?window.name(), "created window");
        Ok(window)
    }

    /// Close the window at `index` and drop it from the registry.
    pub fn kill_window(&self, index: i64) -> Result<()> {
        let target = format!("{}:{index}", self.id);
        self.ctx.cmd(["kill-window", "-t", target.as_str()])?;
        self.list_windows()?;
        Ok(())
    }

    /// Close the session in tmux.
    pub fn kill(&self) -> Result<()> {
        self.ctx
            .cmd(["kill-session", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;
        info!(session = %self.id, "killed session");
        Ok(())
    }

    /// Set a session option.
    pub fn set_option(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        options::set_option(&self.ctx, self.scope(), key, value.into())
    }

    /// Value of one session option, `None` if unset on this session.
    pub fn show_option(&self, key: &str) -> Result<Option<Value>> {
        options::show_option(&self.ctx, self.scope(), key)
    }

    /// Every option set on this session.
    pub fn show_options(&self) -> Result<Options> {
        options::show_options(&self.ctx, self.scope())
    }

    fn scope(&self) -> OptionScope<'_> {
        OptionScope::session(self.id.as_str())
    }

    fn stale(&self, err: Error) -> Error {
        stale_if_missing(err, SessionId::KIND, self.id.as_str())
    }

    fn stale_entity(&self) -> Error {
        Error::StaleEntity {
            kind: SessionId::KIND,
            id: self.id.to_string(),
        }
    }
}

impl Entity for Session {
    type Field = SessionField;
    type Id = SessionId;

    fn id(&self) -> &SessionId {
        &self.id
    }

    fn update(&self, attrs: Attributes<SessionField>) {
        *write(&self.attrs) = attrs;
    }
}

/// Identity equality: same tmux session.
impl PartialEq for Session {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Session {}
