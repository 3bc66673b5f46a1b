//! Pane objects.

use std::sync::RwLock;

use tracing::debug;

use tmux_model_core::{Attributes, Error, PaneField, PaneId, Result, Value, WindowId};

use crate::context::Context;
use crate::executor::stale_if_missing;
use crate::registry::{read, record_id, write, Entity};

/// A single terminal viewport inside a window.
#[derive(Debug)]
pub struct Pane {
    ctx: Context,
    id: PaneId,
    attrs: RwLock<Attributes<PaneField>>,
}

impl Pane {
    pub(crate) fn new(ctx: Context, id: PaneId, attrs: Attributes<PaneField>) -> Self {
        Self {
            ctx,
            id,
            attrs: RwLock::new(attrs),
        }
    }

    /// Stable pane identifier (`%N`).
    pub fn id(&self) -> &PaneId {
        &self.id
    }

    /// Cached value of one attribute.
    pub fn get(&self, field: PaneField) -> Option<Value> {
        read(&self.attrs).get(field).cloned()
    }

    /// Copy of all cached attributes.
    pub fn snapshot(&self) -> Attributes<PaneField> {
        read(&self.attrs).clone()
    }

    /// Position within the window, as of the last refresh.
    pub fn index(&self) -> Option<i64> {
        read(&self.attrs).get_int(PaneField::PaneIndex)
    }

    /// Window currently holding this pane, as of the last refresh.
    pub fn window_id(&self) -> Option<WindowId> {
        read(&self.attrs)
            .get_str(PaneField::WindowId)
            .and_then(|raw| raw.parse().ok())
    }

    /// Command running in the pane, as of the last refresh.
    pub fn current_command(&self) -> Option<String> {
        read(&self.attrs)
            .get_str(PaneField::PaneCurrentCommand)
            .map(str::to_string)
    }

    /// Whether the last refresh saw this pane focused in its window.
    pub(crate) fn is_active(&self) -> bool {
        read(&self.attrs)
            .get(PaneField::PaneActive)
            .is_some_and(Value::as_flag)
    }

    /// Re-read this pane's attributes from tmux.
    pub fn refresh(&self) -> Result<()> {
        let records = self
            .ctx
            .list::<PaneField>(&["list-panes", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;

        for attrs in records {
            if record_id::<Self>(&attrs)? == self.id {
                self.update(attrs);
                return Ok(());
            }
        }
        Err(self.stale_entity())
    }

    /// Type `keys` into the pane, optionally followed by Enter.
    pub fn send_keys(&self, keys: &str, enter: bool) -> Result<()> {
        debug!(pane = %self.id, keys, enter, "sending keys");
        if !keys.is_empty() {
            self.ctx
                .cmd(["send-keys", "-t", self.id.as_str(), "-l", keys])
                .map_err(|err| self.stale(err))?;
        }
        if enter {
            self.ctx
                .cmd(["send-keys", "-t", self.id.as_str(), "Enter"])
                .map_err(|err| self.stale(err))?;
        }
        Ok(())
    }

    /// Make this the focused pane of its window.
    pub fn select(&self) -> Result<()> {
        self.ctx
            .cmd(["select-pane", "-t", self.id.as_str()])
            .map_err(|err| self.stale(err))?;
        Ok(())
    }

    fn stale(&self, err: Error) -> Error {
        stale_if_missing(err, PaneId::KIND, self.id.as_str())
    }

    fn stale_entity(&self) -> Error {
        Error::StaleEntity {
            kind: PaneId::KIND,
            id: self.id.to_string(),
        }
    }
}

impl Entity for Pane {
    type Field = PaneField;
    type Id = PaneId;

    fn id(&self) -> &PaneId {
        &self.id
    }

    fn update(&self, attrs: Attributes<PaneField>) {
        *write(&self.attrs) = attrs;
    }
}

/// Identity equality: same tmux pane.
impl PartialEq for Pane {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Pane {}
