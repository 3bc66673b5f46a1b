//! Entity registry keyed by stable tmux identifiers.
//!
//! A registry belongs to exactly one parent (the server for sessions, a
//! session for windows, a window for panes). Refreshing a parent runs every
//! listed record through [`Registry::resolve_or_create`], so objects already
//! handed out to callers are updated in place rather than replaced.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use tmux_model_core::{Attributes, Error, Field, Result};

/// A session, window or pane mirrored from tmux.
pub trait Entity: Send + Sync {
    /// Attribute schema of this entity kind.
    type Field: Field;
    /// Stable identifier type.
    type Id: Clone + Eq + fmt::Display + fmt::Debug + FromStr<Err = Error>;

    /// Stable identifier.
    fn id(&self) -> &Self::Id;

    /// Replace the cached attributes with a fresh snapshot.
    fn update(&self, attrs: Attributes<Self::Field>);
}

/// Extract the stable identifier from a record.
pub fn record_id<E: Entity>(attrs: &Attributes<E::Field>) -> Result<E::Id> {
    let field = <E::Field as Field>::id_field();
    let raw = attrs
        .get_str(field)
        .ok_or_else(|| Error::Parse(format!("record is missing {}", field.name())))?;
    raw.parse()
}

/// Ordered collection of child entities.
pub struct Registry<E: Entity> {
    entries: Vec<Arc<E>>,
}

impl<E: Entity> Registry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Children in the order of the last listing.
    pub fn entries(&self) -> Vec<Arc<E>> {
        self.entries.clone()
    }

    /// Look up a child by identifier.
    pub fn get(&self, id: &E::Id) -> Option<Arc<E>> {
        self.entries.iter().find(|e| e.id() == id).cloned()
    }

    /// Number of registered children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no child is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Update the child with this record's identifier in place, or create
    /// and append a new one.
    pub fn resolve_or_create<C>(&mut self, attrs: Attributes<E::Field>, create: C) -> Result<Arc<E>>
    where
        C: FnOnce(E::Id, Attributes<E::Field>) -> E,
    {
        let id = record_id::<E>(&attrs)?;
        if let Some(existing) = self.get(&id) {
            existing.update(attrs);
            return Ok(existing);
        }
        let entity = Arc::new(create(id, attrs));
        self.entries.push(Arc::clone(&entity));
        Ok(entity)
    }

    /// Reconcile with a full listing: update or create every listed child,
    /// drop children no longer listed, and adopt the listing's order.
    pub fn sync<C>(&mut self, records: Vec<Attributes<E::Field>>, mut create: C) -> Result<Vec<Arc<E>>>
    where
        C: FnMut(E::Id, Attributes<E::Field>) -> E,
    {
        let mut next = Vec::with_capacity(records.len());
        for attrs in records {
            let id = record_id::<E>(&attrs)?;
            let entity = match self.get(&id) {
                Some(existing) => {
                    existing.update(attrs);
                    existing
                }
                None => Arc::new(create(id, attrs)),
            };
            if !next.iter().any(|e: &Arc<E>| e.id() == entity.id()) {
                next.push(entity);
            }
        }

        let kind = <E::Field as Field>::KIND;
        for dropped in self
            .entries
            .iter()
            .filter(|old| !next.iter().any(|e| e.id() == old.id()))
        {
            warn!(
                kind = %kind,
                id = %dropped.id(),
                "dropping entity no longer reported by tmux"
            );
        }

        self.entries = next;
        Ok(self.entries())
    }
}

impl<E: Entity> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| e.id()))
            .finish()
    }
}

// Lock poisoning only means another caller panicked mid-update; the cached
// attributes are replaced wholesale so the data is still coherent.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
