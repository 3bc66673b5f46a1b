//! Resolution of the attached (focused) child at one level of the hierarchy.
//!
//! Focus is never stored: tmux may move it at any time, so callers refresh
//! the child collection first and resolve against that fresh listing.

use std::sync::Arc;

use tmux_model_core::{Error, Field, Result};

use crate::registry::Entity;

/// Pick the single child tmux flags as active.
///
/// Zero or several active children means the assumption about tmux state
/// did not hold, reported as [`Error::InvariantViolation`].
pub(crate) fn resolve_attached<E, P>(parent: &str, children: &[Arc<E>], is_active: P) -> Result<Arc<E>>
where
    E: Entity,
    P: Fn(&E) -> bool,
{
    let kind = <E::Field as Field>::KIND;
    let mut active = children.iter().filter(|child| is_active(child));
    match (active.next(), active.next()) {
        (Some(child), None) => Ok(Arc::clone(child)),
        (None, _) => Err(Error::InvariantViolation(format!(
            "no attached {kind} in {parent}"
        ))),
        (Some(_), Some(_)) => {
            let count = children.iter().filter(|child| is_active(child)).count();
            Err(Error::InvariantViolation(format!(
                "{count} attached {kind}s in {parent}"
            )))
        }
    }
}
