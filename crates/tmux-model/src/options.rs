//! Option management scoped to a session or window.
//!
//! Keys are passed through to tmux untouched; tmux alone decides whether a
//! key exists. A rejection surfaces as [`Error::InvalidOption`] so callers can
//! tell a bad key from a failed command.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::Serialize;
use tracing::debug;

use tmux_model_core::{EntityKind, Error, Result, Value};

use crate::context::Context;
use crate::executor::{invalid_option_if_rejected, stale_if_missing};
use crate::parser::{parse_option_line, parse_options};

/// Entity an option applies to.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OptionScope<'a> {
    kind: EntityKind,
    target: &'a str,
}

impl<'a> OptionScope<'a> {
    pub(crate) fn session(target: &'a str) -> Self {
        Self {
            kind: EntityKind::Session,
            target,
        }
    }

    pub(crate) fn window(target: &'a str) -> Self {
        Self {
            kind: EntityKind::Window,
            target,
        }
    }

    fn set_command(&self) -> &'static str {
        match self.kind {
            EntityKind::Window => "set-window-option",
            _ => "set-option",
        }
    }

    fn show_command(&self) -> &'static str {
        match self.kind {
            EntityKind::Window => "show-window-options",
            _ => "show-options",
        }
    }

    fn classify(&self, err: Error, key: Option<&str>) -> Error {
        let err = match key {
            Some(key) => invalid_option_if_rejected(err, key),
            None => err,
        };
        stale_if_missing(err, self.kind, self.target)
    }
}

/// Options set at one scope, keyed by option name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Options {
    values: BTreeMap<String, Value>,
}

impl Options {
    /// Value of one option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether the option is set at this scope.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Options in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no option is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<&str> for Options {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        &self.values[key]
    }
}

pub(crate) fn set_option(
    ctx: &Context,
    scope: OptionScope<'_>,
    key: &str,
    value: Value,
) -> Result<()> {
    debug!(scope = scope.target, key, %value, "setting option");
    ctx.cmd([
        scope.set_command().to_string(),
        "-t".to_string(),
        scope.target.to_string(),
        key.to_string(),
        value.to_arg(),
    ])
    .map_err(|err| scope.classify(err, Some(key)))?;
    Ok(())
}

pub(crate) fn show_option(ctx: &Context, scope: OptionScope<'_>, key: &str) -> Result<Option<Value>> {
    let lines = ctx
        .cmd([scope.show_command(), "-t", scope.target, key])
        .map_err(|err| scope.classify(err, Some(key)))?;

    // An option unset at this scope prints nothing.
    Ok(lines
        .iter()
        .filter_map(|line| parse_option_line(line))
        .find(|(name, _)| name == key)
        .map(|(_, value)| value))
}

pub(crate) fn show_options(ctx: &Context, scope: OptionScope<'_>) -> Result<Options> {
    let lines = ctx
        .cmd([scope.show_command(), "-t", scope.target])
        .map_err(|err| scope.classify(err, None))?;
    Ok(Options {
        values: parse_options(&lines),
    })
}
