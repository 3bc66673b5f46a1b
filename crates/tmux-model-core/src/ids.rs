//! Identifier types for tmux entities.
//!
//! tmux assigns every session, window and pane a stable identifier that
//! survives renames and renumbering: `$N` for sessions, `@N` for windows and
//! `%N` for panes. These are the only keys used for identity. Indexes are
//! positional and only ever used to address a target.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Kind of entity in the tmux hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Top-level session
    Session,
    /// Window inside a session
    Window,
    /// Pane inside a window
    Pane,
}

impl EntityKind {
    /// Prefix tmux puts in front of identifiers of this kind.
    pub fn id_prefix(self) -> char {
        match self {
            EntityKind::Session => '$',
            EntityKind::Window => '@',
            EntityKind::Pane => '%',
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Session => "session",
            EntityKind::Window => "window",
            EntityKind::Pane => "pane",
        };
        f.write_str(name)
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Entity kind this identifier belongs to.
            pub const KIND: EntityKind = $kind;

            /// Parse an identifier as printed by tmux, prefix included.
            pub fn parse(raw: &str) -> Result<Self> {
                let raw = raw.trim();
                let digits = raw
                    .strip_prefix(Self::KIND.id_prefix())
                    .ok_or_else(|| Error::Parse(format!("invalid {} id: '{raw}'", Self::KIND)))?;
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::Parse(format!("invalid {} id: '{raw}'", Self::KIND)));
                }
                Ok(Self(raw.to_string()))
            }

            /// The identifier as tmux prints it, usable as a `-t` target.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(
    /// Stable tmux session identifier (`$N`).
    SessionId,
    EntityKind::Session
);

entity_id!(
    /// Stable tmux window identifier (`@N`).
    WindowId,
    EntityKind::Window
);

entity_id!(
    /// Stable tmux pane identifier (`%N`).
    PaneId,
    EntityKind::Pane
);
