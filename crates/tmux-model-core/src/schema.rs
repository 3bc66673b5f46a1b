//! Attribute schema for each entity kind.
//!
//! Every entity exposes a closed set of tmux format variables. The same enum
//! drives three things: the `-F` format string sent to tmux, the parsing of
//! each output record, and the typed `get` accessor on the entity.

use serde::{Deserialize, Serialize};

use crate::{EntityKind, Error, Result, Value};

/// A recognized attribute of one entity kind.
pub trait Field: Copy + Ord + std::fmt::Debug + Serialize + Send + Sync + 'static {
    /// Entity kind this schema describes.
    const KIND: EntityKind;

    /// Every field, in the order they appear in a record.
    fn all() -> &'static [Self];

    /// tmux format variable name, e.g. `window_index`.
    fn name(self) -> &'static str;

    /// Whether tmux always prints this field as an integer.
    fn is_integer(self) -> bool;

    /// The field holding the entity's stable identifier.
    fn id_field() -> Self;

    /// Look up a field by its format variable name.
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }

    /// Parse one raw value for this field.
    fn parse_value(self, raw: &str) -> Result<Value> {
        if !self.is_integer() {
            return Ok(Value::Str(raw.to_string()));
        }
        raw.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|err| Error::Parse(format!("invalid {} value '{raw}': {err}", self.name())))
    }
}

macro_rules! schema {
    (@int int) => { true };
    (@int) => { false };
    (
        $(#[$meta:meta])*
        $name:ident: $kind:expr, id = $id:ident {
            $($(#[$vmeta:meta])* $variant:ident => $fmt:literal $(, $int:ident)?;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl Field for $name {
            const KIND: EntityKind = $kind;

            fn all() -> &'static [Self] {
                &[$($name::$variant,)+]
            }

            fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $fmt,)+
                }
            }

            fn is_integer(self) -> bool {
                match self {
                    $($name::$variant => schema!(@int $($int)?),)+
                }
            }

            fn id_field() -> Self {
                $name::$id
            }
        }

        impl std::str::FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                <$name as Field>::from_name(s).ok_or_else(|| Error::UnknownField(s.to_string()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

schema! {
    /// Attributes reported for a session.
    SessionField: EntityKind::Session, id = SessionId {
        /// `$N` identifier
        SessionId => "session_id";
        /// Session name, renameable
        SessionName => "session_name";
        /// Number of windows
        SessionWindows => "session_windows", int;
        /// Number of clients attached
        SessionAttached => "session_attached", int;
        /// Creation time (unix seconds)
        SessionCreated => "session_created", int;
    }
}

schema! {
    /// Attributes reported for a window.
    WindowField: EntityKind::Window, id = WindowId {
        /// Owning session identifier
        SessionId => "session_id";
        /// `@N` identifier
        WindowId => "window_id";
        /// Position in the session, renumbered by tmux
        WindowIndex => "window_index", int;
        /// Window name
        WindowName => "window_name";
        /// 1 if this is the session's current window
        WindowActive => "window_active", int;
        /// Number of panes
        WindowPanes => "window_panes", int;
        /// Layout description string
        WindowLayout => "window_layout";
        /// Width in cells
        WindowWidth => "window_width", int;
        /// Height in cells
        WindowHeight => "window_height", int;
    }
}

schema! {
    /// Attributes reported for a pane.
    PaneField: EntityKind::Pane, id = PaneId {
        /// Owning session identifier
        SessionId => "session_id";
        /// Owning window identifier
        WindowId => "window_id";
        /// `%N` identifier
        PaneId => "pane_id";
        /// Position in the window
        PaneIndex => "pane_index", int;
        /// 1 if this is the window's current pane
        PaneActive => "pane_active", int;
        /// Command running in the pane
        PaneCurrentCommand => "pane_current_command";
        /// Working directory of the pane
        PaneCurrentPath => "pane_current_path";
        /// PID of the first process
        PanePid => "pane_pid", int;
        /// Pane title
        PaneTitle => "pane_title";
        /// Width in cells
        PaneWidth => "pane_width", int;
        /// Height in cells
        PaneHeight => "pane_height", int;
    }
}

/// Build the `-F` format string for a schema, fields joined by `separator`.
pub fn format_string<F: Field>(separator: &str) -> String {
    F::all()
        .iter()
        .map(|field| format!("#{{{}}}", field.name()))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_string() {
        let fmt = format_string::<SessionField>("|");
        assert_eq!(
            fmt,
            "#{session_id}|#{session_name}|#{session_windows}|#{session_attached}|#{session_created}"
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            WindowField::from_name("window_index"),
            Some(WindowField::WindowIndex)
        );
        assert_eq!(WindowField::from_name("pane_index"), None);
        assert_eq!(
            "pane_current_command".parse::<PaneField>().unwrap(),
            PaneField::PaneCurrentCommand
        );
        assert!(matches!(
            "bogus".parse::<PaneField>(),
            Err(Error::UnknownField(_))
        ));
    }

    #[test]
    fn test_id_fields() {
        assert_eq!(SessionField::id_field(), SessionField::SessionId);
        assert_eq!(WindowField::id_field(), WindowField::WindowId);
        assert_eq!(PaneField::id_field(), PaneField::PaneId);
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = PaneField::all().iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), PaneField::all().len());
    }

    #[test]
    fn test_parse_integer_field() {
        assert_eq!(
            WindowField::WindowIndex.parse_value("3").unwrap(),
            Value::Int(3)
        );
        assert!(WindowField::WindowIndex.parse_value("x").is_err());
    }

    #[test]
    fn test_text_fields_never_coerced() {
        assert_eq!(
            WindowField::WindowName.parse_value("42").unwrap(),
            Value::Str("42".to_string())
        );
    }

    #[test]
    fn test_field_serializes_as_format_name() {
        let json = serde_json::to_string(&PaneField::PaneCurrentPath).unwrap();
        assert_eq!(json, "\"pane_current_path\"");
    }
}
