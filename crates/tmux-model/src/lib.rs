//! # tmux-model
//!
//! Object model over a running tmux server.
//!
//! This crate provides:
//! - Sessions, windows and panes as long-lived shared objects
//! - Per-server registries keeping one object per tmux identifier
//! - Session and window options
//! - Resolution of the focused window and pane
//!
//! ## Architecture
//!
//! Every entity holds a [`Context`] wrapping a [`CommandExecutor`]. Reads
//! always re-query tmux and update entities in place, so an `Arc` handed out
//! earlier keeps reflecting the server.
//!
//! ```no_run
//! use tmux_model::{ClientConfig, Server, SessionOptions};
//!
//! # fn main() -> tmux_model::Result<()> {
//! let server = Server::new(&ClientConfig::default());
//! let session = server.new_session(SessionOptions::named("work"))?;
//! let window = session.new_window("editor")?;
//! assert!(std::sync::Arc::ptr_eq(&window, &session.attached_window()?));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod attach;
pub mod context;
pub mod executor;
pub mod options;
pub mod pane;
pub mod parser;
pub mod registry;
pub mod server;
pub mod session;
pub mod testing;
pub mod window;

// Re-export commonly used types
pub use context::Context;
pub use executor::{classify_failure, CommandExecutor, CommandOutput, FailureKind, TmuxCommand};
pub use options::Options;
pub use pane::Pane;
pub use registry::{Entity, Registry};
pub use server::{Server, SessionOptions};
pub use session::{Session, WindowOptions};
pub use window::{SplitOptions, Window};

pub use tmux_model_core::{
    Attributes, ClientConfig, EntityKind, Error, Field, PaneField, PaneId, Result, SessionField,
    SessionId, TmuxSettings, Value, WindowField, WindowId, DEFAULT_FIELD_SEPARATOR,
};
