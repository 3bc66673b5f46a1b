//! # tmux-model-core
//!
//! Core types for tmux-model.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other tmux-model crates. It provides:
//!
//! - Stable identifiers for sessions, windows and panes
//! - The attribute schema of each entity kind
//! - Attribute snapshots and option values
//! - Error types
//! - Client configuration
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other tmux-model crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attributes;
pub mod config;
pub mod error;
pub mod ids;
pub mod schema;
pub mod value;

// Re-export commonly used types
pub use attributes::Attributes;
pub use config::{ClientConfig, LoggingSettings, TmuxSettings, DEFAULT_FIELD_SEPARATOR};
pub use error::{Error, Result};
pub use ids::{EntityKind, PaneId, SessionId, WindowId};
pub use schema::{format_string, Field, PaneField, SessionField, WindowField};
pub use value::Value;
