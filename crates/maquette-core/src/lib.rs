//! Maquette Core - command history and replay engine
//!
//! Every document mutation in the editor is a discrete, serializable
//! command. This crate provides:
//! - The [`CommandKind`] contract and the engine-owned [`Command`] wrapper
//! - [`CommandList`]: the ordered log with undo/redo traversal, branch
//!   truncation, and orphan preservation
//! - [`CommandManager`]: type-keyed execution dispatch plus the validation
//!   replay that rebuilds live state from a persisted log on session load
//!
//! Strictly single-threaded and synchronous: one manager, one log, one
//! mutator. Ownership is singly rooted: the log owns its commands, each
//! command owns its orphan list.

pub mod command;
pub mod errors;
pub mod list;
pub mod logging;
pub mod manager;

// Re-export commonly used types
pub use command::{Command, CommandKind, Op};
pub use errors::{MaquetteError, Result};
pub use list::CommandList;
pub use manager::{AuxFn, CommandFn, CommandManager};
pub use maquette_core_types::{AppInfo, SessionState};
