//! The ordered command log
//!
//! [`CommandList`] maintains the commands that have been executed, a cursor
//! separating applied history from the transient redo branch, and the
//! save-point baseline used for "are there unsaved changes" queries. It is
//! the single place where branch truncation (and orphan capture) happens.

use maquette_core_types::AppInfo;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::command::Command;
use crate::errors::{MaquetteError, Result};

/// Ordered, append-mostly log of commands with undo/redo traversal
///
/// Commands `[0, current_index)` are applied; commands
/// `[current_index, len)` exist only transiently as the redo branch and are
/// discarded (or migrated into the new tip's orphan list) the moment a new
/// command is appended.
///
/// The serde representation is the persisted form of the log: the `app_info`
/// metadata record, the command list (orphans nested inside their owners),
/// and the cursor. The save-point baseline is runtime-only. The concrete
/// bytes belong to the session layer; this type only guarantees the record
/// round-trips and can be structurally [`validate`](Self::validate)d.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandList {
    /// Application/session metadata record
    ///
    /// `None` only on a deserialized record that omitted it, which
    /// [`validate`](Self::validate) rejects. [`reset`](Self::reset)
    /// guarantees a default record.
    #[serde(default)]
    app_info: Option<AppInfo>,

    /// All commands, including undone ones still on the redo branch
    #[serde(default)]
    commands: Vec<Command>,

    /// Cursor: commands below it are applied
    #[serde(default)]
    current_index: usize,

    /// Value of `current_index` at the last `clear_changes()` call
    #[serde(skip)]
    index_at_clear: usize,
}

impl CommandList {
    /// Create an empty list with a default metadata record
    pub fn new() -> Self {
        let mut list = Self {
            app_info: None,
            commands: Vec::new(),
            current_index: 0,
            index_at_clear: 0,
        };
        list.reset();
        list
    }

    /// Reset for a new session
    ///
    /// Clears the commands and both indices and installs a default
    /// [`AppInfo`] record.
    pub fn reset(&mut self) {
        self.app_info = Some(AppInfo::new());
        self.commands.clear();
        self.current_index = 0;
        self.index_at_clear = 0;
    }

    /// The metadata record, if present
    pub fn app_info(&self) -> Option<&AppInfo> {
        self.app_info.as_ref()
    }

    /// Mutable access to the metadata record, if present
    pub fn app_info_mut(&mut self) -> Option<&mut AppInfo> {
        self.app_info.as_mut()
    }

    /// Replace the metadata record
    pub fn set_app_info(&mut self, app_info: AppInfo) {
        self.app_info = Some(app_info);
    }

    /// Append a command as the new tip of the applied history
    ///
    /// If a redo branch exists it is cut here: when any command in the
    /// branch answers `should_be_added_as_orphan()`, the whole branch moves,
    /// in original order, into `command`'s orphan list; otherwise the branch
    /// is dropped. Either way the cursor ends one past the appended command.
    pub fn add_command(&mut self, mut command: Command) {
        if self.current_index < self.commands.len() {
            let branch: Vec<Command> = self.commands.drain(self.current_index..).collect();
            if branch.iter().any(Command::should_be_added_as_orphan) {
                debug!(
                    count = branch.len(),
                    owner = %command.description(),
                    "orphaning truncated redo branch"
                );
                command.add_orphaned_commands(branch);
            }
        }
        self.commands.push(command);
        self.current_index = self.commands.len();
    }

    /// Total number of commands, including undone ones
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// The cursor separating applied commands from the redo branch
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The indexed command; panics on a bad index
    pub fn command(&self, index: usize) -> &Command {
        assert!(
            index < self.commands.len(),
            "command index {index} out of range ({} commands)",
            self.commands.len()
        );
        &self.commands[index]
    }

    /// Mutable access to the indexed command; panics on a bad index
    pub fn command_mut(&mut self, index: usize) -> &mut Command {
        assert!(
            index < self.commands.len(),
            "command index {index} out of range ({} commands)",
            self.commands.len()
        );
        &mut self.commands[index]
    }

    /// Whether a command with an undo effect exists below the cursor
    pub fn can_undo(&self) -> bool {
        self.next_undo_index().is_some()
    }

    /// Whether a command with a redo effect exists at or above the cursor
    pub fn can_redo(&self) -> bool {
        self.next_redo_index().is_some()
    }

    /// Peek at the next command to undo; panics if `can_undo()` is false
    pub fn command_to_undo(&self) -> &Command {
        let index = self.next_undo_index().expect("command_to_undo: nothing to undo");
        &self.commands[index]
    }

    /// Peek at the next command to redo; panics if `can_redo()` is false
    pub fn command_to_redo(&self) -> &Command {
        let index = self.next_redo_index().expect("command_to_redo: nothing to redo");
        &self.commands[index]
    }

    /// Move the cursor back over the next command with an undo effect and
    /// return that command
    ///
    /// Commands without an undo effect are passed over in the same step,
    /// never visited individually. Panics if `can_undo()` is false.
    pub fn process_undo(&mut self) -> &Command {
        let index = self.process_undo_index();
        &self.commands[index]
    }

    /// Move the cursor one past the next command with a redo effect and
    /// return that command
    ///
    /// Panics if `can_redo()` is false.
    pub fn process_redo(&mut self) -> &Command {
        let index = self.process_redo_index();
        &self.commands[index]
    }

    /// Cursor-moving undo step returning the index of the undone command
    pub(crate) fn process_undo_index(&mut self) -> usize {
        let index = self.next_undo_index().expect("process_undo: nothing to undo");
        self.current_index = index;
        index
    }

    /// Cursor-moving redo step returning the index of the redone command
    pub(crate) fn process_redo_index(&mut self) -> usize {
        let index = self.next_redo_index().expect("process_redo: nothing to redo");
        self.current_index = index + 1;
        index
    }

    /// Pop the tail command
    ///
    /// Valid only when the tip is the command that was just undone (caller
    /// responsibility; used by `undo_and_purge`). Panics on an empty list.
    pub fn remove_last_command(&mut self) {
        assert!(!self.commands.is_empty(), "remove_last_command: empty list");
        self.commands.pop();
        self.current_index = self.commands.len();
    }

    /// Record the current cursor as the save point
    pub fn clear_changes(&mut self) {
        self.index_at_clear = self.current_index;
    }

    /// Whether any commands were added since the last `clear_changes()`
    pub fn has_new_commands(&self) -> bool {
        self.index_at_clear < self.commands.len()
    }

    /// Whether the session differs from the last save point
    ///
    /// Rewinding all the way to `current_index == 0` always reports no
    /// changes, independent of the stored baseline. Intentional edge case;
    /// keep as is.
    pub fn has_changes(&self) -> bool {
        self.current_index > 0 && self.current_index != self.index_at_clear
    }

    /// Drop the redo branch (the commands after the cursor)
    pub fn clear_orphaned_commands(&mut self) {
        self.commands.truncate(self.current_index);
    }

    /// Structural validity of a (typically just-deserialized) record
    ///
    /// Checks that the metadata record is present and the cursor fits the
    /// command list. Replay assumes this has passed.
    pub fn validate(&self) -> Result<()> {
        if self.app_info.is_none() {
            return Err(MaquetteError::MissingAppInfo);
        }
        if self.current_index > self.commands.len() {
            return Err(MaquetteError::InvalidCurrentIndex {
                current_index: self.current_index,
                command_count: self.commands.len(),
            });
        }
        Ok(())
    }

    /// Decompose a loaded record for replay
    pub(crate) fn into_parts(self) -> (Option<AppInfo>, Vec<Command>, usize) {
        (self.app_info, self.commands, self.current_index)
    }

    /// Index of the next command to undo, skipping those without an undo
    /// effect
    fn next_undo_index(&self) -> Option<usize> {
        self.commands[..self.current_index]
            .iter()
            .rposition(Command::has_undo_effect)
    }

    /// Index of the next command to redo, skipping those without a redo
    /// effect
    fn next_redo_index(&self) -> Option<usize> {
        self.commands[self.current_index..]
            .iter()
            .position(Command::has_redo_effect)
            .map(|offset| self.current_index + offset)
    }
}

impl Default for CommandList {
    fn default() -> Self {
        Self::new()
    }
}
