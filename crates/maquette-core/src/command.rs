//! Command contract and the engine-owned command wrapper
//!
//! Every document mutation in the editor is a [`Command`]: a payload
//! implementing [`CommandKind`] (defined by the edit layer / executors)
//! wrapped together with the state the history engine owns: the finalized
//! and validating flags, the orphaned-command list, and the opaque
//! execution-data slot an executor may cache between the forward and
//! inverse passes.
//!
//! There are situations in which undone commands need to be retained even
//! after other commands are performed. Consider:
//!
//! 1. Create model M
//! 2. Copy M
//! 3. Undo (skips Copy, undoes creation of M)
//! 4. Paste (pastes M, which is still in the clipboard)
//!
//! If the first two commands were simply discarded, a saved session would
//! hold only the paste; replaying it would fail, because M's creation is
//! gone. Commands whose effects may be referenced elsewhere therefore answer
//! [`CommandKind::should_be_added_as_orphan`], and when such a command is cut
//! from the redo branch it is moved, with its whole branch, into the
//! `orphaned_commands` list of the command that displaced it. Orphans are
//! saved with the session and re-executed (then undone) before their owner
//! when the session is replayed. If the same undo/redo pattern happens more
//! than once, newly orphaned commands are appended to the list.

use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Operations that can be applied to a Command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Execute or redo the command (forward effect)
    Do,
    /// Undo the command (inverse effect)
    Undo,
}

/// Contract implemented by every concrete command payload
///
/// Implementations live in the edit layer, next to the executor that knows
/// how to apply them. The `#[typetag::serde]` attribute makes boxed payloads
/// self-describing on disk, so the persisted log round-trips without a
/// central enum of command kinds.
///
/// `type_name` must return the same stable tag the executor registers its
/// execution function under, and should match the typetag serialization name.
#[typetag::serde]
pub trait CommandKind: fmt::Debug {
    /// Stable type tag used for dispatch registration
    fn type_name(&self) -> &'static str;

    /// Human-readable description, e.g. for undo/redo tooltips
    fn description(&self) -> String;

    /// False if the command has no effect for an Undo operation
    ///
    /// Effect-less commands are skipped during undo traversal, not visited
    /// as no-ops.
    fn has_undo_effect(&self) -> bool {
        true
    }

    /// False if the command has no effect for a Redo operation
    fn has_redo_effect(&self) -> bool {
        true
    }

    /// True if this command could affect other commands when undone and
    /// should therefore be retained as an orphan rather than discarded
    fn should_be_added_as_orphan(&self) -> bool {
        false
    }

    /// Access to the concrete payload for executor downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable access to the concrete payload for executor downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A single undoable/redoable document mutation
///
/// Owns its payload and the per-command state managed by the history engine.
/// The payload and the orphaned-command list are persisted; the finalized and
/// validating flags and the execution-data slot are runtime-only.
#[derive(Serialize, Deserialize)]
pub struct Command {
    /// Concrete payload (serialized with a typetag type tag)
    kind: Box<dyn CommandKind>,

    /// Orphaned commands owned by this command; usually empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    orphaned_commands: Vec<Command>,

    /// Set once when the command is queued for execution, never cleared
    #[serde(skip)]
    finalized: bool,

    /// True only while the command is being re-executed for session
    /// validation, so executors can suppress expensive or visible side
    /// effects
    #[serde(skip)]
    validating: bool,

    /// Opaque executor cache, written on the forward pass and read on the
    /// inverse pass; never persisted
    #[serde(skip)]
    exec_data: Option<Box<dyn Any>>,
}

impl Command {
    /// Wrap a payload into a command with empty engine state
    pub fn new(kind: impl CommandKind + 'static) -> Self {
        Self::from_kind(Box::new(kind))
    }

    /// Wrap an already-boxed payload
    pub fn from_kind(kind: Box<dyn CommandKind>) -> Self {
        Self {
            kind,
            orphaned_commands: Vec::new(),
            finalized: false,
            validating: false,
            exec_data: None,
        }
    }

    /// Stable type tag of the payload
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// Human-readable description of the payload
    pub fn description(&self) -> String {
        self.kind.description()
    }

    /// Whether undoing this command has any effect
    pub fn has_undo_effect(&self) -> bool {
        self.kind.has_undo_effect()
    }

    /// Whether redoing this command has any effect
    pub fn has_redo_effect(&self) -> bool {
        self.kind.has_redo_effect()
    }

    /// Whether this command must be retained as an orphan when truncated
    pub fn should_be_added_as_orphan(&self) -> bool {
        self.kind.should_be_added_as_orphan()
    }

    /// Borrow the payload as a trait object
    pub fn kind(&self) -> &dyn CommandKind {
        self.kind.as_ref()
    }

    /// Borrow the payload as a concrete type
    pub fn kind_as<T: Any>(&self) -> Option<&T> {
        self.kind.as_any().downcast_ref::<T>()
    }

    /// Mutably borrow the payload as a concrete type
    ///
    /// Executors may mutate the payload only before the command is
    /// finalized; the history engine does not enforce this, the finalized
    /// flag records it.
    pub fn kind_as_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.kind.as_any_mut().downcast_mut::<T>()
    }

    /// Mark the command contents as finalized
    ///
    /// Set by the manager when the command is added to the log. Lets
    /// executors distinguish interactive simulation from final processing.
    pub fn set_is_finalized(&mut self) {
        self.finalized = true;
    }

    /// Whether the command has been finalized
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Set or clear the validating flag (session-load replay)
    pub fn set_is_validating(&mut self, validating: bool) {
        self.validating = validating;
    }

    /// Whether the command is being executed only for validation
    pub fn is_validating(&self) -> bool {
        self.validating
    }

    /// Orphaned commands owned by this command, oldest first
    pub fn orphaned_commands(&self) -> &[Command] {
        &self.orphaned_commands
    }

    /// Append a batch of orphaned commands
    ///
    /// Existing orphans are kept; repeated undo/add patterns accumulate.
    pub fn add_orphaned_commands(&mut self, commands: Vec<Command>) {
        self.orphaned_commands.extend(commands);
    }

    /// Move the orphaned commands out, leaving the list empty
    pub fn take_orphaned_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.orphaned_commands)
    }

    /// Borrow the executor cache as a concrete type
    ///
    /// Returns `None` until [`set_exec_data`](Self::set_exec_data) is
    /// called, which an executor can use to detect the first execution.
    pub fn exec_data<T: Any>(&self) -> Option<&T> {
        self.exec_data.as_ref()?.downcast_ref::<T>()
    }

    /// Mutably borrow the executor cache as a concrete type
    pub fn exec_data_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.exec_data.as_mut()?.downcast_mut::<T>()
    }

    /// Store executor data in the command, replacing any previous value
    pub fn set_exec_data<T: Any>(&mut self, data: T) {
        self.exec_data = Some(Box::new(data));
    }

    /// Whether executor data has been stored
    pub fn has_exec_data(&self) -> bool {
        self.exec_data.is_some()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("kind", &self.kind)
            .field("orphaned_commands", &self.orphaned_commands)
            .field("finalized", &self.finalized)
            .field("validating", &self.validating)
            .field("has_exec_data", &self.exec_data.is_some())
            .finish()
    }
}
