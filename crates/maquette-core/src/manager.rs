//! Command dispatch and undo/redo driving
//!
//! [`CommandManager`] owns the single live [`CommandList`] of the session,
//! maps command type names to registered execution functions, and drives
//! Do/Undo/Redo against the log. It also implements the validation replay
//! used when a saved session is loaded: live state is rebuilt by
//! re-executing the persisted log (orphan branches included) instead of
//! deserializing a state snapshot.

use std::collections::HashMap;

use maquette_core_types::SessionState;
use tracing::{debug, info};

use crate::command::{Command, Op};
use crate::list::CommandList;

/// Execution function registered for one command type
///
/// Invoked with the command and the operation (`Op::Do` for execute/redo,
/// `Op::Undo` for undo). Registered once per type by its executor at
/// startup.
pub type CommandFn = Box<dyn Fn(&mut Command, Op)>;

/// Auxiliary hook run just before a Do/Redo or just after an Undo
pub type AuxFn = Box<dyn Fn(&Command)>;

/// Determines how commands are processed, undone, and redone
///
/// Exactly one manager (and one log) exists per session; collaborators
/// receive it as an explicit context value. Reloading a session rebuilds the
/// log's contents in place, so references to "the" log stay valid.
pub struct CommandManager {
    /// Registry mapping command type name to the function that executes it
    registry: HashMap<String, CommandFn>,

    /// Hook invoked just before doing or redoing a command
    pre_do_func: Option<AuxFn>,

    /// Hook invoked just after undoing a command
    post_undo_func: Option<AuxFn>,

    /// The session's single live command log
    command_list: CommandList,

    /// True for the duration of a `process_command_list` pass
    validating: bool,
}

impl CommandManager {
    /// Create a manager with an empty registry and a fresh log
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            pre_do_func: None,
            post_undo_func: None,
            command_list: CommandList::new(),
            validating: false,
        }
    }

    // ------------------------------------------------------------------
    // Registration and initialization
    // ------------------------------------------------------------------

    /// Register the execution function for the named command type
    ///
    /// One-time registration at startup; registering the same type twice is
    /// a programming error and panics.
    pub fn register_function(
        &mut self,
        type_name: impl Into<String>,
        func: impl Fn(&mut Command, Op) + 'static,
    ) {
        let type_name = type_name.into();
        let previous = self.registry.insert(type_name.clone(), Box::new(func));
        assert!(
            previous.is_none(),
            "execution function for command type '{type_name}' registered twice"
        );
    }

    /// Set the hook invoked just before doing or redoing a command
    pub fn set_pre_do_func(&mut self, func: impl Fn(&Command) + 'static) {
        self.pre_do_func = Some(Box::new(func));
    }

    /// Set the hook invoked just after undoing a command
    pub fn set_post_undo_func(&mut self, func: impl Fn(&Command) + 'static) {
        self.post_undo_func = Some(Box::new(func));
    }

    /// Reset the command log to its default (empty) state
    pub fn reset_command_list(&mut self) {
        self.command_list.reset();
    }

    // ------------------------------------------------------------------
    // Command storage and execution
    // ------------------------------------------------------------------

    /// The session's command log
    pub fn command_list(&self) -> &CommandList {
        &self.command_list
    }

    /// Mutable access to the session's command log
    pub fn command_list_mut(&mut self) -> &mut CommandList {
        &mut self.command_list
    }

    /// The session state stored in the log's metadata record
    pub fn session_state(&self) -> &SessionState {
        let app_info = self.command_list.app_info().expect("command list has no app_info");
        &app_info.session_state
    }

    /// Mutable access to the session state in the log's metadata record
    pub fn session_state_mut(&mut self) -> &mut SessionState {
        let app_info = self
            .command_list
            .app_info_mut()
            .expect("command list has no app_info");
        &mut app_info.session_state
    }

    /// Whether a session-load replay is in progress
    pub fn is_validating(&self) -> bool {
        self.validating
    }

    /// Add the command to the log and execute it
    ///
    /// The only path through which a freshly created command takes effect:
    /// the log appends it (with any branch truncation / orphan capture), the
    /// command is finalized, and its registered function runs with
    /// [`Op::Do`].
    pub fn add_and_do(&mut self, mut command: Command) {
        debug!(command = %command.description(), "add_and_do");
        command.set_is_finalized();
        self.command_list.add_command(command);
        let tip = self.command_list.current_index() - 1;
        self.dispatch(tip, Op::Do);
    }

    /// Whether there is a command that can be undone
    pub fn can_undo(&self) -> bool {
        self.command_list.can_undo()
    }

    /// Whether there is a command that can be redone
    pub fn can_redo(&self) -> bool {
        self.command_list.can_redo()
    }

    /// The command that would be undone next; panics if there is none
    pub fn last_command(&self) -> &Command {
        self.command_list.command_to_undo()
    }

    /// Undo the last executed command; panics if there is none
    pub fn undo(&mut self) {
        let index = self.command_list.process_undo_index();
        debug!(command = %self.command_list.command(index).description(), "undo");
        self.dispatch(index, Op::Undo);
    }

    /// Undo the last executed command and purge it as if it never happened
    ///
    /// May be called only when the command to undo is the tip of the log
    /// (the usual case for retracting a just-added trial command).
    pub fn undo_and_purge(&mut self) {
        self.undo();
        self.command_list.remove_last_command();
    }

    /// Redo the last undone command; panics if there is none
    pub fn redo(&mut self) {
        let index = self.command_list.process_redo_index();
        debug!(command = %self.command_list.command(index).description(), "redo");
        self.dispatch(index, Op::Do);
    }

    /// Execute the command's forward effect without touching the log
    ///
    /// Used during interaction (and by scripted input) to cause the effect
    /// of a command before it is finalized; the same command can later be
    /// passed to [`add_and_do`](Self::add_and_do).
    pub fn simulate_do(&mut self, command: &mut Command) {
        run(
            &self.registry,
            &self.pre_do_func,
            &self.post_undo_func,
            command,
            Op::Do,
        );
    }

    // ------------------------------------------------------------------
    // Session-load replay
    // ------------------------------------------------------------------

    /// Rebuild live state by replaying a loaded command log
    ///
    /// The manager's own log is reset and every command in `loaded` is
    /// re-executed through the normal [`add_and_do`](Self::add_and_do) path,
    /// with per-command orphan branches replayed (and then undone) first so
    /// their effects are validated without remaining visible. Afterwards the
    /// log is unwound to the cursor saved in `loaded`, and the metadata
    /// record is copied over verbatim.
    ///
    /// Assumes `loaded` has passed [`CommandList::validate`]; structurally
    /// invalid input is rejected by the session layer before replay.
    pub fn process_command_list(&mut self, loaded: CommandList) {
        let (app_info, commands, saved_index) = loaded.into_parts();
        info!(
            command_count = commands.len(),
            saved_index, "replaying loaded command list"
        );

        self.command_list.reset();
        self.validating = true;

        for command in commands {
            self.execute_for_validation(command);
        }

        // Reproduce how far the user had undone at save time.
        while self.command_list.current_index() > saved_index {
            self.undo();
        }

        if let Some(info) = app_info {
            self.command_list.set_app_info(info);
        }
        self.validating = false;
    }

    /// Replay one command (and its orphan branch) for validation
    ///
    /// The command's orphan list is drained up front: the orphans are
    /// replayed recursively, then each one with an undo effect is undone in
    /// reverse order. Appending the owner afterwards truncates the undone
    /// orphans out of the live log again, re-attaching them to the owner.
    /// The list must be drained first or repeated loads would accumulate
    /// duplicates.
    fn execute_for_validation(&mut self, mut command: Command) {
        let orphans = command.take_orphaned_commands();
        if !orphans.is_empty() {
            let undo_count = orphans.iter().filter(|c| c.has_undo_effect()).count();
            for orphan in orphans {
                self.execute_for_validation(orphan);
            }
            for _ in 0..undo_count {
                self.undo();
            }
        }

        command.set_is_validating(true);
        self.add_and_do(command);
        let tip = self.command_list.current_index() - 1;
        self.command_list.command_mut(tip).set_is_validating(false);
    }

    /// Run the registered function for the command at `index`
    fn dispatch(&mut self, index: usize, op: Op) {
        let Self {
            registry,
            pre_do_func,
            post_undo_func,
            command_list,
            ..
        } = self;
        let command = command_list.command_mut(index);
        run(registry, pre_do_func, post_undo_func, command, op);
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared dispatch body for logged and simulated execution
fn run(
    registry: &HashMap<String, CommandFn>,
    pre_do_func: &Option<AuxFn>,
    post_undo_func: &Option<AuxFn>,
    command: &mut Command,
    op: Op,
) {
    let func = registry.get(command.type_name()).unwrap_or_else(|| {
        panic!(
            "no execution function registered for command type '{}'",
            command.type_name()
        )
    });
    if op == Op::Do {
        if let Some(pre) = pre_do_func {
            pre(command);
        }
    }
    func(command, op);
    if op == Op::Undo {
        if let Some(post) = post_undo_func {
            post(command);
        }
    }
}
