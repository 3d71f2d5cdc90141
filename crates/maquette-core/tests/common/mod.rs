use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use maquette_core::{Command, CommandKind, CommandManager, Op};
use serde::{Deserialize, Serialize};

/// Minimal command payload for exercising the history engine
///
/// Carries a name for trace assertions and overridable effect flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCommand {
    pub name: String,
    pub undo_effect: bool,
    pub redo_effect: bool,
    pub orphan: bool,
}

impl TestCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            undo_effect: true,
            redo_effect: true,
            orphan: false,
        }
    }
}

#[typetag::serde]
impl CommandKind for TestCommand {
    fn type_name(&self) -> &'static str {
        "TestCommand"
    }

    fn description(&self) -> String {
        format!("Test command {}", self.name)
    }

    fn has_undo_effect(&self) -> bool {
        self.undo_effect
    }

    fn has_redo_effect(&self) -> bool {
        self.redo_effect
    }

    fn should_be_added_as_orphan(&self) -> bool {
        self.orphan
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Wrap a named TestCommand
#[allow(dead_code)]
pub fn test_cmd(name: &str) -> Command {
    Command::new(TestCommand::new(name))
}

/// Wrap a TestCommand with no undo/redo effect
#[allow(dead_code)]
pub fn effectless_cmd(name: &str) -> Command {
    let mut kind = TestCommand::new(name);
    kind.undo_effect = false;
    kind.redo_effect = false;
    Command::new(kind)
}

/// Wrap a TestCommand that must be retained as an orphan when truncated
#[allow(dead_code)]
pub fn orphanable_cmd(name: &str) -> Command {
    let mut kind = TestCommand::new(name);
    kind.orphan = true;
    Command::new(kind)
}

/// Name of the TestCommand at a list index
#[allow(dead_code)]
pub fn name_of(cmd: &Command) -> String {
    cmd.kind_as::<TestCommand>().unwrap().name.clone()
}

/// Records the TestCommand dispatch order for trace assertions
///
/// Installs an execution function that appends the command name to the
/// do or undo trace, along with the per-command validating flag seen
/// during Do dispatch.
#[allow(dead_code)]
pub struct Recorder {
    do_names: Rc<RefCell<Vec<String>>>,
    undo_names: Rc<RefCell<Vec<String>>>,
    do_validating: Rc<RefCell<Vec<bool>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn install(manager: &mut CommandManager) -> Self {
        let recorder = Self {
            do_names: Rc::new(RefCell::new(Vec::new())),
            undo_names: Rc::new(RefCell::new(Vec::new())),
            do_validating: Rc::new(RefCell::new(Vec::new())),
        };
        let do_names = Rc::clone(&recorder.do_names);
        let undo_names = Rc::clone(&recorder.undo_names);
        let do_validating = Rc::clone(&recorder.do_validating);
        manager.register_function("TestCommand", move |cmd: &mut Command, op: Op| {
            let name = cmd.kind_as::<TestCommand>().unwrap().name.clone();
            match op {
                Op::Do => {
                    do_names.borrow_mut().push(name);
                    do_validating.borrow_mut().push(cmd.is_validating());
                }
                Op::Undo => undo_names.borrow_mut().push(name),
            }
        });
        recorder
    }

    pub fn do_names(&self) -> Vec<String> {
        self.do_names.borrow().clone()
    }

    pub fn undo_names(&self) -> Vec<String> {
        self.undo_names.borrow().clone()
    }

    pub fn do_validating(&self) -> Vec<bool> {
        self.do_validating.borrow().clone()
    }

    pub fn clear(&self) {
        self.do_names.borrow_mut().clear();
        self.undo_names.borrow_mut().clear();
        self.do_validating.borrow_mut().clear();
    }
}

/// Shorthand for building an expected name list
#[allow(dead_code)]
pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
