//! Command History Demonstration
//!
//! This example walks through the command history engine:
//! 1. Registering execution functions for command types
//! 2. Do / undo / redo against the live log
//! 3. Orphan preservation when editing mid-history
//! 4. Saving the log and rebuilding live state by replay
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use maquette_core::logging::{init, Profile};
use maquette_core::{Command, CommandKind, CommandList, CommandManager, Op};
use serde::{Deserialize, Serialize};

/// Toy stand-in for the scene graph: model name -> position
type Scene = Rc<RefCell<HashMap<String, [f32; 3]>>>;

#[derive(Debug, Serialize, Deserialize)]
struct CreateModelCommand {
    name: String,
}

#[typetag::serde]
impl CommandKind for CreateModelCommand {
    fn type_name(&self) -> &'static str {
        "CreateModelCommand"
    }

    fn description(&self) -> String {
        format!("Create model {}", self.name)
    }

    // Created models may end up in the clipboard, so keep this command
    // around as an orphan if it is ever cut from the history.
    fn should_be_added_as_orphan(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TranslateCommand {
    name: String,
    delta: [f32; 3],
}

#[typetag::serde]
impl CommandKind for TranslateCommand {
    fn type_name(&self) -> &'static str {
        "TranslateCommand"
    }

    fn description(&self) -> String {
        format!("Translate {} by {:?}", self.name, self.delta)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn register_executors(cm: &mut CommandManager, scene: &Scene) {
    let s = Rc::clone(scene);
    cm.register_function("CreateModelCommand", move |cmd: &mut Command, op: Op| {
        let name = cmd.kind_as::<CreateModelCommand>().unwrap().name.clone();
        match op {
            Op::Do => {
                s.borrow_mut().insert(name, [0.0; 3]);
            }
            Op::Undo => {
                s.borrow_mut().remove(&name);
            }
        }
    });

    let s = Rc::clone(scene);
    cm.register_function("TranslateCommand", move |cmd: &mut Command, op: Op| {
        let tc = cmd.kind_as::<TranslateCommand>().unwrap();
        let (name, delta) = (tc.name.clone(), tc.delta);
        let mut scene = s.borrow_mut();
        let pos = scene.get_mut(&name).expect("model must exist");
        for axis in 0..3 {
            match op {
                Op::Do => pos[axis] += delta[axis],
                Op::Undo => pos[axis] -= delta[axis],
            }
        }
    });
}

fn main() {
    init(Profile::Development);

    println!("=== Maquette Command History Demo ===\n");

    // ===== Part 1: Do / undo / redo =====
    println!("## Part 1: Do / undo / redo\n");

    let scene: Scene = Rc::new(RefCell::new(HashMap::new()));
    let mut cm = CommandManager::new();
    register_executors(&mut cm, &scene);

    cm.add_and_do(Command::new(CreateModelCommand {
        name: "Box_1".to_string(),
    }));
    cm.add_and_do(Command::new(TranslateCommand {
        name: "Box_1".to_string(),
        delta: [2.0, 0.0, 0.0],
    }));
    println!("After create + translate: {:?}", scene.borrow());

    cm.undo();
    println!("After undo ({}): {:?}", cm.command_list().command_to_redo().description(), scene.borrow());

    cm.redo();
    println!("After redo: {:?}\n", scene.borrow());

    // ===== Part 2: Orphan preservation =====
    println!("## Part 2: Orphan preservation\n");

    cm.undo();
    cm.undo();
    cm.add_and_do(Command::new(CreateModelCommand {
        name: "Sphere_1".to_string(),
    }));
    let tip = cm.command_list().command(cm.command_list().current_index() - 1);
    println!(
        "New edit mid-history kept {} orphaned command(s) alive",
        tip.orphaned_commands().len()
    );
    println!("Scene: {:?}\n", scene.borrow());

    // ===== Part 3: Save and replay =====
    println!("## Part 3: Save and replay\n");

    let saved = serde_json::to_string_pretty(cm.command_list()).unwrap();
    println!("Persisted log:\n{saved}\n");

    let loaded: CommandList = serde_json::from_str(&saved).unwrap();
    loaded.validate().expect("structurally valid session");

    let restored_scene: Scene = Rc::new(RefCell::new(HashMap::new()));
    let mut restored = CommandManager::new();
    register_executors(&mut restored, &restored_scene);
    restored.process_command_list(loaded);

    println!("Replayed scene: {:?}", restored_scene.borrow());
    println!(
        "Replayed log: {} command(s), cursor {}",
        restored.command_list().command_count(),
        restored.command_list().current_index()
    );
}
