//! Handing the exported mesh to Blender.
//!
//! An [`EditorScript`] is a small Blender Python program that imports the
//! OBJ mesh and saves it as a `.blend` project. [`BlenderRunner`] executes it
//! headless.

mod runner;
mod script;

pub use runner::{BlenderRunner, EditorError, DEFAULT_BLENDER};
pub use script::EditorScript;
