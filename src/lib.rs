pub mod cmdline;
pub mod environment;
pub mod evaluator;
pub mod expander;
pub mod interpreter;
pub mod printer;
pub mod reader;
pub mod special_forms;
pub mod stdlib;
pub mod tokens;
pub mod types;

#[macro_use]
extern crate lazy_static;

pub use interpreter::{run, Session};
pub use types::Value;

/// Deepest list nesting the reader will accept.
pub const MAX_READ_DEPTH: usize = 512;

/// Deepest chain of nested evaluations, macro expansion included. Kept low
/// enough to fit in the 2 MiB stack of a spawned thread.
pub const MAX_EVAL_DEPTH: usize = 512;
