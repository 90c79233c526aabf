//! A tiny interactive shell.
//!
//! The shell reads one line at a time, splits it into whitespace-delimited tokens and
//! either runs one of three built-in commands (`cd`, `help`, `exit`) in-process or
//! launches the named program as a child process and waits for it. There is no
//! scripting language: no pipes, redirections, expansions or job control.
//!
//! The main entry point is [`Shell`], which drives the read/tokenize/dispatch loop over
//! any [`LineSource`]. [`Interpreter`] is the dispatcher and can be used on its own to
//! run an already tokenized line.

mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
mod external;
mod interpreter;
pub mod logging;
pub mod reader;
mod shell;
pub mod tokenizer;

pub use builtin::{BUILTINS, Builtin};
pub use interpreter::Interpreter;
pub use reader::{EditorSource, LineSource, PlainSource};
pub use shell::{Shell, State};

/// Name used to prefix every diagnostic written to standard error.
pub const PROGRAM_NAME: &str = "lsh";
