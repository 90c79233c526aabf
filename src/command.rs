use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Continuation signal returned by every command.
///
/// The loop keeps reading lines for as long as commands return [`Flow::Continue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Object-safe trait for any command that can be executed by the shell.
///
/// This is implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// Built-ins write their output to `stdout`. External programs inherit the
    /// process's standard streams, so they only flush `stdout` before starting.
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow>;
}
