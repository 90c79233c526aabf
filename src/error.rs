use rustyline::error::ReadlineError;
use std::collections::TryReserveError;
use std::io;
use thiserror::Error;

/// Errors that reach the read/eval loop itself.
///
/// Errors raised by individual commands never get here: the dispatcher reports them
/// and carries on. Everything left makes continuing pointless and ends the shell.
#[derive(Debug, Error)]
pub enum ShellError {
    /// A buffer could not grow.
    #[error("out of memory while {context}")]
    OutOfMemory {
        context: &'static str,
        #[source]
        source: TryReserveError,
    },

    /// Reading from the input stream failed.
    #[error("failed to read input: {0}")]
    Read(#[source] io::Error),

    /// Writing the prompt, command output or a diagnostic failed.
    #[error("failed to write output: {0}")]
    Write(#[source] io::Error),

    /// The interactive line editor failed.
    #[error("line editor: {0}")]
    Readline(#[from] ReadlineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failing_direction() {
        let read = ShellError::Read(io::Error::new(io::ErrorKind::UnexpectedEof, "gone"));
        assert_eq!(read.to_string(), "failed to read input: gone");

        let write = ShellError::Write(io::Error::from(io::ErrorKind::BrokenPipe));
        assert!(write.to_string().starts_with("failed to write output: "));

        let oom = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
        let err = ShellError::OutOfMemory {
            context: "reading a line",
            source: oom,
        };
        assert_eq!(err.to_string(), "out of memory while reading a line");
    }
}
