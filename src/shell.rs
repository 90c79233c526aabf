use crate::command::Flow;
use crate::error::ShellError;
use crate::interpreter::Interpreter;
use crate::reader::LineSource;
use crate::tokenizer::tokenize;
use log::{debug, trace};
use std::io::Write;

/// Default prompt printed before every line.
pub const DEFAULT_PROMPT: &str = "> ";

/// Where the read/eval loop stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Stopped,
}

/// The read/tokenize/dispatch loop.
///
/// Each iteration prompts, reads one line, splits it and hands it to the
/// [`Interpreter`]. The line and its tokens live only for that iteration.
pub struct Shell<S, O, E> {
    source: S,
    interpreter: Interpreter,
    stdout: O,
    stderr: E,
    prompt: String,
    state: State,
}

impl<S: LineSource, O: Write, E: Write> Shell<S, O, E> {
    pub fn new(source: S, interpreter: Interpreter, stdout: O, stderr: E) -> Self {
        Self {
            source,
            interpreter,
            stdout,
            stderr,
            prompt: DEFAULT_PROMPT.to_string(),
            state: State::Running,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Run one iteration of the loop and return the state it leaves behind.
    ///
    /// Once stopped, further calls do nothing. Errors returned from here are fatal.
    pub fn step(&mut self) -> Result<State, ShellError> {
        if self.state == State::Stopped {
            return Ok(State::Stopped);
        }

        let line = match self.source.read_line(&self.prompt, &mut self.stdout) {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("end of input");
                return Ok(self.stop());
            }
            Err(e) => return Err(e),
        };
        trace!("read line: {:?}", String::from_utf8_lossy(&line));

        let tokens = tokenize(&line)?;
        let flow = self
            .interpreter
            .dispatch(&tokens, &mut self.stdout, &mut self.stderr);
        self.stdout.flush().map_err(ShellError::Write)?;

        match flow {
            Flow::Continue => Ok(self.state),
            Flow::Stop => Ok(self.stop()),
        }
    }

    /// Loop until `exit`, the end of input or a fatal error.
    ///
    /// The source is finished in every case, so history is saved even when the loop
    /// dies on an error.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            match self.step() {
                Ok(State::Running) => {}
                Ok(State::Stopped) => return Ok(()),
                Err(e) => {
                    debug!("stopping on fatal error: {}", e);
                    self.stop();
                    return Err(e);
                }
            }
        }
    }

    /// Hand back the output streams, e.g. to inspect what a session printed.
    pub fn into_streams(self) -> (O, E) {
        (self.stdout, self.stderr)
    }

    fn stop(&mut self) -> State {
        self.state = State::Stopped;
        self.source.finish();
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::tests::lock_current_dir;
    use crate::reader::PlainSource;
    use std::cell::Cell;
    use std::io::Cursor;
    use std::rc::Rc;

    type TestShell = Shell<PlainSource<Cursor<Vec<u8>>>, Vec<u8>, Vec<u8>>;

    fn shell(input: &[u8]) -> TestShell {
        let source = PlainSource::new(Cursor::new(input.to_vec()));
        Shell::new(source, Interpreter::default(), Vec::new(), Vec::new())
    }

    fn session(input: &[u8]) -> (String, String) {
        let mut sh = shell(input);
        sh.run().unwrap();
        assert_eq!(sh.state(), State::Stopped);
        let (out, err) = sh.into_streams();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn test_exit_stops_loop() {
        let mut sh = shell(b"exit\nhelp\n");
        assert_eq!(sh.step().unwrap(), State::Stopped);
        assert_eq!(sh.step().unwrap(), State::Stopped);
        let (out, err) = sh.into_streams();
        assert_eq!(out, b"> ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_end_of_input_stops_loop() {
        let (out, err) = session(b"");
        assert_eq!(out, "> ");
        assert!(err.is_empty());
    }

    #[test]
    fn test_empty_lines_keep_prompting() {
        let mut sh = shell(b"\n   \n\t\n");
        for _ in 0..3 {
            assert_eq!(sh.step().unwrap(), State::Running);
        }
        assert_eq!(sh.step().unwrap(), State::Stopped);
        let (out, _) = sh.into_streams();
        assert_eq!(out, b"> > > > ");
    }

    #[test]
    fn test_help_then_exit() {
        let (out, err) = session(b"help\nexit\n");
        assert!(out.starts_with("> LSH"));
        assert!(out.contains("  cd\n  help\n  exit\n"));
        assert!(out.ends_with("> "));
        assert!(err.is_empty());
    }

    #[test]
    fn test_cd_errors_do_not_stop_loop() {
        let _lock = lock_current_dir();
        let before = std::env::current_dir().unwrap();
        let (out, err) = session(b"cd\ncd /nonexistent-path-xyz\nexit\n");
        assert_eq!(out, "> > > ");
        let lines: Vec<&str> = err.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "lsh: expected argument to \"cd\"");
        assert!(lines[1].starts_with("lsh: cd: can't chdir to /nonexistent-path-xyz"));
        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_non_utf8_argument_reaches_program() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = crate::builtin::tests::make_unique_temp_dir("session_bytes").unwrap();
        let mut input = b"touch ".to_vec();
        input.extend_from_slice(tmp.as_os_str().as_bytes());
        input.extend_from_slice(b"/caf\xe9\nexit\n");

        let (out, err) = session(&input);
        assert_eq!(out, "> > ");
        assert!(err.is_empty(), "{}", err);
        let names: Vec<Vec<u8>> = std::fs::read_dir(&tmp)
            .unwrap()
            .map(|e| e.unwrap().file_name().as_bytes().to_vec())
            .collect();
        assert_eq!(names, [b"caf\xe9".to_vec()]);

        let _ = std::fs::remove_dir_all(tmp);
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn test_closed_stdout_is_a_write_error() {
        let source = PlainSource::new(Cursor::new(b"help\n".to_vec()));
        let mut sh = Shell::new(source, Interpreter::default(), ClosedPipe, Vec::<u8>::new());
        let err = sh.run().unwrap_err();
        assert!(matches!(err, ShellError::Write(_)));
        assert!(err.to_string().starts_with("failed to write output: "));
        assert_eq!(sh.state(), State::Stopped);
    }

    /// Fails every read and records whether it was finished.
    struct FailingSource {
        finished: Rc<Cell<bool>>,
    }

    impl LineSource for FailingSource {
        fn read_line(
            &mut self,
            _prompt: &str,
            _out: &mut dyn Write,
        ) -> Result<Option<Vec<u8>>, ShellError> {
            Err(ShellError::Read(std::io::ErrorKind::Other.into()))
        }

        fn finish(&mut self) {
            self.finished.set(true);
        }
    }

    #[test]
    fn test_fatal_error_still_finishes_source() {
        let finished = Rc::new(Cell::new(false));
        let source = FailingSource {
            finished: finished.clone(),
        };
        let mut sh = Shell::new(source, Interpreter::default(), Vec::<u8>::new(), Vec::<u8>::new());
        let err = sh.run().unwrap_err();
        assert!(matches!(err, ShellError::Read(_)));
        assert!(finished.get());
        assert_eq!(sh.state(), State::Stopped);
    }

    #[test]
    #[cfg(unix)]
    fn test_unknown_program_keeps_prompting() {
        let (out, err) = session(b"nonexistent-program-xyz\nexit\n");
        assert_eq!(out, "> > ");
        assert_eq!(err, "lsh: nonexistent-program-xyz: command not found\n");
    }

    #[test]
    fn test_custom_prompt() {
        let mut sh = shell(b"exit\n").with_prompt("$ ");
        sh.run().unwrap();
        let (out, _) = sh.into_streams();
        assert_eq!(out, b"$ ");
    }
}
