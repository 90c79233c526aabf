use crate::PROGRAM_NAME;
use crate::builtin::{BUILTINS, Builtin};
use crate::command::{ExecutableCommand, Flow};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::tokenizer::TokenList;
use log::debug;
use std::io::Write;

/// The dispatcher: runs a tokenized line as a builtin or an external program.
///
/// The interpreter owns the [`Environment`] and consults a fixed, read-only table of
/// builtins before falling back to launching a program.
///
/// Example
/// ```
/// use lsh::Interpreter;
/// use lsh::command::Flow;
/// use lsh::tokenizer::tokenize;
///
/// let mut sh = Interpreter::default();
/// let (mut out, mut err) = (Vec::<u8>::new(), Vec::<u8>::new());
/// let tokens = tokenize(b"exit now").unwrap();
/// assert_eq!(sh.dispatch(&tokens, &mut out, &mut err), Flow::Stop);
/// ```
pub struct Interpreter {
    env: Environment,
    builtins: &'static [Builtin],
}

impl Interpreter {
    /// Create an interpreter working in `env`.
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            builtins: &BUILTINS,
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Run one tokenized line.
    ///
    /// An empty line does nothing. Any error a command raises is reported on `stderr`
    /// and the shell continues; only the command itself can ask to stop.
    pub fn dispatch(
        &mut self,
        tokens: &TokenList<'_>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Flow {
        let Some(name) = tokens.first() else {
            return Flow::Continue;
        };
        let cmd = self.resolve(name, tokens);
        match cmd.execute(stdout, &mut self.env) {
            Ok(flow) => {
                debug!("{} -> {:?}", String::from_utf8_lossy(name), flow);
                flow
            }
            Err(e) => {
                let _ = writeln!(stderr, "{}: {:#}", PROGRAM_NAME, e);
                Flow::Continue
            }
        }
    }

    fn resolve(&self, name: &[u8], tokens: &TokenList<'_>) -> Box<dyn ExecutableCommand> {
        let argv = tokens.to_argv();
        match self.builtins.iter().find(|b| b.name.as_bytes() == name) {
            Some(builtin) => builtin.create(&argv[1..]),
            None => Box::new(ExternalCommand::new(argv)),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(Environment::new())
    }
}
