use crate::command::{ExecutableCommand, Flow};
use crate::env::Environment;
use anyhow::{Context, Result, bail};
use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are executed directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized {
    /// Canonical name of the command, e.g. "cd".
    const NAME: &'static str;

    /// Builds the command from the tokens that followed its name.
    fn from_args(args: &[OsString]) -> Self;

    /// Executes the command, writing any output to `stdout`.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow> {
        <T as BuiltinCommand>::execute(*self, stdout, env)
    }
}

/// One entry of the builtin table.
pub struct Builtin {
    pub name: &'static str,
    create: fn(&[OsString]) -> Box<dyn ExecutableCommand>,
}

impl Builtin {
    /// Instantiate the command with the tokens that followed its name.
    pub fn create(&self, args: &[OsString]) -> Box<dyn ExecutableCommand> {
        (self.create)(args)
    }
}

const fn entry<T: BuiltinCommand + 'static>() -> Builtin {
    Builtin {
        name: T::NAME,
        create: create::<T>,
    }
}

fn create<T: BuiltinCommand + 'static>(args: &[OsString]) -> Box<dyn ExecutableCommand> {
    Box::new(T::from_args(args))
}

/// Every builtin, in lookup order.
pub static BUILTINS: [Builtin; 3] = [entry::<Cd>(), entry::<Help>(), entry::<Exit>()];

/// Change the current working directory.
pub struct Cd {
    /// Directory to switch to; absolute or relative to the current directory.
    pub target: Option<OsString>,
}

impl BuiltinCommand for Cd {
    const NAME: &'static str = "cd";

    fn from_args(args: &[OsString]) -> Self {
        Self {
            target: args.first().cloned(),
        }
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow> {
        let Some(target) = self.target else {
            bail!("expected argument to \"cd\"");
        };
        let target = PathBuf::from(target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        env::set_current_dir(&new_dir)
            .with_context(|| format!("cd: can't chdir to {}", new_dir.display()))?;
        env.current_dir = env::current_dir().unwrap_or(new_dir);
        log::debug!("working directory is now {}", env.current_dir.display());
        Ok(Flow::Continue)
    }
}

/// Print a short banner and the names of the builtins.
pub struct Help;

impl BuiltinCommand for Help {
    const NAME: &'static str = "help";

    fn from_args(_args: &[OsString]) -> Self {
        Help
    }

    fn execute(self, stdout: &mut dyn Write, _env: &mut Environment) -> Result<Flow> {
        writeln!(stdout, "LSH, a line-at-a-time shell")?;
        writeln!(stdout, "Type program names and arguments, and hit enter.")?;
        writeln!(stdout, "The following are built in:")?;
        for builtin in &BUILTINS {
            writeln!(stdout, "  {}", builtin.name)?;
        }
        writeln!(stdout, "Use the man command for information on other programs.")?;
        Ok(Flow::Continue)
    }
}

/// Stop the shell. Arguments are ignored.
pub struct Exit;

impl BuiltinCommand for Exit {
    const NAME: &'static str = "exit";

    fn from_args(_args: &[OsString]) -> Self {
        Exit
    }

    fn execute(self, _stdout: &mut dyn Write, _env: &mut Environment) -> Result<Flow> {
        Ok(Flow::Stop)
    }
}
