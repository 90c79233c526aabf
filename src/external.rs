use crate::command::{ExecutableCommand, Flow};
use crate::env::Environment;
use anyhow::{Context, Result, anyhow};
use log::debug;
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Command that is not a builtin: a program launched as a child process.
pub struct ExternalCommand {
    argv: Vec<OsString>,
}

impl ExternalCommand {
    /// `argv[0]` names the program and is passed on unchanged as its `argv[0]`.
    pub fn new(argv: Vec<OsString>) -> Self {
        Self { argv }
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, stdout: &mut dyn Write, env: &mut Environment) -> Result<Flow> {
        let (name, args) = self
            .argv
            .split_first()
            .ok_or_else(|| anyhow!("empty command"))?;
        let display_name = name.to_string_lossy();

        let search_paths = env.get_var("PATH").unwrap_or_default();
        let program = find_command_path(search_paths, &env.current_dir, Path::new(name))
            .ok_or_else(|| anyhow!("{}: command not found", display_name))?;

        // The child writes straight to the inherited stdout.
        stdout.flush()?;

        let mut cmd = Command::new(program.as_ref());
        cmd.args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .envs(&env.vars)
            .current_dir(&env.current_dir);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(name);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("{}", display_name))?;
        debug!("spawned {} as pid {}", program.display(), child.id());

        let exit_status = child
            .wait()
            .with_context(|| format!("{}: wait failed", display_name))?;
        debug!("{} finished: {}", display_name, describe(exit_status));
        Ok(Flow::Continue)
    }
}

fn describe(exit_status: ExitStatus) -> String {
    match exit_status.code() {
        Some(x) => format!("exit code {}", x),
        None => terminated_by_signal(exit_status),
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match exit_status.signal() {
        Some(signal) if exit_status.core_dumped() => format!("signal {} (core dumped)", signal),
        Some(signal) => format!("signal {}", signal),
        None => "unknown status".to_string(),
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> String {
    "unknown status".to_string()
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - Relative path with a separator (e.g., `bin/sh`, `./foo`): resolved against `cwd`,
///   returned if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first executable file.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(
    search_paths: &OsStr,
    cwd: &Path,
    path: &'a Path,
) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return path.exists().then_some(Cow::Borrowed(path));
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, _) => None,
        (Some(std::path::Component::Normal(x)), None) => {
            find_in_path(search_paths, x).map(Cow::Owned)
        }
        _ => {
            let joined = cwd.join(path);
            joined.exists().then_some(Cow::Owned(joined))
        }
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
