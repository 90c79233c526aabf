use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Snapshot of the process environment used by the interpreter.
///
/// The environment contains:
/// - `vars`: variables handed to launched programs and used for `PATH` lookup.
/// - `current_dir`: the working directory, kept in step with the process by `cd`.
///
/// Fields are public so tests can build an environment by hand.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<OsString, OsString>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let vars = stdenv::vars_os().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// Get the value of an environment variable.
    pub fn get_var(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_get_var() {
        let mut env = Environment {
            vars: HashMap::new(),
            current_dir: PathBuf::from("/"),
        };
        assert_eq!(env.get_var("SOME_RANDOM_ENV_VAR_12345"), None);

        env.vars.insert("KEY".into(), "VALUE".into());
        assert_eq!(env.get_var("KEY"), Some(OsStr::new("VALUE")));
    }

    #[test]
    fn test_env_reads_from_process_env() {
        let env = Environment::new();
        assert!(env.get_var("PATH").is_some());
    }
}
