use crate::shell::DEFAULT_PROMPT;
use argh::FromArgs;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(FromArgs, Debug)]
/// A minimal shell: `cd`, `help` and `exit` are built in, every other command
/// is launched as a program with its words as arguments.
pub struct Config {
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// text printed before each line is read.
    pub prompt: String,

    #[argh(switch)]
    /// read standard input line by line without line editing, even on a terminal.
    pub plain: bool,

    #[argh(option)]
    /// file to load line-editing history from and save it to on exit.
    pub history: Option<PathBuf>,

    #[argh(option, default = "LevelFilter::Warn")]
    /// diagnostics verbosity: off, error, warn, info, debug or trace.
    pub log_level: LevelFilter,
}
