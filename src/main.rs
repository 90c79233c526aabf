use anyhow::{Context, Result};
use lsh::config::Config;
use lsh::env::Environment;
use lsh::{EditorSource, Interpreter, LineSource, PROGRAM_NAME, PlainSource, Shell, logging};
use std::io::{self, IsTerminal};
use std::process::ExitCode;

fn main() -> ExitCode {
    let config: Config = argh::from_env();
    if let Err(e) = logging::init(config.log_level) {
        eprintln!("{}: {}", PROGRAM_NAME, e);
    }

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", PROGRAM_NAME, e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<()> {
    let source: Box<dyn LineSource> = if config.plain || !io::stdin().is_terminal() {
        Box::new(PlainSource::new(io::stdin().lock()))
    } else {
        Box::new(EditorSource::new(config.history).context("can't start line editor")?)
    };
    log::debug!("reading commands, prompt {:?}", config.prompt);

    let mut shell = Shell::new(
        source,
        Interpreter::new(Environment::new()),
        io::stdout(),
        io::stderr(),
    )
    .with_prompt(config.prompt);
    shell.run()?;
    Ok(())
}
