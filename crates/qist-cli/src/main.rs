//! `qist`: interactive admin shell over the EasyQist console core.

mod command;
mod render;
mod shell;

use clap::Parser;
use qist_core::{
    admin::Admin,
    config::AdminConfig,
    session::{SessionStorage, storage_for},
};
use rustyline::{DefaultEditor, error::ReadlineError};
use shell::{Flow, Shell};
use std::{error::Error, io, path::PathBuf};
use tracing::{debug, info};

const PROMPT: &str = "qist> ";

#[derive(Debug, Parser)]
#[command(name = "qist", about = "EasyQist admin console", version)]
struct Args {
    /// TOML config file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start with empty collections instead of the demo data.
    #[arg(long)]
    empty: bool,

    /// Enable debug logging for the console crates.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => AdminConfig::load(path)?,
        None => AdminConfig::default(),
    };
    debug!(?config, "config loaded");

    let storage = storage_for(&config.session);
    let admin = if args.empty {
        Admin::new(config, storage)?
    } else {
        Admin::seeded(config, storage)?
    };

    run(Shell::new(admin))
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("QIST_LOG").unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("qist_core=debug,qist_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run<S: SessionStorage>(mut shell: Shell<S>) -> Result<(), Box<dyn Error>> {
    let mut rl = DefaultEditor::new()?;

    if let Some(user) = shell.admin().session().current_user() {
        println!("welcome back, {}", user.name);
    } else {
        println!("log in to continue (type 'help' for commands)");
    }

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        if !line.trim().is_empty() {
            rl.add_history_entry(line.as_str())?;
        }

        let mut confirm = |prompt: &str| {
            rl.readline(&format!("{prompt} [y/N] ")).is_ok_and(|answer| {
                matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            })
        };

        match shell.run_line(&line, &mut io::stdout().lock(), &mut confirm) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => eprintln!("error: {err}"),
        }
    }

    info!("shell closed");

    Ok(())
}
