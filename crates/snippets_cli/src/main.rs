//! `snippets` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, resolve configuration and bootstrap logging.
//! - Own the database connection for the single operation of this process.
//! - Map service outcomes to output and exit status.
//!
//! # Invariants
//! - Exactly one snippet operation runs per invocation.
//! - Exit status: 0 success, 1 `get` miss, 2 invalid input, 3 storage failure.

mod args;
mod config;
mod render;

use args::{Cli, Command};
use clap::Parser;
use config::AppConfig;
use log::{error, info, warn};
use render::{not_available, render, CommandOutput};
use snippets_core::db::open_db;
use snippets_core::{
    flush_logging, init_logging, SnippetRepository, SnippetService, SnippetServiceError,
    SqliteSnippetRepository,
};
use std::fmt::Display;
use std::process::ExitCode;

const EXIT_NOT_AVAILABLE: u8 = 1;
const EXIT_INVALID_INPUT: u8 = 2;
const EXIT_STORAGE_FAILURE: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let code = run(&cli);
    flush_logging();
    code
}

fn run(cli: &Cli) -> ExitCode {
    let config = match AppConfig::resolve(cli) {
        Ok(config) => config,
        Err(err) => return fatal(&err),
    };

    if let Some(log_dir) = config.log_dir.to_str() {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    } else {
        eprintln!(
            "warning: file logging disabled: log directory `{}` is not valid UTF-8",
            config.log_dir.display()
        );
    }

    if let Err(err) = config.ensure_db_dir() {
        return fatal(&err);
    }

    // Closed on drop on every return path below.
    let mut conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("Error: cannot open `{}`: {err}", config.db_path.display());
            return ExitCode::from(EXIT_STORAGE_FAILURE);
        }
    };
    let repo = match SqliteSnippetRepository::try_new(&mut conn) {
        Ok(repo) => repo,
        Err(err) => return fatal(&err),
    };
    let mut service = SnippetService::new(repo);

    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );
    match execute(&mut service, &cli.command) {
        Ok(output) => match render(&output, config.output) {
            Ok(text) => {
                if !text.is_empty() {
                    println!("{text}");
                }
                info!(
                    "event=cli_command module=cli status=ok command={}",
                    cli.command.name()
                );
                ExitCode::SUCCESS
            }
            Err(err) => fatal(&err),
        },
        Err(SnippetServiceError::NotFound { keyword }) => {
            warn!(
                "event=cli_command module=cli status=not_found command={}",
                cli.command.name()
            );
            println!("{}", not_available(&keyword));
            ExitCode::from(EXIT_NOT_AVAILABLE)
        }
        Err(err @ SnippetServiceError::InvalidKeyword { .. }) => {
            warn!(
                "event=cli_command module=cli status=rejected command={} error_code={}",
                cli.command.name(),
                err.code()
            );
            eprintln!("Error: {err}");
            ExitCode::from(EXIT_INVALID_INPUT)
        }
        Err(err) => {
            error!(
                "event=cli_command module=cli status=error command={} error_code={}",
                cli.command.name(),
                err.code()
            );
            fatal(&err)
        }
    }
}

fn execute<R: SnippetRepository>(
    service: &mut SnippetService<R>,
    command: &Command,
) -> Result<CommandOutput, SnippetServiceError> {
    match command {
        Command::Put { name, snippet } => service.put(name, snippet).map(CommandOutput::Stored),
        Command::Get { name } => service.get(name).map(CommandOutput::Retrieved),
        Command::Catalog => service.catalog().map(CommandOutput::Catalog),
        Command::Search { string } => service.search(string).map(CommandOutput::Matches),
    }
}

/// Prints `err` and returns the storage failure status.
///
/// Error `Display` impls in this workspace already embed their causes.
fn fatal(err: &dyn Display) -> ExitCode {
    eprintln!("Error: {err}");
    ExitCode::from(EXIT_STORAGE_FAILURE)
}
