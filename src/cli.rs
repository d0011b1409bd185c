use crate::sqlite::SQLiteDatabase;
use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use std::{fmt::Display, io::Write, path::PathBuf};
use thiserror::Error;
use tracing::info;

/// Available commands for the SQLite CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DbInfo,
    Tables,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("Unsupported command: {0}")]
    UnsupportedCommand(String),
}

impl std::str::FromStr for Command {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ".dbinfo" => Ok(Command::DbInfo),
            ".tables" => Ok(Command::Tables),
            _ => Err(CliError::UnsupportedCommand(s.to_string())),
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::DbInfo => write!(f, ".dbinfo"),
            Command::Tables => write!(f, ".tables"),
        }
    }
}

/// Command line arguments for the SQLite CLI
#[derive(Debug, Parser)]
#[command(name = "sqlite-inspect", version, about = "Inspect the schema page of a SQLite database file")]
pub struct Args {
    /// Path to the database file
    pub file: PathBuf,

    /// Dot-command to run: .dbinfo or .tables
    pub command: String,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Default log filter implied by `--verbose`
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Runs one command against the database and writes its output to `out`.
///
/// Output is produced only after the query succeeds, so a failure never
/// leaves a partial result behind.
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let command: Command = args.command.parse()?;
    info!("Running {} on {}", command, args.file.display());

    let mut db = SQLiteDatabase::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    match command {
        Command::DbInfo => {
            let info = db.get_info().context("Failed to read database info")?;
            writeln!(out, "database page size: {}", info.page_size())?;
            writeln!(out, "number of tables: {}", info.num_tables())?;
        }
        Command::Tables => {
            let tables = db.list_tables().context("Failed to read table names")?;
            writeln!(out, "{}", tables.iter().join(" "))?;
        }
    }

    Ok(())
}
